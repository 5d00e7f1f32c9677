use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use toolshelf::config::{self, LibraryConfig};
use toolshelf::persist::{ImagePersister, ImageUpload};
use toolshelf::store::{self, CatalogStore, JsonFileStore};
use toolshelf::submit::Submitter;
use toolshelf::validate::SubmissionForm;
use toolshelf::{check, filter, generate, output};

#[derive(Parser)]
#[command(name = "toolshelf")]
#[command(about = "Browse and extend a categorized catalog of tools and prompts")]
#[command(long_about = "\
Browse and extend a categorized catalog of tools and prompts

The catalog is a single JSON document; uploaded preview images live in a
public directory next to it.

Library structure:

  library/
  ├── toolshelf.toml            # Optional config ('toolshelf gen-config')
  ├── data/
  │   └── tools.json            # { \"categories\": [ { id, title, description, tools } ] }
  └── public/
      └── uploads/              # Images added with 'toolshelf add'

Entries added to the prompt category (default: image-prompt) must include
prompt text.")]
#[command(version)]
struct Cli {
    /// Library root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log debug details to stderr
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every category and its entries
    List,
    /// Search a category's entries by name
    Search {
        /// Category id
        category: String,
        /// Text the entry name must contain (case-insensitive)
        #[arg(default_value = "")]
        query: String,
    },
    /// Add an entry to a category
    Add(AddArgs),
    /// Verify the catalog against the upload directory
    Check,
    /// Render the catalog as static HTML
    Generate {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print a stock toolshelf.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct AddArgs {
    /// Destination category id
    #[arg(long = "category")]
    category_id: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    url: Option<String>,
    /// Prompt text (required for the prompt category)
    #[arg(long)]
    prompt: Option<String>,
    /// Preview image file
    #[arg(long)]
    image: Option<PathBuf>,
    /// Declared MIME type of the image (e.g. image/png)
    #[arg(long)]
    mime: Option<String>,
    /// Re-render the site into this directory after a successful add
    #[arg(long, value_name = "DIR")]
    generate: Option<PathBuf>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(ExitCode::SUCCESS);
    }

    let config = config::load_config(&cli.root)?;
    let paths = config.paths(&cli.root);
    let store = JsonFileStore::new(&paths.data_file);

    match cli.command {
        Command::List => {
            let categories = store.read_all()?;
            output::print_catalog(&categories);
        }
        Command::Search {
            category: category_id,
            query,
        } => {
            let categories = store.read_all()?;
            let Some(category) = store::find_category(&categories, &category_id) else {
                eprintln!("Unknown category: {category_id}");
                return Ok(ExitCode::FAILURE);
            };
            let matches = filter::filter_entries(&category.tools, &query);
            output::print_search(category, &query, &matches);
        }
        Command::Add(args) => {
            let generate_into = args.generate.clone();
            let form = build_form(args)?;
            let persister = ImagePersister::new(&paths.uploads_dir, paths.uploads_prefix.clone());
            let outcome = Submitter::new(&store, &persister, &config.prompt_category).submit(&form);
            output::print_outcome(&outcome);
            if !outcome.is_accepted() {
                return Ok(ExitCode::FAILURE);
            }
            if let Some(dir) = generate_into {
                tracing::info!(views = ?outcome.stale_views(), "refreshing generated site");
                render_site(&store, &config, &paths.public_dir, &dir)?;
            }
        }
        Command::Check => {
            let report = check::check_library(&store, &config, &paths)?;
            output::print_check_report(&report);
            if !report.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Generate { output } => {
            render_site(&store, &config, &paths.public_dir, &output)?;
        }
        Command::GenConfig => unreachable!("handled before config is loaded"),
    }

    Ok(ExitCode::SUCCESS)
}

fn render_site(
    store: &impl CatalogStore,
    config: &LibraryConfig,
    public_dir: &std::path::Path,
    output_dir: &std::path::Path,
) -> Result<(), generate::GenerateError> {
    let site = generate::generate(store, &config.site, public_dir, output_dir)?;
    output::print_generate_output(&site, output_dir);
    Ok(())
}

/// Turn CLI flags into the submission form, reading the image file.
fn build_form(args: AddArgs) -> Result<SubmissionForm, std::io::Error> {
    let image = match &args.image {
        Some(path) => Some(ImageUpload::from_path(path, args.mime.as_deref()).map_err(|e| {
            std::io::Error::new(e.kind(), format!("cannot read image {}: {e}", path.display()))
        })?),
        None => None,
    };
    Ok(SubmissionForm {
        category_id: args.category_id,
        name: args.name,
        description: args.description,
        url: args.url,
        prompt: args.prompt,
        image,
    })
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TOOLSHELF_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| format!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
