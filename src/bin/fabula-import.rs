use clap::{Parser, Subcommand};
use fabula_import::{
    analyzer::ParseFailure,
    config::{BookType, ImportConfig},
    import::{import_atlas, import_core_rulebook, PageResult},
    pdf::{PageSource, PdfDocument},
    platform::directory::DirectoryPlatform,
    Error, ImportResult,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file
    #[arg(short, long, default_value = "fabula-import.json", global = true)]
    config: PathBuf,

    /// Directory the imported documents are written to
    #[arg(short, long, default_value = "out", global = true)]
    out: PathBuf,

    /// Save every successful page
    #[arg(short, long, global = true)]
    save: bool,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Import the equipment and bestiary pages of the core rulebook
    Rulebook { pdf: PathBuf },
    /// Import the equipment pages of an atlas book
    Atlas {
        pdf: PathBuf,
        #[arg(short, long)]
        book: BookType,
    },
}

/// Failures that got furthest into the page.
fn furthest(failures: &[ParseFailure]) -> impl Iterator<Item = String> + '_ {
    let max = failures.iter().map(|f| f.distance).max().unwrap_or(0);
    failures
        .iter()
        .filter(move |f| f.distance == max)
        .take(3)
        .map(|f| format!("{} (found {:?}, distance {})", f.error, f.found, f.distance))
}

fn report(results: &[PageResult]) {
    for result in results {
        match result {
            PageResult::Success(success) => println!(
                "page {:>3}  ok        {} -> {} [{}]",
                success.page,
                success.records.names().join(", "),
                success.folder.join("/"),
                success.source
            ),
            PageResult::Failure { page, failures } => {
                println!("page {page:>3}  failure");
                for line in furthest(failures) {
                    println!("            {line}");
                }
            }
            PageResult::TooMany {
                page,
                count,
                failures,
            } => {
                println!("page {page:>3}  too many  {count} parses");
                for line in furthest(failures) {
                    println!("            {line}");
                }
            }
        }
    }
    let ok = results.iter().filter(|r| r.is_success()).count();
    println!("{ok}/{} results parsed", results.len());
}

async fn save(
    results: &[PageResult],
    pages: &dyn PageSource,
    cli: &Cli,
    config: &ImportConfig,
) -> ImportResult<()> {
    let platform = DirectoryPlatform::open(&cli.out)?;
    for result in results {
        let PageResult::Success(success) = result else {
            continue;
        };
        let report = success.save(&platform, &config.image_path).await;
        info!(
            page = success.page,
            created = report.created.len(),
            failed = report.failures.len(),
            "page saved"
        );
        for failure in &report.failures {
            println!("  could not save {}: {}", failure.name, failure.error);
        }
        for name in &report.missing_equipment {
            println!("  no equipment named {name}");
        }
        success.cleanup(pages);
    }
    println!("saved to {}", cli.out.display());
    Ok(())
}

async fn run(cli: &Cli) -> ImportResult<()> {
    let config = ImportConfig::load(&cli.config)?;
    info!("config loaded.");
    debug!("config: {:?}", config);

    let (pdf, book) = match &cli.command {
        Command::Rulebook { pdf } => (pdf, None),
        Command::Atlas { pdf, book } => (pdf, Some(*book)),
    };
    let document = PdfDocument::load(pdf)?;
    debug!(pages = document.page_count(), "document loaded");

    let results = match book {
        None => import_core_rulebook(&document, &config).await,
        Some(book) => {
            let atlas = config
                .atlas_book(book)
                .ok_or_else(|| Error::internal(format!("No pages configured for {book}")))?;
            import_atlas(&document, atlas, &config).await
        }
    };
    report(&results);

    if cli.save {
        save(&results, &document, cli, &config).await?;
    }
    document.destroy();
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer())
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
