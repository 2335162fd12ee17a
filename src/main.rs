use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use spectra_pricer::application::audit::AuditService;
use spectra_pricer::application::quote::QuoteService;
use spectra_pricer::domain::audit::AuditReport;
use spectra_pricer::domain::breakdown::PriceBreakdown;
use spectra_pricer::domain::ports::CatalogBox;
use spectra_pricer::error::Result as PricingResult;
use spectra_pricer::infrastructure::in_memory::InMemoryCatalog;
use spectra_pricer::infrastructure::json_file::JsonFileCatalog;
use spectra_pricer::interfaces::csv::quote_writer::QuoteWriter;
use spectra_pricer::interfaces::json::quote_request::{QuoteRequest, RawOptions};
use spectra_pricer::interfaces::json::quote_response::{ErrorResponse, QuoteResponse};
use spectra_pricer::interfaces::json::request_reader::QuoteRequestReader;
use spectra_pricer::interfaces::text;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Package catalog JSON file. The built-in catalog is used when omitted.
    #[arg(long, global = true, env = "SPECTRA_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price one package selection
    Quote(QuoteArgs),
    /// Price newline-delimited JSON requests and write CSV rows to stdout
    Batch {
        /// Input requests file, one JSON object per line
        input: PathBuf,
    },
    /// List packages with their price ranges
    List {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Compare listed package prices with the prices of their parts
    Audit {
        /// Audit a single package instead of the whole catalog
        slug: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Args)]
struct QuoteArgs {
    /// Package slug, e.g. apartment-basic
    slug: String,

    #[arg(long, allow_negative_numbers = true)]
    cameras: Option<i64>,

    /// AI detection level: basic, advanced or enterprise
    #[arg(long)]
    ai: Option<String>,

    /// Storage tier label, e.g. 4TB
    #[arg(long)]
    storage: Option<String>,

    /// Addon id; repeat for several addons
    #[arg(long = "addon")]
    addons: Vec<String>,

    #[arg(long)]
    installation: bool,

    #[arg(long)]
    maintenance: bool,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = open_catalog(cli.catalog.as_deref()).await?;

    match cli.command {
        Command::Quote(args) => quote(&QuoteService::new(catalog), args).await,
        Command::Batch { input } => batch(&QuoteService::new(catalog), input).await,
        Command::List { format } => list(&QuoteService::new(catalog), format).await,
        Command::Audit { slug, format } => {
            audit(&AuditService::new(catalog), slug.as_deref(), format).await
        }
    }
}

async fn open_catalog(path: Option<&Path>) -> Result<CatalogBox> {
    let catalog: CatalogBox = match path {
        Some(path) => Box::new(JsonFileCatalog::open(path).await.into_diagnostic()?),
        None => Box::new(InMemoryCatalog::builtin().into_diagnostic()?),
    };
    Ok(catalog)
}

/// Decodes a request at the boundary and prices it.
async fn price(service: &QuoteService, request: &QuoteRequest) -> PricingResult<PriceBreakdown> {
    let slug = request.slug()?;
    let selection = request.selection()?;
    service.quote(slug, &selection).await
}

async fn quote(service: &QuoteService, args: QuoteArgs) -> Result<ExitCode> {
    let request = QuoteRequest {
        package_slug: Some(args.slug),
        options: RawOptions {
            cameras: args.cameras,
            ai_detection: args.ai,
            storage: args.storage,
            addons: args.addons,
            installation: Some(args.installation),
            maintenance: Some(args.maintenance),
        },
        promo_code: None,
    };

    match price(service, &request).await {
        Ok(breakdown) => {
            match args.format {
                Format::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&QuoteResponse::from(&breakdown))
                        .into_diagnostic()?
                ),
                Format::Text => print!("{}", text::render_breakdown(&breakdown)),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_client_error() => {
            tracing::debug!(error = %e, "rejected quote request");
            match args.format {
                Format::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&ErrorResponse::from(&e)).into_diagnostic()?
                ),
                Format::Text => eprintln!("{}", e),
            }
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e).into_diagnostic(),
    }
}

async fn batch(service: &QuoteService, input: PathBuf) -> Result<ExitCode> {
    let file = File::open(input).into_diagnostic()?;
    let reader = QuoteRequestReader::new(file);

    let stdout = io::stdout();
    let mut writer = QuoteWriter::new(stdout.lock());

    for (index, request) in reader.requests().enumerate() {
        let line = index + 1;
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                eprintln!("Error reading request {}: {}", line, e);
                continue;
            }
        };

        match price(service, &request).await {
            Ok(breakdown) => writer.write_quote(&breakdown).into_diagnostic()?,
            Err(e) => eprintln!("Error processing request {}: {}", line, e),
        }
    }

    writer.flush().into_diagnostic()?;
    Ok(ExitCode::SUCCESS)
}

async fn list(service: &QuoteService, format: Format) -> Result<ExitCode> {
    let listings = service.listings().await.into_diagnostic()?;
    match format {
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&listings).into_diagnostic()?
        ),
        Format::Text => print!("{}", text::render_listings(&listings)),
    }
    Ok(ExitCode::SUCCESS)
}

async fn audit(service: &AuditService, slug: Option<&str>, format: Format) -> Result<ExitCode> {
    let report = match slug {
        Some(slug) => match service.audit(slug).await {
            Ok(audit) => AuditReport::from(vec![audit]),
            Err(e) if e.is_client_error() => {
                eprintln!("{}", e);
                return Ok(ExitCode::from(2));
            }
            Err(e) => return Err(e).into_diagnostic(),
        },
        None => service.report().await.into_diagnostic()?,
    };

    match format {
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).into_diagnostic()?
        ),
        Format::Text => print!("{}", text::render_audit(&report)),
    }
    Ok(ExitCode::SUCCESS)
}
