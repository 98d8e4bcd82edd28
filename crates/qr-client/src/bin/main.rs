//! qr-cli - manage QR Docs codes from the command line

use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use qr_client::{CollectionApi, HttpCollectionClient, QrManager};
use qr_core::entry::parse_records;
use qr_core::render::{card, print, Card};
use qr_core::{ClientSettings, DocumentSource, Entry, QrError, SecurityCode};

/// QR Docs client
#[derive(Parser, Debug)]
#[command(name = "qr-cli")]
#[command(version)]
#[command(about = "Create, edit, print and delete QR Docs codes")]
struct Cli {
    /// JSON settings file
    #[arg(long, env = "QR_CLIENT_CONFIG")]
    config: Option<PathBuf>,

    /// Server base URL
    #[arg(long, env = "QR_API_URL")]
    api_url: Option<String>,

    /// Base URL encoded into QR codes (defaults to the server base URL)
    #[arg(long, env = "QR_PUBLIC_URL")]
    public_url: Option<String>,

    /// Security code used for writes
    #[arg(long, env = "QR_SECURITY_CODE", hide_env_values = true)]
    security_code: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every code as a card
    List,
    /// Show one code
    Show {
        /// Entry id
        id: String,
    },
    /// Create a blank code
    Add,
    /// Delete a code
    Remove {
        /// Entry id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Edit the title and document of a code
    Update {
        /// Entry id
        id: String,

        /// New title (keeps the current one when omitted)
        #[arg(long)]
        title: Option<String>,

        /// Link an external document
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,

        /// Inline a local file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Security code confirming the edit (prompted when omitted)
        #[arg(long)]
        code: Option<String>,
    },
    /// Write the printable page of a code
    Print {
        /// Entry id
        id: String,

        /// Output file (defaults to <id>.html)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

fn settings(cli: &Cli) -> qr_core::Result<ClientSettings> {
    let mut settings = match &cli.config {
        Some(path) => ClientSettings::load(path)?,
        None => ClientSettings::default(),
    };
    if let Some(url) = &cli.api_url {
        settings.api_url = url.clone();
    }
    if cli.public_url.is_some() {
        settings.public_url = cli.public_url.clone();
    }
    if cli.security_code.is_some() {
        settings.security_code = cli.security_code.clone();
    }
    Ok(settings)
}

fn session_code(settings: &ClientSettings) -> Result<SecurityCode, Box<dyn std::error::Error>> {
    let code = match &settings.security_code {
        Some(code) => code.clone(),
        None => rpassword::prompt_password("Security code: ")?,
    };
    Ok(SecurityCode::new(code)?)
}

fn confirm_removal() -> bool {
    print!("Are you sure you want to delete this QR code? [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

async fn fetch(api: &HttpCollectionClient, id: &str) -> qr_core::Result<Entry> {
    parse_records(&api.list_entries().await?)
        .into_iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| QrError::EntryNotFound(id.to_string()))
}

fn show(entry: &Entry, base: &str) -> qr_core::Result<()> {
    let card = Card::from_entry(entry, base)?;
    println!("{}", card::text(&card)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings(&cli)?;
    let base = settings.effective_public_url().to_string();
    let api = HttpCollectionClient::new(&settings.api_url, Duration::from_secs(settings.timeout_secs))?;

    match cli.command {
        Command::List => {
            let entries = parse_records(&api.list_entries().await?);
            if entries.is_empty() {
                println!("{}", qr_core::render::page::EMPTY_NOTICE);
            }
            for entry in &entries {
                show(entry, &base)?;
            }
        }
        Command::Show { id } => {
            let entry = fetch(&api, &id).await?;
            show(&entry, &base)?;
        }
        Command::Print { id, out } => {
            let entry = fetch(&api, &id).await?;

            let path = out.unwrap_or_else(|| PathBuf::from(format!("{}.html", id)));
            tokio::fs::write(&path, print::view(&entry, &base)?).await?;
            println!("Print view written to {} - open it in a browser to print", path.display());
        }
        Command::Add => {
            let mut manager = QrManager::new(api, session_code(&settings)?);
            manager.load().await?;
            let entry = manager.add().await?;
            show(&entry, &base)?;
        }
        Command::Remove { id, yes } => {
            let mut manager = QrManager::new(api, session_code(&settings)?);
            manager.load().await?;
            manager.remove(&id, |_| yes || confirm_removal()).await?;
            println!("Deleted {}", id);
        }
        Command::Update {
            id,
            title,
            url,
            file,
            code,
        } => {
            let session = session_code(&settings)?;
            let code = match code {
                Some(code) => code,
                None if settings.security_code.is_some() => session.expose().to_string(),
                None => rpassword::prompt_password("Security code to confirm edit: ")?,
            };

            let mut manager = QrManager::new(api, session)
                .with_max_document_bytes(settings.max_document_bytes);
            manager.load().await?;

            let title = match title {
                Some(title) => title,
                None => manager
                    .get(&id)
                    .map(|entry| entry.title.clone())
                    .ok_or_else(|| QrError::EntryNotFound(id.clone()))?,
            };
            let source = match (file, url) {
                (Some(path), _) => DocumentSource::File(path),
                (None, Some(url)) => DocumentSource::Url(url),
                (None, None) => DocumentSource::Keep,
            };

            let entry = manager.update(&id, &title, source, &code).await?;
            println!("QR code updated successfully!");
            show(&entry, &base)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
