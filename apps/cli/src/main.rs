use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ConversionClient, ConversionService, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVICE_URL,
};
use shared::{domain::SelectedFile, protocol::ConversionResult};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "doc-convert", about = "Convert a document to text with the conversion service")]
struct Cli {
    #[arg(long, default_value = DEFAULT_SERVICE_URL)]
    service_url: String,
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload one file and print the extracted text.
    Convert {
        file: PathBuf,
        /// Write the text here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    Health,
    Formats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let client = ConversionClient::new(
        &cli.service_url,
        std::time::Duration::from_secs(cli.timeout_secs.max(1)),
    )?;

    match cli.command {
        Command::Convert { file, output } => {
            let file = SelectedFile::from_path(file);
            if !file.has_accepted_extension() {
                tracing::warn!(
                    filename = %file.name,
                    "extension is not in the usual supported set; sending anyway"
                );
            }
            let result = match client.convert(&file).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!("conversion request failed: {err}");
                    ConversionResult::network_error()
                }
            };
            let text = extracted_text(&result)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, text)
                        .await
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    eprintln!("Wrote text for {} to {}", result.filename, path.display());
                }
                None => println!("{text}"),
            }
        }
        Command::Health => {
            let health = client.health().await?;
            println!("{}: {}", health.status, health.message);
        }
        Command::Formats => {
            let formats = client.supported_formats().await?;
            if !formats.description.is_empty() {
                println!("{}", formats.description);
            }
            let mut names = formats.formats;
            names.sort();
            println!("{}", names.join(", "));
        }
    }

    Ok(())
}

fn extracted_text(result: &ConversionResult) -> Result<&str> {
    if !result.success {
        bail!("Conversion failed: {}", result.error_message());
    }
    Ok(&result.text)
}
