use crate::{pkg::server::listen, prelude::Result};
use clap::{Parser, Subcommand};

mod migrate;
mod scrape;
mod upload;

#[derive(Parser)]
#[command(about = "resume parsing and job matching services")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    Listen,
    Migrate,
    Scrape(scrape::ScrapeArgs),
    Upload(upload::UploadArgs),
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    match args.command {
        Some(SubCommandType::Listen) => {
            listen().await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply().await?;
        }
        Some(SubCommandType::Scrape(args)) => {
            scrape::run(args).await?;
        }
        Some(SubCommandType::Upload(args)) => {
            upload::run(args).await?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
