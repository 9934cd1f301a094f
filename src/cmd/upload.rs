use std::path::PathBuf;

use clap::Args;

use crate::conf::settings;
use crate::pkg::internal::uploader::UploadClient;
use crate::prelude::Result;

#[derive(Args)]
pub struct UploadArgs {
    /// resume to submit, pdf or docx
    pub file: PathBuf,
    /// service base url, defaults to the configured one
    #[arg(long)]
    pub endpoint: Option<String>,
}

pub async fn run(args: UploadArgs) -> Result<()> {
    let base_url = args.endpoint.unwrap_or_else(|| settings.base_url.clone());
    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resume")
        .to_string();
    let data = tokio::fs::read(&args.file).await?;

    let client = UploadClient::new(&base_url)?;
    let outcome = client.submit(&filename, data).await;
    println!("{}", outcome);
    Ok(())
}
