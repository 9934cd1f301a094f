use std::sync::Arc;

use clap::Args;

use crate::pkg::internal::scraper::{self, JobScraper};
use crate::pkg::server::handlers::jobs::CreateJobInput;
use crate::pkg::server::state::{db_pool, GetTxn};
use crate::pkg::internal::adaptors::jobs::mutators::JobMutator;
use crate::prelude::Result;

#[derive(Args)]
pub struct ScrapeArgs {
    /// search term, e.g. "software engineer"
    #[arg(long)]
    pub query: String,
    /// location filter, e.g. "remote"
    #[arg(long)]
    pub location: String,
    /// number of result pages to walk
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

pub async fn run(args: ScrapeArgs) -> Result<()> {
    let pool = Arc::new(db_pool()?);
    let scraper = JobScraper::new()?;
    let jobs = scraper.scrape(&args.query, &args.location, args.pages).await?;
    let summary = scraper::summary(&jobs);

    let mut tx = pool.begin_txn().await?;
    for job in &jobs {
        // The listing url doubles as a stable id, so rescrapes refresh rows
        // instead of multiplying them.
        JobMutator::new(&mut tx)
            .upsert(CreateJobInput {
                id: job.link.clone(),
                title: job.title.clone(),
                company: job.company.clone(),
                location: job.location.clone(),
                description: job.description.clone(),
                skills: job.skills.clone(),
                salary: job.salary.clone(),
                url: job.link.clone(),
            })
            .await?;
    }
    tx.commit().await?;
    tracing::info!("stored {} scraped jobs", jobs.len());

    println!("Job Summary:");
    println!("Total Jobs: {}", summary.total_jobs);
    println!("Unique Companies: {}", summary.unique_companies);
    println!("Locations: {}", summary.locations.join(", "));
    println!("Top Skills: {}", summary.top_skills.join(", "));
    println!("\nSample Job Listings:");
    for job in jobs.iter().take(3) {
        println!("\nTitle: {}", job.title);
        println!("Company: {}", job.company);
        println!("Location: {}", job.location);
        println!("Salary: {}", job.salary);
        println!("Skills: {}", job.skills.join(", "));
        let preview: String = job.description.chars().take(100).collect();
        println!("Description: {}...", preview);
    }
    Ok(())
}
