use axum::{extract::State, Json};
use serde::Deserialize;

use crate::pkg::internal::adaptors::jobs::mutators::JobMutator;
use crate::pkg::internal::adaptors::jobs::selectors::JobSelector;
use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::pkg::server::state::{AppState, GetTxn};
use crate::prelude::Result;

#[derive(Debug, Deserialize)]
pub struct CreateJobInput {
    pub id: Option<String>,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_salary")]
    pub salary: String,
    pub url: Option<String>,
}

fn default_salary() -> String {
    "Not provided".to_string()
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateJobInput>,
) -> Result<Json<JobEntry>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let job = JobMutator::new(&mut tx).upsert(input).await?;
    tx.commit().await?;
    tracing::info!("stored job {} at {}", &job.title, &job.company);
    Ok(Json(job))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<JobEntry>>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let jobs = JobSelector::new(&mut tx).get_all().await?;
    Ok(Json(jobs))
}
