use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::err::Error;
use crate::pkg::internal::adaptors::jobs::selectors::JobSelector;
use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::pkg::internal::adaptors::matches::mutators::MatchMutator;
use crate::pkg::internal::adaptors::matches::selectors::MatchSelector;
use crate::pkg::internal::adaptors::matches::spec::MatchEntry;
use crate::pkg::internal::adaptors::resumes::selectors::ResumeSelector;
use crate::pkg::internal::matching::{self, JobProfile, MatchScores, ResumeProfile};
use crate::pkg::server::state::{AppState, GetTxn};
use crate::prelude::Result;

#[derive(Deserialize)]
pub struct CreateMatchesInput {
    pub resume_id: String,
}

#[derive(Serialize)]
pub struct JobMatch {
    pub job: JobEntry,
    pub scores: MatchScores,
}

#[derive(Deserialize)]
pub struct MatchFilter {
    pub resume_id: Option<String>,
    pub job_id: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateMatchesInput>,
) -> Result<Json<Vec<JobMatch>>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let resume = match ResumeSelector::new(&mut tx).get_by_id(&input.resume_id).await? {
        Some(resume) => resume,
        None => {
            return Err(Error::NotFound(format!(
                "no resume with id {}",
                input.resume_id
            )));
        }
    };
    let jobs = JobSelector::new(&mut tx).get_all().await?;

    let profile = ResumeProfile {
        skills: resume.skills_list(),
        experience: resume.experience.clone(),
        education: resume.education.clone(),
    };
    // Jobs carry no separate requirement field; years wanted are stated in
    // the description when stated at all.
    let job_profiles: Vec<JobProfile> = jobs
        .iter()
        .map(|job| JobProfile {
            skills: job.skills_list(),
            description: job.description.clone(),
            required_experience: job.description.clone(),
        })
        .collect();

    let ranked = matching::rank_jobs(&profile, &job_profiles);
    let mut matches = Vec::with_capacity(ranked.len());
    for (idx, scores) in ranked {
        MatchMutator::new(&mut tx)
            .create(&resume.id, &jobs[idx].id, &scores)
            .await?;
        matches.push(JobMatch {
            job: jobs[idx].clone(),
            scores,
        });
    }
    tx.commit().await?;
    tracing::info!("matched resume {} against {} jobs", &resume.id, matches.len());
    Ok(Json(matches))
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<MatchFilter>,
) -> Result<Json<Vec<MatchEntry>>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let matches = MatchSelector::new(&mut tx)
        .get_filtered(filter.resume_id.as_deref(), filter.job_id.as_deref())
        .await?;
    Ok(Json(matches))
}
