use askama::Template;
use axum::extract::{Path, State};
use axum::response::Html;

use crate::err::Error;
use crate::pkg::internal::adaptors::resumes::selectors::ResumeSelector;
use crate::pkg::server::state::{AppState, GetTxn};
use crate::pkg::server::uispec::ResumeView;
use crate::prelude::Result;

pub async fn view(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
) -> Result<Html<String>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let entry = match ResumeSelector::new(&mut tx).get_by_id(&resume_id).await? {
        Some(entry) => entry,
        None => {
            return Err(Error::NotFound(format!("no resume with id {}", resume_id)));
        }
    };

    let template = ResumeView {
        name: entry.name.clone().unwrap_or_else(|| "Not provided".into()),
        email: entry.email.clone().unwrap_or_else(|| "Not provided".into()),
        phone: entry.phone.clone().unwrap_or_else(|| "Not provided".into()),
        skills: entry.skills_list(),
        experience: entry.experience.clone(),
        education: entry.education.clone(),
        uploaded: entry.created_at.clone(),
    };
    Ok(Html(template.render()?))
}
