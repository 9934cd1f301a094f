use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchEntry {
    pub id: String,
    pub resume_id: String,
    pub job_id: String,
    pub total_score: f64,
    pub keyword_score: f64,
    pub semantic_score: f64,
    pub experience_score: f64,
    pub created_at: String,
}
