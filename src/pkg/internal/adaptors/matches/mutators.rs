use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::pkg::internal::adaptors::matches::spec::MatchEntry;
use crate::pkg::internal::matching::MatchScores;
use crate::prelude::Result;

pub struct MatchMutator<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> MatchMutator<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        MatchMutator { pool }
    }

    pub async fn create(
        &mut self,
        resume_id: &str,
        job_id: &str,
        scores: &MatchScores,
    ) -> Result<MatchEntry> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();
        let row = sqlx::query_as::<_, MatchEntry>(
            r#"
            INSERT INTO match_results (id, resume_id, job_id, total_score, keyword_score, semantic_score, experience_score, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, resume_id, job_id, total_score, keyword_score, semantic_score, experience_score, created_at
            "#,
        )
        .bind(&id)
        .bind(resume_id)
        .bind(job_id)
        .bind(scores.total_score)
        .bind(scores.keyword_score)
        .bind(scores.semantic_score)
        .bind(scores.experience_score)
        .bind(&created_at)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
