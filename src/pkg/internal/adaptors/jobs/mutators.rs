use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::pkg::server::handlers::jobs::CreateJobInput;
use crate::prelude::Result;

pub struct JobMutator<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        JobMutator { pool }
    }

    // A caller-supplied id that already exists refreshes the row in place.
    pub async fn upsert(&mut self, job: CreateJobInput) -> Result<JobEntry> {
        let id = job.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let skills = serde_json::to_string(&job.skills)?;
        let created_at = Utc::now().to_rfc3339();
        let row = sqlx::query_as::<_, JobEntry>(
            r#"
            INSERT INTO jobs (id, title, company, location, description, skills, salary, url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                title = excluded.title,
                company = excluded.company,
                location = excluded.location,
                description = excluded.description,
                skills = excluded.skills,
                salary = excluded.salary,
                url = excluded.url
            RETURNING id, title, company, location, description, skills, salary, url, created_at
            "#,
        )
        .bind(&id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.description)
        .bind(&skills)
        .bind(&job.salary)
        .bind(&job.url)
        .bind(&created_at)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
