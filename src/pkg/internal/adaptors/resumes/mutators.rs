use crate::pkg::internal::adaptors::resumes::spec::ResumeEntry;
use crate::pkg::internal::parser::ResumeInfo;
use crate::prelude::Result;
use chrono::Utc;
use sqlx::SqliteConnection;

pub struct CreateResumeData {
    pub id: String,
    pub original_filename: String,
    pub file_path: String,
    pub info: ResumeInfo,
}

pub struct ResumeMutator<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> ResumeMutator<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        ResumeMutator { pool }
    }

    pub async fn create(&mut self, resume: CreateResumeData) -> Result<ResumeEntry> {
        let skills = serde_json::to_string(&resume.info.skills)?;
        let created_at = Utc::now().to_rfc3339();
        let row = sqlx::query_as::<_, ResumeEntry>(
            r#"
            INSERT INTO resumes (id, original_filename, file_path, name, email, phone, skills, experience, education, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, original_filename, file_path, name, email, phone, skills, experience, education, created_at
            "#,
        )
        .bind(&resume.id)
        .bind(&resume.original_filename)
        .bind(&resume.file_path)
        .bind(&resume.info.name)
        .bind(&resume.info.email)
        .bind(&resume.info.phone)
        .bind(&skills)
        .bind(&resume.info.experience)
        .bind(&resume.info.education)
        .bind(&created_at)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
