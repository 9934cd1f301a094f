use crate::pkg::internal::adaptors::resumes::spec::ResumeEntry;
use crate::prelude::Result;
use sqlx::SqliteConnection;

pub struct ResumeSelector<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> ResumeSelector<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        ResumeSelector { pool }
    }

    pub async fn get_by_id(&mut self, resume_id: &str) -> Result<Option<ResumeEntry>> {
        let row = sqlx::query_as::<_, ResumeEntry>(
            "SELECT id, original_filename, file_path, name, email, phone,
                    skills, experience, education, created_at
             FROM resumes WHERE id = $1",
        )
        .bind(resume_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
