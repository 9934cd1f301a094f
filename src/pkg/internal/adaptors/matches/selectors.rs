use sqlx::SqliteConnection;

use crate::pkg::internal::adaptors::matches::spec::MatchEntry;
use crate::prelude::Result;

pub struct MatchSelector<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> MatchSelector<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        MatchSelector { pool }
    }

    pub async fn get_filtered(
        &mut self,
        resume_id: Option<&str>,
        job_id: Option<&str>,
    ) -> Result<Vec<MatchEntry>> {
        let mut query = String::from(
            "SELECT id, resume_id, job_id, total_score, keyword_score, semantic_score, experience_score, created_at
             FROM match_results WHERE 1=1",
        );
        let mut param_count = 0;

        if resume_id.is_some() {
            param_count += 1;
            query.push_str(&format!(" AND resume_id = ${}", param_count));
        }
        if job_id.is_some() {
            param_count += 1;
            query.push_str(&format!(" AND job_id = ${}", param_count));
        }
        query.push_str(" ORDER BY total_score DESC");

        let mut q = sqlx::query_as::<_, MatchEntry>(&query);
        if let Some(resume_id) = resume_id {
            q = q.bind(resume_id);
        }
        if let Some(job_id) = job_id {
            q = q.bind(job_id);
        }
        let rows = q.fetch_all(&mut *self.pool).await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::adaptors::matches::mutators::MatchMutator;
    use crate::pkg::internal::matching::MatchScores;
    use crate::pkg::server::state::memory_pool;
    use tracing_test::traced_test;

    fn scores(total: f64) -> MatchScores {
        MatchScores {
            total_score: total,
            keyword_score: 50.0,
            semantic_score: 10.0,
            experience_score: 100.0,
        }
    }

    async fn seed_refs(conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            "INSERT INTO resumes (id, original_filename, file_path, created_at)
             VALUES ('r1', 'a.pdf', 'uploads/a.pdf', '2026-01-01T00:00:00+00:00')",
        )
        .execute(&mut *conn)
        .await?;
        for job in ["j1", "j2"] {
            sqlx::query(
                "INSERT INTO jobs (id, title, company, location, created_at)
                 VALUES ($1, 'Role', 'Tech Corp', 'Remote', '2026-01-01T00:00:00+00:00')",
            )
            .bind(job)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_get_filtered_by_resume_and_job() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;
        seed_refs(&mut conn).await?;

        MatchMutator::new(&mut conn).create("r1", "j1", &scores(80.0)).await?;
        MatchMutator::new(&mut conn).create("r1", "j2", &scores(40.0)).await?;

        let all = MatchSelector::new(&mut conn).get_filtered(None, None).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].total_score, 80.0);

        let for_resume = MatchSelector::new(&mut conn)
            .get_filtered(Some("r1"), None)
            .await?;
        assert_eq!(for_resume.len(), 2);

        let for_job = MatchSelector::new(&mut conn)
            .get_filtered(None, Some("j2"))
            .await?;
        assert_eq!(for_job.len(), 1);
        assert_eq!(for_job[0].job_id, "j2");

        let none = MatchSelector::new(&mut conn)
            .get_filtered(Some("r1"), Some("absent"))
            .await?;
        assert!(none.is_empty());
        Ok(())
    }
}
