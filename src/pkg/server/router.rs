use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::{routing::get, Router};

use super::handlers;
use super::handlers::probes::{healthz, livez};
use super::state::AppState;
use crate::conf::settings;
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    Ok(routes(AppState::new().await?))
}

pub fn routes(state: AppState) -> Router {
    // The body cap sits above the document cap, so an oversized file reaches
    // the handler's own size check and gets a json error instead of a 413.
    let body_limit = settings.max_upload_size as usize + 1024 * 1024;
    Router::new()
        .route("/", get(handlers::ui::home).post(handlers::uploads::create))
        .route("/static/js/script.js", get(handlers::ui::upload_script))
        .route("/upload", post(handlers::uploads::create))
        .route("/resume/:resume_id", get(handlers::resumes::view))
        .route("/jobs", post(handlers::jobs::create))
        .route("/jobs", get(handlers::jobs::list))
        .route("/matches", post(handlers::matches::create))
        .route("/matches", get(handlers::matches::list))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::multipart::{Form, Part};
    use serde_json::Value;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    use super::*;
    use crate::pkg::internal::parser::fixtures;
    use crate::pkg::internal::uploader::{UploadClient, UploadOutcome};
    use crate::pkg::server::state::memory_pool;

    async fn spawn_app() -> Result<(String, TempDir)> {
        let pool = memory_pool().await?;
        let dir = TempDir::new()?;
        let state = AppState {
            db_pool: Arc::new(pool),
            upload_dir: dir.path().to_path_buf(),
        };
        let app = routes(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base = format!("http://{}", listener.local_addr()?);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });
        Ok((base, dir))
    }

    fn file_form(filename: &str, data: Vec<u8>) -> Form {
        Form::new().part("file", Part::bytes(data).file_name(filename.to_string()))
    }

    async fn post_upload(base: &str, path: &str, form: Form) -> Result<reqwest::Response> {
        let response = reqwest::Client::new()
            .post(format!("{}{}", base, path))
            .multipart(form)
            .send()
            .await?;
        Ok(response)
    }

    #[tokio::test]
    #[traced_test]
    async fn test_home_page_serves_upload_form() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let response = reqwest::get(format!("{}/", base)).await?;
        assert_eq!(response.status(), 200);
        let body = response.text().await?;
        assert!(body.contains("Resume Matcher"));
        assert!(body.contains(r#"id="upload-form""#));
        assert!(body.contains(r#"id="result""#));
        assert!(body.contains(r#"src="/static/js/script.js""#));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upload_script_served_as_javascript() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let response = reqwest::get(format!("{}/static/js/script.js", base)).await?;
        assert_eq!(response.status(), 200);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        assert_eq!(content_type, "application/javascript");

        let body = response.text().await?;
        assert!(body.contains("document.getElementById('upload-form')"));
        assert!(body.contains("document.getElementById('result')"));
        // Pages without the form get a silent no-op, not a throw.
        assert!(body.contains("if (uploadForm)"));
        assert!(body.contains("new FormData"));
        assert!(body.contains("/resume/${data.resume_id}"));
        assert!(body.contains("An error occurred while uploading the resume."));
        // Submission must be intercepted before the request goes out.
        let prevent = body.find("e.preventDefault()").expect("preventDefault present");
        let fetch = body.find("fetch('/upload'").expect("fetch present");
        assert!(prevent < fetch);
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upload_without_file_part_is_rejected() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let form = Form::new().text("note", "no file here");
        let response = post_upload(&base, "/upload", form).await?;
        assert_eq!(response.status(), 200);
        let value: Value = response.json().await?;
        assert_eq!(value["error"], "No file part");
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upload_with_empty_filename_is_rejected() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let response = post_upload(&base, "/upload", file_form("", b"data".to_vec())).await?;
        assert_eq!(response.status(), 200);
        let value: Value = response.json().await?;
        assert_eq!(value["error"], "No selected file");
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upload_with_disallowed_extension_is_rejected() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let response =
            post_upload(&base, "/upload", file_form("resume.txt", b"plain text".to_vec())).await?;
        assert_eq!(response.status(), 200);
        let value: Value = response.json().await?;
        assert_eq!(value["error"], "File type not allowed");
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_corrupt_pdf_reports_parse_error_in_band() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let response = post_upload(
            &base,
            "/upload",
            file_form("resume.pdf", b"not really a pdf".to_vec()),
        )
        .await?;
        assert_eq!(response.status(), 200);
        let value: Value = response.json().await?;
        assert!(value["error"]
            .as_str()
            .expect("error message")
            .starts_with("Error parsing PDF"));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upload_docx_end_to_end() -> Result<()> {
        let (base, dir) = spawn_app().await?;
        let response = post_upload(
            &base,
            "/upload",
            file_form("john resume.docx", fixtures::sample_docx()),
        )
        .await?;
        assert_eq!(response.status(), 200);
        let value: Value = response.json().await?;
        assert!(value.get("error").is_none());
        let resume_id = value["resume_id"].as_str().expect("resume id").to_string();
        assert_eq!(value["name"], "John Doe");
        assert_eq!(value["email"], "john.doe@example.com");
        assert_eq!(value["phone"], "555-123-4567");
        assert!(value["skills"]
            .as_array()
            .expect("skills array")
            .iter()
            .any(|s| s == "python"));

        let stored: Vec<_> = std::fs::read_dir(dir.path())?
            .collect::<std::io::Result<Vec<_>>>()?;
        assert_eq!(stored.len(), 1);
        let stored_name = stored[0].file_name().to_string_lossy().into_owned();
        assert!(stored_name.starts_with("john_resume-"));
        assert!(stored_name.ends_with(".docx"));
        assert!(stored_name.contains(&resume_id));

        let view = reqwest::get(format!("{}/resume/{}", base, resume_id)).await?;
        assert_eq!(view.status(), 200);
        let html = view.text().await?;
        assert!(html.contains("John Doe"));
        assert!(html.contains("python"));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upload_pdf_end_to_end() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let data = fixtures::minimal_pdf(
            "Jane Roe jane.roe@example.com 555-987-6543 3 years of experience with sql",
        );
        let response = post_upload(&base, "/upload", file_form("jane.pdf", data)).await?;
        assert_eq!(response.status(), 200);
        let value: Value = response.json().await?;
        assert!(value.get("error").is_none());
        assert!(!value["resume_id"].as_str().expect("resume id").is_empty());
        assert_eq!(value["email"], "jane.roe@example.com");
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_root_post_also_accepts_uploads() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let form = Form::new().text("note", "no file here");
        let response = post_upload(&base, "/", form).await?;
        assert_eq!(response.status(), 200);
        let value: Value = response.json().await?;
        assert_eq!(value["error"], "No file part");
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_resume_view_missing_returns_404() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let response = reqwest::get(format!("{}/resume/does-not-exist", base)).await?;
        assert_eq!(response.status(), 404);
        let value: Value = response.json().await?;
        assert!(value["error"]
            .as_str()
            .expect("error message")
            .contains("no resume"));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_jobs_and_matches_flow() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let client = reqwest::Client::new();

        let data_scientist = serde_json::json!({
            "id": "job-ds",
            "title": "Data Scientist",
            "company": "Insight Labs",
            "location": "Remote",
            "description": "We are looking for a data scientist with strong Python \
                and machine learning skills. Requires 3 years of experience.",
            "skills": ["python", "machine learning", "statistics", "data visualization"],
        });
        let software_engineer = serde_json::json!({
            "id": "job-se",
            "title": "Software Engineer",
            "company": "Widget Works",
            "location": "Berlin",
            "description": "Seeking a software engineer for web application work. \
                Requires 5 years of experience.",
            "skills": ["java", "javascript", "sql", "rest api"],
        });
        for job in [&data_scientist, &software_engineer] {
            let response = client.post(format!("{}/jobs", base)).json(job).send().await?;
            assert_eq!(response.status(), 200);
        }
        let listed: Value = client.get(format!("{}/jobs", base)).send().await?.json().await?;
        assert_eq!(listed.as_array().expect("job list").len(), 2);

        let paragraphs = [
            "John Doe",
            "john.doe@example.com 555-123-4567",
            "Skills: Python, SQL, machine learning, data analysis",
            "5 years of experience in software development.",
            "Education: Bachelor of Science from State University.",
        ];
        let upload: Value = post_upload(
            &base,
            "/upload",
            file_form("resume.docx", fixtures::minimal_docx(&paragraphs)),
        )
        .await?
        .json()
        .await?;
        let resume_id = upload["resume_id"].as_str().expect("resume id").to_string();

        let matches: Value = client
            .post(format!("{}/matches", base))
            .json(&serde_json::json!({ "resume_id": resume_id }))
            .send()
            .await?
            .json()
            .await?;
        let matches = matches.as_array().expect("match list");
        assert_eq!(matches.len(), 2);
        // Twice the required-skill overlap puts the data scientist role first.
        assert_eq!(matches[0]["job"]["title"], "Data Scientist");
        assert_eq!(matches[0]["scores"]["keyword_score"], 50.0);
        assert_eq!(matches[1]["scores"]["keyword_score"], 25.0);
        assert_eq!(matches[0]["scores"]["experience_score"], 100.0);
        let best = matches[0]["scores"]["total_score"].as_f64().expect("total");
        let next = matches[1]["scores"]["total_score"].as_f64().expect("total");
        assert!(best > next);

        let stored: Value = client
            .get(format!("{}/matches?resume_id={}", base, resume_id))
            .send()
            .await?
            .json()
            .await?;
        assert_eq!(stored.as_array().expect("stored matches").len(), 2);
        let by_job: Value = client
            .get(format!("{}/matches?job_id=job-se", base))
            .send()
            .await?
            .json()
            .await?;
        assert_eq!(by_job.as_array().expect("filtered matches").len(), 1);

        let response = client
            .post(format!("{}/matches", base))
            .json(&serde_json::json!({ "resume_id": "absent" }))
            .send()
            .await?;
        assert_eq!(response.status(), 404);
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upload_client_against_live_service() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        let client = UploadClient::new(&base)?;

        let outcome = client.submit("resume.docx", fixtures::sample_docx()).await;
        let UploadOutcome::Accepted { resume_id } = outcome else {
            panic!("expected accepted outcome, got {:?}", outcome);
        };
        assert!(!resume_id.is_empty());

        // Extra text fields ride along and are ignored by the service.
        let outcome = client
            .submit_with_fields(
                "resume.docx",
                fixtures::sample_docx(),
                &[("source", "cli"), ("note", "second copy")],
            )
            .await;
        assert!(matches!(outcome, UploadOutcome::Accepted { .. }));

        let outcome = client.submit("resume.txt", b"plain".to_vec()).await;
        assert_eq!(
            outcome,
            UploadOutcome::Rejected {
                error: "File type not allowed".to_string()
            }
        );
        assert_eq!(outcome.to_html(), r#"<p class="error">File type not allowed</p>"#);
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upload_client_failure_on_unreachable_service() -> Result<()> {
        // Discard port, nothing listens here.
        let client = UploadClient::new("http://127.0.0.1:9")?;
        let outcome = client.submit("resume.pdf", b"data".to_vec()).await;
        assert_eq!(outcome, UploadOutcome::Failed);
        assert_eq!(
            outcome.to_html(),
            r#"<p class="error">An error occurred while uploading the resume.</p>"#
        );
        assert!(logs_contain("upload request failed"));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upload_client_failure_on_non_json_reply() -> Result<()> {
        let app = Router::new().route("/upload", post(|| async { "this is not json" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base = format!("http://{}", listener.local_addr()?);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });

        let client = UploadClient::new(&base)?;
        let outcome = client.submit("resume.pdf", b"data".to_vec()).await;
        assert_eq!(outcome, UploadOutcome::Failed);
        assert!(logs_contain("upload reply was not valid json"));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_probes() -> Result<()> {
        let (base, _dir) = spawn_app().await?;
        assert_eq!(reqwest::get(format!("{}/livez", base)).await?.status(), 200);
        assert_eq!(reqwest::get(format!("{}/healthz", base)).await?.status(), 200);
        Ok(())
    }
}
