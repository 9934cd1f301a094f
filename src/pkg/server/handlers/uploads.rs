use std::path::Path;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::conf::settings;
use crate::err::ErrorBody;
use crate::pkg::internal::adaptors::resumes::mutators::{CreateResumeData, ResumeMutator};
use crate::pkg::internal::parser::{self, ResumeInfo};
use crate::pkg::server::state::{AppState, GetTxn};
use crate::prelude::Result;

pub const ALLOWED_EXTENSIONS: [&str; 2] = ["pdf", "docx"];

#[derive(Serialize)]
pub struct UploadAccepted {
    pub resume_id: String,
    #[serde(flatten)]
    pub resume: ResumeInfo,
}

pub async fn create(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response> {
    let mut file: Option<(String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("");
        match field_name {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                file = Some((filename, data));
            }
            _ => {
                let _ = field.bytes().await?;
            }
        }
    }

    let Some((filename, data)) = file else {
        return Ok(reject("No file part"));
    };
    if let Some(message) = validate_upload(&filename, data.len() as u64) {
        return Ok(reject(&message));
    }

    let info = match parser::parse_resume(&data, &filename) {
        Ok(info) => info,
        Err(e) => {
            tracing::error!("failed to parse {}: {}", &filename, &e);
            return Ok(reject(&e.to_string()));
        }
    };

    let resume_id = Uuid::new_v4().to_string();
    let extension = file_extension(&filename);
    let stored_name = format!("{}-{}.{}", sanitize_filename(&filename), &resume_id, &extension);
    let file_path = state.upload_dir.join(&stored_name);
    tokio::fs::create_dir_all(&state.upload_dir).await?;
    tokio::fs::write(&file_path, &data).await?;
    tracing::debug!("stored {} bytes at {}", data.len(), file_path.display());

    let mut tx = state.db_pool.begin_txn().await?;
    let entry = ResumeMutator::new(&mut tx)
        .create(CreateResumeData {
            id: resume_id,
            original_filename: filename,
            file_path: file_path.to_string_lossy().into_owned(),
            info: info.clone(),
        })
        .await?;
    tx.commit().await?;
    tracing::info!("parsed resume {} stored as {}", &entry.original_filename, &entry.id);

    Ok(Json(UploadAccepted {
        resume_id: entry.id,
        resume: info,
    })
    .into_response())
}

// Validation and parse failures come back as 200 with an error body; the
// in-page handler renders the message verbatim.
fn reject(message: &str) -> Response {
    Json(ErrorBody::new(message)).into_response()
}

pub fn validate_upload(filename: &str, size: u64) -> Option<String> {
    if filename.is_empty() {
        return Some("No selected file".to_string());
    }
    let extension = file_extension(filename);
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Some("File type not allowed".to_string());
    }
    if size > settings.max_upload_size {
        return Some(format!(
            "File too large. Maximum size is {}MB",
            settings.max_upload_size / (1024 * 1024)
        ));
    }
    None
}

fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn sanitize_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("resume");
    let cleaned: String = stem
        .chars()
        .take(64)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upload() {
        assert_eq!(validate_upload("", 10), Some("No selected file".to_string()));
        assert_eq!(
            validate_upload("resume.txt", 10),
            Some("File type not allowed".to_string())
        );
        let limit_mb = settings.max_upload_size / (1024 * 1024);
        assert_eq!(
            validate_upload("resume.pdf", settings.max_upload_size + 1),
            Some(format!("File too large. Maximum size is {}MB", limit_mb))
        );
        assert_eq!(validate_upload("resume.pdf", 10), None);
        assert_eq!(validate_upload("Resume.DOCX", 10), None);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("resume.pdf"), "resume");
        assert_eq!(sanitize_filename("my resume (final).docx"), "my_resume__final_");
        assert_eq!(sanitize_filename("../../etc/passwd.pdf"), "passwd");
    }

    #[test]
    fn test_accepted_reply_flattens_parsed_fields() {
        let reply = UploadAccepted {
            resume_id: "abc-123".into(),
            resume: ResumeInfo {
                name: Some("John Doe".into()),
                email: None,
                phone: None,
                skills: vec!["python".into()],
                experience: String::new(),
                education: String::new(),
            },
        };
        let value = serde_json::to_value(&reply).expect("serialize reply");
        assert_eq!(value["resume_id"], "abc-123");
        assert_eq!(value["name"], "John Doe");
        assert_eq!(value["skills"][0], "python");
        assert!(value.get("resume").is_none());
    }
}
