use std::fmt;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::prelude::Result;

// Failed covers everything outside the reply contract: transport errors,
// unreadable bodies, replies carrying neither an error nor a resume id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted { resume_id: String },
    Rejected { error: String },
    Failed,
}

impl UploadOutcome {
    pub fn to_html(&self) -> String {
        match self {
            UploadOutcome::Accepted { resume_id } => format!(
                "<p>Resume uploaded and parsed successfully!</p>\n\
                 <a href=\"/resume/{}\">View Parsed Resume</a>",
                resume_id
            ),
            UploadOutcome::Rejected { error } => {
                format!(r#"<p class="error">{}</p>"#, error)
            }
            UploadOutcome::Failed => {
                r#"<p class="error">An error occurred while uploading the resume.</p>"#.to_string()
            }
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Accepted { resume_id } => {
                write!(f, "resume uploaded and parsed successfully: /resume/{}", resume_id)
            }
            UploadOutcome::Rejected { error } => write!(f, "upload rejected: {}", error),
            UploadOutcome::Failed => write!(f, "an error occurred while uploading the resume"),
        }
    }
}

pub struct UploadClient {
    http: reqwest::Client,
    endpoint: String,
}

impl UploadClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(UploadClient {
            http,
            endpoint: format!("{}/upload", base_url.trim_end_matches('/')),
        })
    }

    pub async fn submit(&self, filename: &str, data: Vec<u8>) -> UploadOutcome {
        self.submit_with_fields(filename, data, &[]).await
    }

    // Wire trouble never surfaces as an error; it is logged and reported as
    // the Failed outcome.
    pub async fn submit_with_fields(
        &self,
        filename: &str,
        data: Vec<u8>,
        fields: &[(&str, &str)],
    ) -> UploadOutcome {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        let part = Part::bytes(data).file_name(filename.to_string());
        let part = match part.mime_str(mime_for_extension(&extension)) {
            Ok(part) => part,
            Err(e) => {
                tracing::error!("upload request failed: {}", e);
                return UploadOutcome::Failed;
            }
        };
        let mut form = Form::new().part("file", part);
        for (name, value) in fields {
            form = form.text(name.to_string(), value.to_string());
        }

        let response = match self.http.post(&self.endpoint).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("upload request failed: {}", e);
                return UploadOutcome::Failed;
            }
        };
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("upload request failed: {}", e);
                return UploadOutcome::Failed;
            }
        };
        outcome_from_body(&body)
    }
}

// A truthy error field wins over everything else; otherwise a string
// resume_id means success.
pub fn outcome_from_body(body: &str) -> UploadOutcome {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("upload reply was not valid json: {}", e);
            return UploadOutcome::Failed;
        }
    };
    if let Some(error) = value.get("error") {
        if is_truthy(error) {
            return UploadOutcome::Rejected {
                error: stringify(error),
            };
        }
    }
    match value.get("resume_id").and_then(Value::as_str) {
        Some(resume_id) => UploadOutcome::Accepted {
            resume_id: resume_id.to_string(),
        },
        None => {
            tracing::error!("upload reply carried neither an error nor a resume id");
            UploadOutcome::Failed
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
