use askama::Template;
use axum::response::{Html, IntoResponse};
use reqwest::header::CONTENT_TYPE;

use crate::{pkg::server::uispec::Index, prelude::Result};

const UPLOAD_SCRIPT: &str = include_str!("../../../../static/js/script.js");

pub async fn home() -> Result<Html<String>> {
    let template = Index {};
    Ok(Html(template.render()?))
}

pub async fn upload_script() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/javascript")], UPLOAD_SCRIPT)
}
