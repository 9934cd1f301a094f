use std::io::Cursor;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::err::Error;
use crate::prelude::Result;

// The job scraper matches against the same list.
pub const SKILL_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "c++",
    "javascript",
    "react",
    "node.js",
    "sql",
    "machine learning",
    "data analysis",
];

const EXPERIENCE_KEYWORDS: &[&str] = &["experience", "work history", "employment"];
const EDUCATION_KEYWORDS: &[&str] = &["education", "university", "college", "degree"];

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

pub fn parse_resume(data: &[u8], filename: &str) -> Result<ResumeInfo> {
    let raw = extract_text(data, filename)?;
    let text = clean_text(&raw);
    if text.is_empty() {
        return Err(Error::Extraction("Failed to extract text from file".into()));
    }
    Ok(extract_information(&raw, &text))
}

pub fn extract_text(data: &[u8], filename: &str) -> Result<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "pdf" => extract_text_from_pdf(data),
        "docx" => extract_text_from_docx(data),
        _ => Err(Error::Extraction("Unsupported file format".into())),
    }
}

fn extract_text_from_pdf(data: &[u8]) -> Result<String> {
    use lopdf::Document;
    let cursor = Cursor::new(data);
    let doc = Document::load_from(cursor)
        .map_err(|e| Error::Extraction(format!("Error parsing PDF: {}", e)))?;

    let pages = doc.get_pages();
    let mut text = String::new();

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push(' ');
            }
            Err(e) => {
                tracing::warn!("failed to extract text from page {}: {}", page_num, e);
            }
        }
    }

    if text.trim().is_empty() {
        return Err(Error::Extraction("Failed to extract text from file".into()));
    }
    Ok(text)
}

fn extract_text_from_docx(data: &[u8]) -> Result<String> {
    use docx_rs::read_docx;
    let docx =
        read_docx(data).map_err(|e| Error::Extraction(format!("Error parsing DOCX: {}", e)))?;
    let mut text = String::new();
    for paragraph in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = paragraph {
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// raw keeps the line layout the name heuristic depends on; text is the
// cleaned single-line form used for everything else.
pub fn extract_information(raw: &str, text: &str) -> ResumeInfo {
    ResumeInfo {
        name: extract_name(raw),
        email: extract_email(text),
        phone: extract_phone(text),
        skills: extract_skills(text),
        experience: matching_sentences(text, EXPERIENCE_KEYWORDS),
        education: matching_sentences(text, EDUCATION_KEYWORDS),
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().to_string())
}

// Keywords match on non-alphanumeric boundaries: multi-word skills and ones
// ending in symbols ("c++", "node.js") are found, "java" inside "javascript"
// is not.
pub fn extract_skills(text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    let bytes = haystack.as_bytes();
    let mut skills = Vec::new();
    for &skill in SKILL_KEYWORDS {
        let found = haystack.match_indices(skill).any(|(idx, matched)| {
            let before_ok = idx == 0 || !bytes[idx - 1].is_ascii_alphanumeric();
            let end = idx + matched.len();
            let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
            before_ok && after_ok
        });
        if found {
            skills.push(skill.to_string());
        }
    }
    skills
}

// Resumes open with the candidate's name more often than not; the first
// plausible line near the top wins.
pub fn extract_name(raw: &str) -> Option<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(10)
        .find(|line| looks_like_name(line))
        .map(|line| line.to_string())
}

fn looks_like_name(line: &str) -> bool {
    let lowered = line.to_lowercase();
    if ["resume", "curriculum", "vitae"].iter().any(|w| lowered.contains(w)) {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    words.iter().all(|word| {
        let starts_upper = word.chars().next().is_some_and(|c| c.is_uppercase());
        starts_upper
            && word
                .chars()
                .all(|c| c.is_alphabetic() || c == '.' || c == '\'' || c == '-')
    })
}

fn matching_sentences(text: &str, keywords: &[&str]) -> String {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| {
            let lowered = sentence.to_lowercase();
            keywords.iter().any(|keyword| lowered.contains(keyword))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
