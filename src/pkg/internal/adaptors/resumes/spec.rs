use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeEntry {
    pub id: String,
    pub original_filename: String,
    pub file_path: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: String,
    pub experience: String,
    pub education: String,
    pub created_at: String,
}

impl ResumeEntry {
    // skills is stored as a JSON array.
    pub fn skills_list(&self) -> Vec<String> {
        serde_json::from_str(&self.skills).unwrap_or_default()
    }
}
