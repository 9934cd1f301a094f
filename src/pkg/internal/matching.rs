use std::collections::{BTreeMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

const KEYWORD_WEIGHT: f64 = 0.4;
const SEMANTIC_WEIGHT: f64 = 0.4;
const EXPERIENCE_WEIGHT: f64 = 0.2;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "being", "but", "by", "can", "could", "did", "do", "does", "doing",
    "down", "during", "each", "few", "for", "from", "further", "had", "has", "have", "having",
    "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "me", "more", "most", "my", "no", "nor", "not", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some",
    "such", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you",
    "your",
];

lazy_static! {
    static ref YEARS_RE: Regex = Regex::new(r"(?i)(\d+)\s*\+?\s*years?").unwrap();
}

#[derive(Debug, Clone)]
pub struct ResumeProfile {
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

#[derive(Debug, Clone)]
pub struct JobProfile {
    pub skills: Vec<String>,
    pub description: String,
    pub required_experience: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScores {
    pub total_score: f64,
    pub keyword_score: f64,
    pub semantic_score: f64,
    pub experience_score: f64,
}

// Component scores and the weighted total are all on a 0..=100 scale, rounded
// to two decimals.
pub fn match_resume_to_job(resume: &ResumeProfile, job: &JobProfile) -> MatchScores {
    let keyword = keyword_score(&resume.skills, &job.skills);
    let resume_text = format!("{} {}", resume.experience, resume.education);
    let semantic = semantic_similarity(&resume_text, &job.description);
    let experience = experience_score(&resume.experience, &job.required_experience);

    let total = (keyword * KEYWORD_WEIGHT + semantic * SEMANTIC_WEIGHT
        + experience * EXPERIENCE_WEIGHT)
        * 100.0;

    MatchScores {
        total_score: round2(total),
        keyword_score: round2(keyword * 100.0),
        semantic_score: round2(semantic * 100.0),
        experience_score: round2(experience * 100.0),
    }
}

pub fn rank_jobs(resume: &ResumeProfile, jobs: &[JobProfile]) -> Vec<(usize, MatchScores)> {
    let mut ranked: Vec<(usize, MatchScores)> = jobs
        .iter()
        .enumerate()
        .map(|(idx, job)| (idx, match_resume_to_job(resume, job)))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.total_score
            .partial_cmp(&a.1.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

pub fn keyword_score(resume_skills: &[String], job_skills: &[String]) -> f64 {
    let job: HashSet<String> = job_skills.iter().map(|s| s.to_lowercase()).collect();
    if job.is_empty() {
        return 0.0;
    }
    let resume: HashSet<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();
    resume.intersection(&job).count() as f64 / job.len() as f64
}

// Cosine similarity between tf-idf vectors of the two texts, over the
// two-document corpus they form.
pub fn semantic_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = preprocess(a);
    let tokens_b = preprocess(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let mut vocab: BTreeMap<&str, usize> = BTreeMap::new();
    for token in tokens_a.iter().chain(tokens_b.iter()) {
        let next = vocab.len();
        vocab.entry(token.as_str()).or_insert(next);
    }

    let tf_a = term_frequencies(&tokens_a, &vocab);
    let tf_b = term_frequencies(&tokens_b, &vocab);

    // Smoothed idf over a corpus of two documents, as in
    // ln((1 + n) / (1 + df)) + 1.
    let n = 2.0;
    let mut weights_a = vec![0.0; vocab.len()];
    let mut weights_b = vec![0.0; vocab.len()];
    for (&_, &idx) in &vocab {
        let df = (tf_a[idx] > 0.0) as u32 + (tf_b[idx] > 0.0) as u32;
        let idf = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
        weights_a[idx] = tf_a[idx] * idf;
        weights_b[idx] = tf_b[idx] * idf;
    }

    normalize(&mut weights_a);
    normalize(&mut weights_b);
    weights_a
        .iter()
        .zip(weights_b.iter())
        .map(|(x, y)| x * y)
        .sum()
}

// 1.0 when the job states no years requirement or the resume meets it,
// otherwise the ratio of held to required years.
pub fn experience_score(resume_experience: &str, required_experience: &str) -> f64 {
    let required = extract_years(required_experience);
    if required == 0 {
        return 1.0;
    }
    let held = extract_years(resume_experience);
    if held >= required {
        1.0
    } else {
        held as f64 / required as f64
    }
}

pub fn extract_years(text: &str) -> u32 {
    YEARS_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn preprocess(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|word| word.len() > 1 && !STOPWORDS.contains(word))
        .map(str::to_string)
        .collect()
}

fn term_frequencies(tokens: &[String], vocab: &BTreeMap<&str, usize>) -> Vec<f64> {
    let mut tf = vec![0.0; vocab.len()];
    for token in tokens {
        if let Some(&idx) = vocab.get(token.as_str()) {
            tf[idx] += 1.0;
        }
    }
    tf
}

fn normalize(weights: &mut [f64]) {
    let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in weights.iter_mut() {
            *w /= norm;
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
