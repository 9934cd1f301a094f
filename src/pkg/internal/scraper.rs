use std::collections::{HashMap, HashSet};
use std::time::Duration;

use rand::Rng;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::conf::settings;
use crate::pkg::internal::parser;
use crate::prelude::Result;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const SITE_ROOT: &str = "https://www.indeed.com";
const RESULTS_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub description: String,
    pub link: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub total_jobs: usize,
    pub unique_companies: usize,
    pub locations: Vec<String>,
    pub top_skills: Vec<String>,
}

pub struct JobScraper {
    http: reqwest::Client,
    base_url: String,
}

impl JobScraper {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(JobScraper {
            http,
            base_url: settings.scrape_base_url.clone(),
        })
    }

    pub async fn scrape(&self, query: &str, location: &str, num_pages: u32) -> Result<Vec<ScrapedJob>> {
        let mut jobs = Vec::new();
        for page in 0..num_pages {
            let start = page * RESULTS_PER_PAGE;
            tracing::info!("scraping {} page {}", &self.base_url, page + 1);
            let response = self
                .http
                .get(&self.base_url)
                .query(&[("q", query), ("l", location), ("start", &start.to_string())])
                .send()
                .await?;
            if !response.status().is_success() {
                tracing::error!(
                    "failed to retrieve page {}, status code: {}",
                    page + 1,
                    response.status()
                );
                continue;
            }
            let body = response.text().await?;
            jobs.extend(parse_listings(&body));

            // Random delay between requests to avoid hammering the site.
            let delay = rand::rng().random_range(1.0..3.0);
            tokio::time::sleep(Duration::from_secs_f64(delay)).await;
        }
        Ok(jobs)
    }
}

// Cards missing a title, company, or location are skipped.
pub fn parse_listings(html: &str) -> Vec<ScrapedJob> {
    let document = Html::parse_document(html);
    let card_sel = Selector::parse("div.job_seen_beacon").unwrap();
    let title_sel = Selector::parse("h2.jobTitle").unwrap();
    let company_sel = Selector::parse("span.companyName").unwrap();
    let location_sel = Selector::parse("div.companyLocation").unwrap();
    let salary_sel = Selector::parse("div.metadata.salary-snippet-container").unwrap();
    let snippet_sel = Selector::parse("div.job-snippet").unwrap();
    let link_sel = Selector::parse("a[href]").unwrap();

    let mut jobs = Vec::new();
    for card in document.select(&card_sel) {
        let title = select_text(&card, &title_sel);
        let company = select_text(&card, &company_sel);
        let location = select_text(&card, &location_sel);
        let (title, company, location) = match (title, company, location) {
            (Some(t), Some(c), Some(l)) => (t, c, l),
            _ => continue,
        };

        let salary = select_text(&card, &salary_sel).unwrap_or_else(|| "Not provided".into());
        let description =
            select_text(&card, &snippet_sel).unwrap_or_else(|| "No description available".into());
        let link = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| format!("{}{}", SITE_ROOT, href));
        let skills = parser::extract_skills(&description);

        jobs.push(ScrapedJob {
            title,
            company,
            location,
            salary,
            description,
            link,
            skills,
        });
    }
    jobs
}

fn select_text(card: &scraper::ElementRef, selector: &Selector) -> Option<String> {
    card.select(selector).next().and_then(|el| {
        let text = el.text().collect::<String>().trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    })
}

pub fn summary(jobs: &[ScrapedJob]) -> JobSummary {
    let companies: HashSet<&str> = jobs.iter().map(|j| j.company.as_str()).collect();
    let locations: HashSet<&str> = jobs.iter().map(|j| j.location.as_str()).collect();
    let mut locations: Vec<String> = locations.into_iter().map(str::to_string).collect();
    locations.sort();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for job in jobs {
        for skill in &job.skills {
            *counts.entry(skill.as_str()).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    JobSummary {
        total_jobs: jobs.len(),
        unique_companies: companies.len(),
        locations,
        top_skills: ranked.into_iter().take(5).map(|(s, _)| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
        <div class="job_seen_beacon">
          <h2 class="jobTitle"><a href="/rc/clk?jk=abc123"><span>Data Scientist</span></a></h2>
          <span class="companyName">Tech Corp</span>
          <div class="companyLocation">New York, NY</div>
          <div class="metadata salary-snippet-container">$120,000 a year</div>
          <div class="job-snippet">Looking for python and machine learning experience.</div>
        </div>
        <div class="job_seen_beacon">
          <h2 class="jobTitle">Ghost Listing</h2>
        </div>
        <div class="job_seen_beacon">
          <h2 class="jobTitle">Backend Engineer</h2>
          <span class="companyName">Widget Works</span>
          <div class="companyLocation">Remote</div>
          <div class="job-snippet">Python services speaking SQL.</div>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_listings_extracts_complete_cards() {
        let jobs = parse_listings(RESULTS_PAGE);
        assert_eq!(jobs.len(), 2);

        let first = &jobs[0];
        assert_eq!(first.title, "Data Scientist");
        assert_eq!(first.company, "Tech Corp");
        assert_eq!(first.location, "New York, NY");
        assert_eq!(first.salary, "$120,000 a year");
        assert_eq!(
            first.link.as_deref(),
            Some("https://www.indeed.com/rc/clk?jk=abc123")
        );
        assert_eq!(first.skills, vec!["python", "machine learning"]);
    }

    #[test]
    fn test_parse_listings_applies_defaults() {
        let jobs = parse_listings(RESULTS_PAGE);
        let second = &jobs[1];
        assert_eq!(second.salary, "Not provided");
        assert_eq!(second.link, None);
        assert_eq!(second.skills, vec!["python", "sql"]);
    }

    #[test]
    fn test_summary_ranks_skills_by_frequency() {
        let jobs = parse_listings(RESULTS_PAGE);
        let summary = summary(&jobs);
        assert_eq!(summary.total_jobs, 2);
        assert_eq!(summary.unique_companies, 2);
        assert_eq!(summary.locations, vec!["New York, NY", "Remote"]);
        assert_eq!(summary.top_skills[0], "python");
    }
}
