pub mod jobs;
pub mod matches;
pub mod probes;
pub mod resumes;
pub mod ui;
pub mod uploads;
