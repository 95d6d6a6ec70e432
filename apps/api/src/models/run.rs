use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// One resume that met the threshold for a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub resume_filename: String,
    pub skill_overlap_percentage: f64,
}

/// Job-description filename to its matches, in resume order.
pub type MatchedResumes = BTreeMap<String, Vec<MatchEntry>>;

/// Summary statistics of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunAnalytics {
    pub total_resumes_processed: u32,
    /// Summed over job descriptions; a resume matching two roles counts twice.
    pub total_matched_resumes: u32,
    pub match_rate: f64,
    /// Job-description filename to (resume filename to overlap percentage).
    pub skill_overlap: BTreeMap<String, BTreeMap<String, f64>>,
    pub job_descriptions_scored: u32,
    #[serde(default)]
    pub job_descriptions_skipped: Vec<String>,
}

/// Persisted result of one full matching pass. Immutable after insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRunRow {
    pub id: i64,
    pub matched: Json<MatchedResumes>,
    pub unmatched: Json<Vec<String>>,
    pub analytics: Json<RunAnalytics>,
    pub created_at: DateTime<Utc>,
}

/// Listing view of a run without the per-resume detail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RunSummaryRow {
    pub id: i64,
    pub total_resumes_processed: i64,
    pub total_matched_resumes: i64,
    pub match_rate: f64,
    pub created_at: DateTime<Utc>,
}
