use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::config::Config;

/// Which collection an uploaded file belongs to. Appears in URLs as
/// `job-descriptions` or `resumes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    #[serde(rename = "job-descriptions")]
    JobDescription,
    #[serde(rename = "resumes")]
    Resume,
}

impl FileKind {
    pub fn table(self) -> &'static str {
        match self {
            FileKind::JobDescription => "job_descriptions",
            FileKind::Resume => "resumes",
        }
    }

    /// Storage folder configured for this kind.
    pub fn folder(self, config: &Config) -> &str {
        match self {
            FileKind::JobDescription => &config.jd_folder,
            FileKind::Resume => &config.resume_folder,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::JobDescription => "Job Description",
            FileKind::Resume => "Resume",
        }
    }
}

/// Metadata for an uploaded job description or resume. The blob itself lives in storage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRow {
    pub id: i64,
    pub original_filename: String,
    pub external_id: String,
    pub external_folder_id: String,
    pub created_at: DateTime<Utc>,
}
