//! Matching and aggregation. Scores every (job description, resume) pair and
//! collects matched/unmatched lists plus summary analytics for one run.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analysis::overlap::{is_match, skill_overlap};
use crate::analysis::skills::{DocumentKind, SkillExtractor, SkillSet};
use crate::analysis::text::{extract_blocking, TextExtractor};
use crate::models::files::FileRow;
use crate::models::run::{MatchEntry, MatchedResumes, RunAnalytics};
use crate::storage::StorageGateway;

/// Everything a run produced. `warnings` are per-file problems that did not stop the run.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub matched: MatchedResumes,
    pub unmatched: Vec<String>,
    pub analytics: RunAnalytics,
    pub warnings: Vec<String>,
}

pub struct MatchPipeline<'a> {
    storage: &'a dyn StorageGateway,
    reader: Arc<dyn TextExtractor>,
    skills: &'a SkillExtractor,
    threshold: f64,
}

impl<'a> MatchPipeline<'a> {
    pub fn new(
        storage: &'a dyn StorageGateway,
        reader: Arc<dyn TextExtractor>,
        skills: &'a SkillExtractor,
        threshold: f64,
    ) -> Self {
        Self {
            storage,
            reader,
            skills,
            threshold,
        }
    }

    /// Runs one full pass over `jds` × `resumes`.
    ///
    /// Job descriptions that cannot be read or yield no skills are skipped and
    /// leave no trace in `matched`/`unmatched`. Each resume is read and scored for
    /// skills at most once per run.
    pub async fn run(&self, jds: &[FileRow], resumes: &[FileRow]) -> RunOutcome {
        let mut outcome = RunOutcome::default();
        let mut resume_skills: HashMap<i64, Option<SkillSet>> = HashMap::new();

        for jd in jds {
            let jd_skills = match self.document_skills(jd, DocumentKind::JobDescription).await {
                Ok(skills) if !skills.is_empty() => skills,
                Ok(_) => {
                    info!(
                        "No skills extracted from job description '{}'; skipping",
                        jd.original_filename
                    );
                    outcome
                        .analytics
                        .job_descriptions_skipped
                        .push(jd.original_filename.clone());
                    continue;
                }
                Err(message) => {
                    warn!("{message}");
                    outcome.warnings.push(message);
                    outcome
                        .analytics
                        .job_descriptions_skipped
                        .push(jd.original_filename.clone());
                    continue;
                }
            };
            debug!(
                "Job description '{}' has {} skills",
                jd.original_filename,
                jd_skills.len()
            );
            outcome.analytics.job_descriptions_scored += 1;

            let matches = outcome
                .matched
                .entry(jd.original_filename.clone())
                .or_default();
            let overlaps = outcome
                .analytics
                .skill_overlap
                .entry(jd.original_filename.clone())
                .or_default();

            for resume in resumes {
                if !resume_skills.contains_key(&resume.id) {
                    let skills = match self.document_skills(resume, DocumentKind::Resume).await {
                        Ok(skills) => Some(skills),
                        Err(message) => {
                            warn!("{message}");
                            outcome.warnings.push(message);
                            None
                        }
                    };
                    resume_skills.insert(resume.id, skills);
                }
                let Some(skills) = resume_skills.get(&resume.id).and_then(Option::as_ref) else {
                    continue;
                };

                let overlap = skill_overlap(jd_skills.iter(), skills.iter());
                overlaps.insert(resume.original_filename.clone(), overlap);

                if is_match(overlap, self.threshold) {
                    matches.push(MatchEntry {
                        resume_filename: resume.original_filename.clone(),
                        skill_overlap_percentage: overlap,
                    });
                } else if !outcome.unmatched.contains(&resume.original_filename) {
                    outcome.unmatched.push(resume.original_filename.clone());
                }
            }
        }

        let total = resumes.len() as u32;
        let matched_count: usize = outcome.matched.values().map(Vec::len).sum();
        outcome.analytics.total_resumes_processed = total;
        outcome.analytics.total_matched_resumes = matched_count as u32;
        outcome.analytics.match_rate = match_rate(matched_count, resumes.len());

        info!(
            "Run finished: {} job descriptions scored, {} skipped, {} resumes, {} matches",
            outcome.analytics.job_descriptions_scored,
            outcome.analytics.job_descriptions_skipped.len(),
            total,
            matched_count
        );
        outcome
    }

    /// Fetch, extract text, extract skills. `Err` carries a user-facing message.
    async fn document_skills(&self, file: &FileRow, kind: DocumentKind) -> Result<SkillSet, String> {
        let label = match kind {
            DocumentKind::JobDescription => "Job Description",
            DocumentKind::Resume => "Resume",
        };
        let bytes = self.storage.fetch(&file.external_id).await.map_err(|e| {
            format!(
                "Could not fetch content for {label} \"{}\": {e}",
                file.original_filename
            )
        })?;
        let text = extract_blocking(self.reader.clone(), bytes, &file.original_filename)
            .await
            .map_err(|e| {
                format!(
                    "Could not extract text from {label} \"{}\": {e}",
                    file.original_filename
                )
            })?;
        Ok(self.skills.extract(&text, kind).await)
    }
}

/// `matched / total * 100`, or `0` when there were no resumes.
pub fn match_rate(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    matched as f64 / total as f64 * 100.0
}
