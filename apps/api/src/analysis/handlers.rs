use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::aggregate::MatchPipeline;
use crate::analysis::repository::{get_run, insert_run, list_runs};
use crate::analysis::skills::SkillExtractor;
use crate::errors::AppError;
use crate::files::repository::list_files;
use crate::models::files::FileKind;
use crate::models::run::{AnalysisRunRow, MatchEntry, MatchedResumes, RunSummaryRow};
use crate::state::AppState;

#[derive(Serialize)]
pub struct RunResponse {
    pub run: AnalysisRunRow,
    /// Files that were skipped during this run and why.
    pub warnings: Vec<String>,
}

#[derive(Deserialize)]
pub struct TopQuery {
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct TopResumesResponse {
    pub run_id: i64,
    pub role: Option<String>,
    pub matches: Vec<MatchEntry>,
}

/// POST /api/v1/runs
pub async fn handle_trigger_run(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RunResponse>), AppError> {
    let llm = state.llm_client().await.ok_or_else(|| {
        AppError::Configuration(
            "LLM API key is not set. Submit one via PUT /api/v1/credentials.".to_string(),
        )
    })?;

    let jds = list_files(&state.db, FileKind::JobDescription).await?;
    let resumes = list_files(&state.db, FileKind::Resume).await?;
    if jds.is_empty() || resumes.is_empty() {
        return Err(AppError::Validation(
            "Please upload at least one Job Description and one Resume to process.".to_string(),
        ));
    }

    info!(
        "Starting analysis run: {} job descriptions x {} resumes (model {}, threshold {})",
        jds.len(),
        resumes.len(),
        llm.model(),
        state.config.match_threshold
    );

    let skills = SkillExtractor::new(Arc::new(llm));
    let outcome = MatchPipeline::new(
        state.storage.as_ref(),
        state.text_extractor.clone(),
        &skills,
        state.config.match_threshold,
    )
    .run(&jds, &resumes)
    .await;

    let run = insert_run(
        &state.db,
        &outcome.matched,
        &outcome.unmatched,
        &outcome.analytics,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RunResponse {
            run,
            warnings: outcome.warnings,
        }),
    ))
}

/// GET /api/v1/runs
pub async fn handle_list_runs(
    State(state): State<AppState>,
) -> Result<Json<Vec<RunSummaryRow>>, AppError> {
    Ok(Json(list_runs(&state.db).await?))
}

/// GET /api/v1/runs/:id
pub async fn handle_get_run(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AnalysisRunRow>, AppError> {
    let run = get_run(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis run {id} not found")))?;
    Ok(Json(run))
}

/// GET /api/v1/runs/:id/top?role=<job description filename>
pub async fn handle_top_resumes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<TopQuery>,
) -> Result<Json<TopResumesResponse>, AppError> {
    let run = get_run(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis run {id} not found")))?;
    let matches = top_matches_for_role(&run.matched, query.role.as_deref());
    Ok(Json(TopResumesResponse {
        run_id: run.id,
        role: query.role,
        matches,
    }))
}

/// Matches for one job description, highest overlap first. Unknown or missing role gives none.
pub fn top_matches_for_role(matched: &MatchedResumes, role: Option<&str>) -> Vec<MatchEntry> {
    let Some(entries) = role.and_then(|r| matched.get(r)) else {
        return Vec::new();
    };
    let mut entries = entries.clone();
    // Stable sort keeps run order between equal scores.
    entries.sort_by(|a, b| {
        b.skill_overlap_percentage
            .total_cmp(&a.skill_overlap_percentage)
    });
    entries
}
