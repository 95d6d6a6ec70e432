use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::models::run::{AnalysisRunRow, MatchedResumes, RunAnalytics, RunSummaryRow};

/// Append-only: runs are inserted once and never updated.
pub async fn insert_run(
    pool: &PgPool,
    matched: &MatchedResumes,
    unmatched: &[String],
    analytics: &RunAnalytics,
) -> Result<AnalysisRunRow, sqlx::Error> {
    let row = sqlx::query_as::<_, AnalysisRunRow>(
        r#"
        INSERT INTO analysis_runs (matched, unmatched, analytics)
        VALUES ($1, $2, $3)
        RETURNING id, matched, unmatched, analytics, created_at
        "#,
    )
    .bind(Json(matched))
    .bind(Json(unmatched))
    .bind(Json(analytics))
    .fetch_one(pool)
    .await?;

    info!("Stored analysis run {}", row.id);
    Ok(row)
}

pub async fn get_run(pool: &PgPool, id: i64) -> Result<Option<AnalysisRunRow>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRunRow>(
        "SELECT id, matched, unmatched, analytics, created_at FROM analysis_runs WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Newest first.
pub async fn list_runs(pool: &PgPool) -> Result<Vec<RunSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, RunSummaryRow>(
        r#"
        SELECT id,
               COALESCE((analytics->>'total_resumes_processed')::BIGINT, 0) AS total_resumes_processed,
               COALESCE((analytics->>'total_matched_resumes')::BIGINT, 0) AS total_matched_resumes,
               COALESCE((analytics->>'match_rate')::FLOAT8, 0) AS match_rate,
               created_at
        FROM analysis_runs
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}
