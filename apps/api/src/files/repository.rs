use sqlx::PgPool;

use crate::models::files::{FileKind, FileRow};

const COLUMNS: &str = "id, original_filename, external_id, external_folder_id, created_at";

/// All files of one kind, oldest first. Run order follows this ordering.
pub async fn list_files(pool: &PgPool, kind: FileKind) -> Result<Vec<FileRow>, sqlx::Error> {
    sqlx::query_as::<_, FileRow>(&format!(
        "SELECT {COLUMNS} FROM {} ORDER BY id ASC",
        kind.table()
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_file(pool: &PgPool, kind: FileKind, id: i64) -> Result<Option<FileRow>, sqlx::Error> {
    sqlx::query_as::<_, FileRow>(&format!(
        "SELECT {COLUMNS} FROM {} WHERE id = $1",
        kind.table()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn filename_exists(
    pool: &PgPool,
    kind: FileKind,
    original_filename: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE original_filename = $1)",
        kind.table()
    ))
    .bind(original_filename)
    .fetch_one(pool)
    .await
}

pub async fn insert_file(
    pool: &PgPool,
    kind: FileKind,
    original_filename: &str,
    external_id: &str,
    external_folder_id: &str,
) -> Result<FileRow, sqlx::Error> {
    sqlx::query_as::<_, FileRow>(&format!(
        "INSERT INTO {} (original_filename, external_id, external_folder_id) \
         VALUES ($1, $2, $3) RETURNING {COLUMNS}",
        kind.table()
    ))
    .bind(original_filename)
    .bind(external_id)
    .bind(external_folder_id)
    .fetch_one(pool)
    .await
}

pub async fn delete_file(pool: &PgPool, kind: FileKind, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
