// File management: upload, list and delete job descriptions and resumes.
// Blobs go through the storage gateway; metadata lives in Postgres.

pub mod handlers;
pub mod repository;
