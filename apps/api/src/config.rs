use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MATCH_THRESHOLD: f64 = 50.0;

/// Where uploaded documents live.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    S3 {
        bucket: String,
        endpoint: String,
        region: String,
        access_key_id: String,
        secret_access_key: String,
    },
    Local {
        root: PathBuf,
    },
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub storage: StorageConfig,
    pub jd_folder: String,
    pub resume_folder: String,
    /// Optional: the key can also be submitted at runtime via `PUT /api/v1/credentials`.
    pub llm_api_key: Option<String>,
    pub llm_api_url: String,
    pub llm_model: String,
    pub match_threshold: f64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend = optional_env("STORAGE_BACKEND").unwrap_or_else(|| "s3".to_string());
        let storage = match backend.as_str() {
            "s3" => StorageConfig::S3 {
                bucket: require_env("S3_BUCKET")?,
                endpoint: require_env("S3_ENDPOINT")?,
                region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            },
            "local" => StorageConfig::Local {
                root: optional_env("LOCAL_STORAGE_DIR")
                    .unwrap_or_else(|| "./data/blobs".to_string())
                    .into(),
            },
            other => bail!("STORAGE_BACKEND must be 's3' or 'local', got '{other}'"),
        };

        let match_threshold = match optional_env("SKILL_MATCH_THRESHOLD") {
            Some(raw) => parse_threshold(&raw)?,
            None => DEFAULT_MATCH_THRESHOLD,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            storage,
            jd_folder: optional_env("JD_FOLDER").unwrap_or_else(|| "job-descriptions".to_string()),
            resume_folder: optional_env("RESUME_FOLDER").unwrap_or_else(|| "resumes".to_string()),
            llm_api_key: optional_env("LLM_API_KEY"),
            llm_api_url: optional_env("LLM_API_URL")
                .unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            match_threshold,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Parses a match threshold expressed as a percentage in `0..=100`.
pub fn parse_threshold(raw: &str) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("SKILL_MATCH_THRESHOLD must be a number, got '{raw}'"))?;
    if !(0.0..=100.0).contains(&value) {
        bail!("SKILL_MATCH_THRESHOLD must be between 0 and 100, got {value}");
    }
    Ok(value)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank variables are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold_accepts_percentages() {
        assert_eq!(parse_threshold("50").unwrap(), 50.0);
        assert_eq!(parse_threshold(" 72.5 ").unwrap(), 72.5);
        assert_eq!(parse_threshold("0").unwrap(), 0.0);
        assert_eq!(parse_threshold("100").unwrap(), 100.0);
    }

    #[test]
    fn test_parse_threshold_rejects_out_of_range() {
        assert!(parse_threshold("100.01").is_err());
        assert!(parse_threshold("-1").is_err());
    }

    #[test]
    fn test_parse_threshold_rejects_garbage() {
        let err = parse_threshold("high").unwrap_err();
        assert!(err.to_string().contains("must be a number"));
    }
}
