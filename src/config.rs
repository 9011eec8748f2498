use anyhow::{Context, Result};
use chrono::{Local, Utc};

/// Release metadata handed in by the CI environment.
#[derive(Debug, Clone)]
pub struct ReleaseEnv {
    pub version: String,
    pub project_type: String,
    pub date: String,
    pub pr_number: i64,
    pub timestamp: String,
}

impl ReleaseEnv {
    /// Read release info from the environment. `VERSION`, `PROJECT_TYPE` and
    /// `PR_NUMBER` must be set; `TODAY` and `TIMESTAMP` fall back to the
    /// current time.
    pub fn from_env() -> Result<Self> {
        let version =
            std::env::var("VERSION").context("VERSION environment variable must be set")?;
        let project_type = std::env::var("PROJECT_TYPE")
            .context("PROJECT_TYPE environment variable must be set")?;
        let pr_number = std::env::var("PR_NUMBER")
            .context("PR_NUMBER environment variable must be set")?
            .parse::<i64>()
            .context("PR_NUMBER must be an integer")?;
        let date = std::env::var("TODAY")
            .unwrap_or_else(|_| Local::now().format("%Y-%m-%d").to_string());
        let timestamp = std::env::var("TIMESTAMP").unwrap_or_else(|_| Utc::now().to_rfc3339());

        Ok(Self {
            version,
            project_type,
            date,
            pr_number,
            timestamp,
        })
    }
}

// ── Tests ──
