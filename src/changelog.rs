use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ReleaseEnv;
use crate::parser::KeyedCategory;

/// The persisted changelog record: a metadata block plus releases, newest
/// first.
#[derive(Debug, Serialize, Deserialize)]
pub struct Changelog {
    pub metadata: Metadata,
    pub releases: Vec<Release>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub last_updated: String,
    pub current_version: String,
    pub project_type: String,
    pub total_releases: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
    pub project_type: String,
    pub date: String,
    pub pr_number: i64,
    pub raw_summary: String,
    pub parsed_changes: IndexMap<String, CategoryEntry>,
}

/// Category block inside a release. Older changelog files stored a bare item
/// list without a title, so both layouts deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryEntry {
    Detailed { title: String, items: Vec<String> },
    Bare(Vec<String>),
}

impl CategoryEntry {
    pub fn items(&self) -> &[String] {
        match self {
            CategoryEntry::Detailed { items, .. } => items,
            CategoryEntry::Bare(items) => items,
        }
    }
}

impl Changelog {
    /// Load an existing changelog, or start a fresh one when the file is
    /// missing or not readable as changelog JSON.
    pub fn load_or_new(path: &Path, env: &ReleaseEnv) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(changelog) => changelog,
                Err(e) => {
                    warn!("{} is not valid changelog JSON, starting fresh: {}", path.display(), e);
                    Self::new(env)
                }
            },
            Err(_) => Self::new(env),
        }
    }

    /// Strict load for rendering and stats: a missing or corrupt file is an
    /// error here, not a fresh start.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn new(env: &ReleaseEnv) -> Self {
        Self {
            metadata: Metadata {
                last_updated: env.timestamp.clone(),
                current_version: env.version.clone(),
                project_type: env.project_type.clone(),
                total_releases: 0,
            },
            releases: Vec::new(),
        }
    }

    /// Prepend a release built from the parsed categories and refresh the
    /// metadata block.
    pub fn record_release(
        &mut self,
        env: &ReleaseEnv,
        raw_summary: String,
        categories: Vec<KeyedCategory>,
    ) {
        let mut parsed_changes = IndexMap::new();
        for cat in categories {
            parsed_changes.insert(
                cat.key,
                CategoryEntry::Detailed {
                    title: cat.title,
                    items: cat.items,
                },
            );
        }

        self.releases.insert(
            0,
            Release {
                version: env.version.clone(),
                project_type: env.project_type.clone(),
                date: env.date.clone(),
                pr_number: env.pr_number,
                raw_summary,
                parsed_changes,
            },
        );

        self.metadata.last_updated = env.timestamp.clone();
        self.metadata.current_version = env.version.clone();
        self.metadata.project_type = env.project_type.clone();
        self.metadata.total_releases = self.releases.len();
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

// ── Tests ──
