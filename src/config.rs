//! Configuration Management
//!
//! Handles persistent configuration storage for pscale.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_ORG: &str = "PLANETSCALE_ORG";
pub const ENV_DATABASE: &str = "PLANETSCALE_DATABASE";
pub const ENV_BASE_URL: &str = "PLANETSCALE_BASE_URL";

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default organization
    #[serde(default)]
    pub organization: Option<String>,
    /// Default database
    #[serde(default)]
    pub database: Option<String>,
    /// API endpoint override
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pscale").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective organization (CLI > env > config)
    pub fn effective_organization(&self, flag: Option<&str>) -> Option<String> {
        resolve(flag, ENV_ORG, self.organization.as_deref(), env_lookup)
    }

    /// Get effective database (CLI > env > config)
    pub fn effective_database(&self, flag: Option<&str>) -> Option<String> {
        resolve(flag, ENV_DATABASE, self.database.as_deref(), env_lookup)
    }

    /// Get effective API endpoint (CLI > env > config)
    pub fn effective_base_url(&self, flag: Option<&str>) -> Option<String> {
        resolve(flag, ENV_BASE_URL, self.base_url.as_deref(), env_lookup)
    }

    /// Set organization and save
    pub fn set_organization(&mut self, org: &str) -> Result<()> {
        self.organization = Some(org.to_string());
        self.save()
    }

    /// Set database and save
    pub fn set_database(&mut self, db: &str) -> Result<()> {
        self.database = Some(db.to_string());
        self.save()
    }

    /// Set API endpoint and save
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.base_url = Some(url.to_string());
        self.save()
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn resolve(
    flag: Option<&str>,
    env_key: &str,
    stored: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| lookup(env_key))
        .or_else(|| stored.map(str::to_string))
        .filter(|v| !v.trim().is_empty())
}
