//! Configuration for the helpdesk.
//!
//! Loads settings from an explicit path, then from
//! `$XDG_CONFIG_HOME/helpdesk/config.toml`, or falls back to defaults.
//! Every field has a serde default, so partial files are fine.

use crate::error::{DeskError, DeskResult};
use crate::knowledge::{KnowledgeBase, KnowledgeEntry, DEFAULT_RESPONSE};
use crate::responder::{DelayRange, DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS};
use crate::SUBJECT_MAX_CHARS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file name inside the helpdesk config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Simulated latency settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Lower bound of the typing delay (inclusive)
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,

    /// Upper bound of the typing delay (exclusive)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

fn default_min_delay() -> u64 {
    DEFAULT_MIN_DELAY_MS
}

fn default_max_delay() -> u64 {
    DEFAULT_MAX_DELAY_MS
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketConfig {
    /// Characters of the opening message kept in the subject
    #[serde(default = "default_subject_max_chars")]
    pub subject_max_chars: usize,
}

fn default_subject_max_chars() -> usize {
    SUBJECT_MAX_CHARS
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            subject_max_chars: default_subject_max_chars(),
        }
    }
}

/// Keyword table override. An empty entry list keeps the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_response: Option<String>,

    /// Entries in match order
    #[serde(default)]
    pub entries: Vec<KnowledgeEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub responder: ResponderConfig,

    #[serde(default)]
    pub tickets: TicketConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

impl DeskConfig {
    /// `$XDG_CONFIG_HOME/helpdesk/config.toml`, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("helpdesk").join(CONFIG_FILE_NAME))
    }

    /// Load config. An explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> DeskResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            Some(path) => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                debug!("No config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate config from a specific path
    pub fn load_from_path(path: &Path) -> DeskResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DeskError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> DeskResult<Self> {
        let config: DeskConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> DeskResult<String> {
        toml::to_string_pretty(self).map_err(|e| DeskError::Config(e.to_string()))
    }

    pub fn validate(&self) -> DeskResult<()> {
        self.delay_range().validate()?;
        if self.tickets.subject_max_chars == 0 {
            return Err(DeskError::Config(
                "tickets.subject_max_chars must be at least 1".to_string(),
            ));
        }
        self.knowledge_base().map(|_| ())
    }

    pub fn delay_range(&self) -> DelayRange {
        DelayRange {
            min_ms: self.responder.min_delay_ms,
            max_ms: self.responder.max_delay_ms,
        }
    }

    /// Keyword table: configured entries, or the built-in table
    pub fn knowledge_base(&self) -> DeskResult<KnowledgeBase> {
        let default_response = self
            .knowledge
            .default_response
            .clone()
            .unwrap_or_else(|| DEFAULT_RESPONSE.to_string());

        if self.knowledge.entries.is_empty() {
            if self.knowledge.default_response.is_none() {
                return Ok(KnowledgeBase::builtin());
            }
            let builtin = KnowledgeBase::builtin();
            return KnowledgeBase::from_entries(builtin.entries().to_vec(), default_response);
        }

        KnowledgeBase::from_entries(self.knowledge.entries.clone(), default_response)
    }
}
