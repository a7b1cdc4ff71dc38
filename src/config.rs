//! Declarative topic configuration.
//!
//! A radar is a list of topics, each with its own keyword groups, optional
//! mandatory headline keywords and result cap, plus one negative-term list
//! shared by every topic. The built-in table lives in `config/topics.yaml`
//! and is compiled into the binary; `--config` swaps in a file with the same
//! layout.

use crate::error::ConfigError;
use crate::models::QuerySpec;
use crate::query::build_query;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

const BUILTIN_TOPICS: &str = include_str!("../config/topics.yaml");

/// The full set of topics shown on one radar.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RadarConfig {
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    /// Terms excluded from every topic's search.
    #[serde(default)]
    pub negatives: Vec<String>,
    pub topics: Vec<Topic>,
}

/// One tab of the radar.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Topic {
    /// Short identifier used by `--topic` and as the Markdown anchor.
    pub slug: String,
    pub label: String,
    pub heading: String,
    #[serde(default)]
    pub description: String,
    /// Keyword groups; terms in a group are OR-ed, groups are AND-ed.
    pub groups: Vec<Vec<String>>,
    /// When set, a headline must contain at least one of these.
    #[serde(default)]
    pub mandatory_title_keywords: Option<Vec<String>>,
    /// Maximum number of articles kept for this topic.
    pub limit: usize,
}

impl Topic {
    /// Build the immutable scan inputs for this topic.
    ///
    /// Mandatory keywords are lowercased so they can be matched against the
    /// lowercased headline. A list with no usable keywords means no filter.
    pub fn query_spec(&self, negatives: &[String]) -> QuerySpec {
        QuerySpec {
            query: build_query(&self.groups, negatives),
            mandatory_title_keywords: self
                .mandatory_title_keywords
                .as_ref()
                .map(|words| {
                    words
                        .iter()
                        .map(|w| w.trim().to_lowercase())
                        .filter(|w| !w.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|words| !words.is_empty()),
            limit: self.limit,
        }
    }
}

impl RadarConfig {
    /// The four built-in trucking topics.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_TOPICS)
    }

    /// Load topics from `path`, or the built-in set when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(Path::new(path))?;
                let config = Self::from_yaml(&raw)?;
                info!(path, topics = config.topics.len(), "Loaded topic config");
                config
            }
            None => {
                let config = Self::builtin()?;
                info!(topics = config.topics.len(), "Using built-in topics");
                config
            }
        };
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: RadarConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.topics.is_empty() {
            return Err(ConfigError::Invalid("no topics defined".to_string()));
        }

        let mut seen = HashSet::new();
        for topic in &self.topics {
            if !seen.insert(topic.slug.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate topic slug `{}`",
                    topic.slug
                )));
            }
            if topic.limit == 0 {
                return Err(ConfigError::Invalid(format!(
                    "topic `{}` has a limit of 0",
                    topic.slug
                )));
            }
            if !topic.groups.iter().any(|g| g.iter().any(|t| !t.trim().is_empty())) {
                return Err(ConfigError::Invalid(format!(
                    "topic `{}` has no search terms",
                    topic.slug
                )));
            }
        }
        debug!(topics = self.topics.len(), "Topic config validated");
        Ok(())
    }

    /// Topics whose slug is in `only`, in configuration order. An empty
    /// filter selects everything.
    pub fn select(&self, only: &[String]) -> Vec<&Topic> {
        self.topics
            .iter()
            .filter(|t| only.is_empty() || only.iter().any(|s| s == &t.slug))
            .collect()
    }
}
