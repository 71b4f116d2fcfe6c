//! `rmlog.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::rules::{MatchRule, RuleSet};
use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "rmlog.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub rules: RulesConfig,
    pub walk: WalkConfig,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Start from the built-in table.
    pub defaults: bool,
    /// Additional rules, `name` or `qualifier.member`.
    pub extra: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            defaults: true,
            extra: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
    /// Directory names skipped when walking.
    pub exclude: Vec<String>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            exclude: [".git", "vendor", "testdata"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        let mut config: Config = toml::from_str(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.origin = Some(path.to_path_buf());
        Ok(config)
    }

    /// `rmlog.toml` in `dir` if there is one, the defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn rule_set(&self) -> Result<RuleSet> {
        let mut rules = if self.rules.defaults {
            RuleSet::defaults()
        } else {
            RuleSet::empty()
        };
        for raw in &self.rules.extra {
            let rule: MatchRule = raw.parse().map_err(|message| Error::Config {
                path: self.origin.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
                message,
            })?;
            rules.push(rule);
        }
        Ok(rules)
    }
}
