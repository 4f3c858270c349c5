use crate::error::Result;
use crate::results::{StatusTag, DEFAULT_BITS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether the pareto chart follows the table filters.
///
/// The merged frontier arrives precomputed for the whole suite and cannot be
/// recomputed for a subset of tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParetoScope {
    /// Always show the suite-wide frontier.
    #[default]
    Global,
    /// Replace the frontier with a note while any filter is active.
    HideWhenFiltered,
}

/// Report options, usually read from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    pub logo: String,
    pub timeline_href: String,
    pub max_score: f64,
    pub pareto_scope: ParetoScope,
    pub exclude: Vec<StatusTag>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: "Results".to_string(),
            logo: "logo-car.png".to_string(),
            timeline_href: "timeline.html".to_string(),
            max_score: DEFAULT_BITS,
            pareto_scope: ParetoScope::Global,
            exclude: Vec::new(),
        }
    }
}

impl ReportConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(
            ReportConfig::from_toml("").unwrap(),
            ReportConfig::default()
        );
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = ReportConfig::from_toml(
            r#"
title = "Nightly"
max_score = 32.0
pareto_scope = "hide-when-filtered"
exclude = ["crash", "timeout"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.title, "Nightly");
        assert_eq!(cfg.max_score, 32.0);
        assert_eq!(cfg.pareto_scope, ParetoScope::HideWhenFiltered);
        assert_eq!(cfg.exclude, vec![StatusTag::Crash, StatusTag::Timeout]);
        assert_eq!(cfg.logo, "logo-car.png");
    }

    #[test]
    fn unknown_keys_are_errors() {
        assert!(ReportConfig::from_toml("colour = \"red\"").is_err());
        assert!(ReportConfig::from_toml("exclude = [\"exploded\"]").is_err());
    }
}
