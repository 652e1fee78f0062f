//! Deprecation manifest.
//!
//! Declares deprecated targets in YAML so they can be validated and their
//! notices rendered without touching code.

use crate::deprecated::{DeprecationNotice, Marker, DEFAULT_REMOVE_IN};
use crate::target::{DeclaredTarget, TargetKind};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeprecationConfig {
    /// Deprecated targets
    #[serde(default)]
    pub deprecations: Vec<DeprecationRule>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

impl DeprecationConfig {
    /// Load a manifest from a YAML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_yaml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a manifest from YAML text without validating it.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate every rule by building its notice.
    pub fn validate(&self) -> anyhow::Result<()> {
        for rule in &self.deprecations {
            rule.validate(&self.settings)?;
        }
        Ok(())
    }

    /// Build the notice for every rule, in declaration order.
    pub fn notices(&self) -> anyhow::Result<Vec<DeprecationNotice>> {
        self.deprecations
            .iter()
            .map(|rule| rule.notice(&self.settings))
            .collect()
    }

    /// Find the rule for a target by name.
    pub fn find(&self, target: &str) -> Option<&DeprecationRule> {
        self.deprecations.iter().find(|r| r.target == target)
    }
}

/// One deprecated target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeprecationRule {
    /// Name of the deprecated function or type
    pub target: String,

    /// `function` or `constructor` (aliases: `fn`, `class`, `type`)
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Release the target was deprecated in, by name or code
    pub as_of: String,

    /// Replacement to point users at
    #[serde(default)]
    pub in_favor_of: Option<String>,

    /// Releases to wait before removal (0 = never)
    #[serde(default)]
    pub remove_in: Option<usize>,

    /// Name shown in the notice instead of `target()`
    #[serde(default)]
    pub what: Option<String>,
}

fn default_kind() -> String {
    "function".to_string()
}

impl DeprecationRule {
    /// Validate the rule against the given settings.
    pub fn validate(&self, settings: &Settings) -> anyhow::Result<()> {
        if self.target.is_empty() {
            anyhow::bail!("Deprecation target cannot be empty");
        }
        self.notice(settings).map(|_| ())
    }

    /// The marker this rule describes.
    pub fn marker(&self, settings: &Settings) -> Marker {
        let mut marker = Marker::new(self.as_of.as_str())
            .remove_in(self.remove_in.unwrap_or(settings.default_remove_in));
        if let Some(replacement) = &self.in_favor_of {
            marker = marker.in_favor_of(replacement.as_str());
        }
        if let Some(what) = &self.what {
            marker = marker.what(what.as_str());
        }
        marker
    }

    /// The declared target, with its kind parsed.
    pub fn declared_target(&self) -> DeclaredTarget {
        DeclaredTarget::new(self.target.as_str(), TargetKind::from_label(&self.kind))
    }

    /// Build the notice this rule yields.
    pub fn notice(&self, settings: &Settings) -> anyhow::Result<DeprecationNotice> {
        self.marker(settings)
            .notice_for(&self.declared_target())
            .with_context(|| format!("invalid deprecation for target '{}'", self.target))
    }
}

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Releases to wait before removal when a rule gives none
    #[serde(default = "default_remove_in")]
    pub default_remove_in: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_remove_in: DEFAULT_REMOVE_IN,
        }
    }
}

fn default_remove_in() -> usize {
    DEFAULT_REMOVE_IN
}
