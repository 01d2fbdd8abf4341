//! Export configuration.
//!
//! The binary reads everything from environment variables; library callers
//! build an [`ExportConfig`] directly.

use std::path::{Path, PathBuf};

use rxnorm_loader::{NamePolicy, RrfConfig};

use crate::error::{ExportError, ExportResult};

/// Default path of the aggregate JSON file.
pub const DEFAULT_OUTPUT: &str = "rxnorm_ingredients.json";

/// Default directory of the partitioned output.
pub const DEFAULT_WEB_DIR: &str = "web";

/// One output the run should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Pretty-printed JSON array of every ingredient.
    Aggregate(PathBuf),
    /// One compact ingredient per line.
    Ndjson(PathBuf),
    /// Manifest plus one data file per bucket, under a directory.
    Partitioned(PathBuf),
}

impl OutputTarget {
    /// Returns the file or directory this target publishes.
    pub fn path(&self) -> &Path {
        match self {
            Self::Aggregate(path) | Self::Ndjson(path) | Self::Partitioned(path) => path,
        }
    }
}

/// Configuration for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Release directory (or its `rrf` subdirectory).
    pub rrf_dir: PathBuf,
    /// Loader filters and hierarchy options.
    pub rrf: RrfConfig,
    /// Outputs to publish, in order.
    pub outputs: Vec<OutputTarget>,
}

impl ExportConfig {
    /// Creates a config with the default filters and outputs.
    ///
    /// PIN and MIN ingredients inherit components, so they are exported even
    /// when RXNREL links them only through their base ingredients or SCDs.
    pub fn new<P: Into<PathBuf>>(rrf_dir: P) -> Self {
        Self {
            rrf_dir: rrf_dir.into(),
            rrf: RrfConfig {
                inherit_components: true,
                ..Default::default()
            },
            outputs: vec![
                OutputTarget::Aggregate(PathBuf::from(DEFAULT_OUTPUT)),
                OutputTarget::Partitioned(PathBuf::from(DEFAULT_WEB_DIR)),
            ],
        }
    }

    /// Replaces the output targets.
    pub fn with_outputs(mut self, outputs: Vec<OutputTarget>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Reads the configuration from `RXNORM_*` environment variables.
    pub fn from_env() -> ExportResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> ExportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let rrf_dir = var("RXNORM_RRF_DIR")
            .ok_or_else(|| ExportError::Config("RXNORM_RRF_DIR is not set".to_string()))?;
        let mut config = Self::new(rrf_dir);

        if let Some(sab) = var("RXNORM_SAB") {
            config.rrf.target_sab = sab;
        }
        if let Some(language) = var("RXNORM_LANGUAGE") {
            config.rrf.language = if language.eq_ignore_ascii_case("any") {
                None
            } else {
                Some(language)
            };
        }
        if let Some(value) = var("RXNORM_INCLUDE_SUPPRESSED") {
            config.rrf.include_suppressed = parse_flag("RXNORM_INCLUDE_SUPPRESSED", &value)?;
        }
        if let Some(value) = var("RXNORM_INHERIT_COMPONENTS") {
            config.rrf.inherit_components = parse_flag("RXNORM_INHERIT_COMPONENTS", &value)?;
        }
        if let Some(value) = var("RXNORM_NAME_POLICY") {
            config.rrf.name_policy = match value.as_str() {
                "first" | "first_seen" => NamePolicy::FirstSeen,
                "preferred" | "prefer_term_status" => NamePolicy::PreferTermStatus,
                other => {
                    return Err(ExportError::Config(format!(
                        "RXNORM_NAME_POLICY must be first or preferred, got {}",
                        other
                    )))
                }
            };
        }

        let output = PathBuf::from(var("RXNORM_OUTPUT").unwrap_or_else(|| DEFAULT_OUTPUT.into()));
        let web_dir = PathBuf::from(var("RXNORM_WEB_DIR").unwrap_or_else(|| DEFAULT_WEB_DIR.into()));
        let mode = var("RXNORM_OUTPUT_MODE").unwrap_or_else(|| "all".to_string());

        config.outputs = match mode.as_str() {
            "aggregate" => vec![OutputTarget::Aggregate(output)],
            "ndjson" => vec![OutputTarget::Ndjson(output)],
            "partitioned" => vec![OutputTarget::Partitioned(web_dir)],
            "all" => vec![
                OutputTarget::Aggregate(output),
                OutputTarget::Partitioned(web_dir),
            ],
            other => {
                return Err(ExportError::Config(format!(
                    "RXNORM_OUTPUT_MODE must be aggregate, ndjson, partitioned or all, got {}",
                    other
                )))
            }
        };

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> ExportResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ExportError::Config(format!(
            "{} must be a boolean, got {}",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ExportConfig::from_lookup(lookup(&[("RXNORM_RRF_DIR", "/data/rrf")])).unwrap();
        assert_eq!(config.rrf_dir, PathBuf::from("/data/rrf"));
        assert_eq!(config.rrf.target_sab, "RXNORM");
        assert_eq!(config.rrf.language.as_deref(), Some("ENG"));
        assert!(config.rrf.inherit_components);
        assert_eq!(
            config.outputs,
            vec![
                OutputTarget::Aggregate(PathBuf::from(DEFAULT_OUTPUT)),
                OutputTarget::Partitioned(PathBuf::from(DEFAULT_WEB_DIR)),
            ]
        );
    }

    #[test]
    fn test_missing_rrf_dir() {
        let err = ExportConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = ExportConfig::from_lookup(lookup(&[
            ("RXNORM_RRF_DIR", "rrf"),
            ("RXNORM_SAB", "RXNORM"),
            ("RXNORM_LANGUAGE", "any"),
            ("RXNORM_INCLUDE_SUPPRESSED", "true"),
            ("RXNORM_INHERIT_COMPONENTS", "1"),
            ("RXNORM_NAME_POLICY", "preferred"),
            ("RXNORM_OUTPUT_MODE", "ndjson"),
            ("RXNORM_OUTPUT", "out.ndjson"),
        ]))
        .unwrap();

        assert_eq!(config.rrf.language, None);
        assert!(config.rrf.include_suppressed);
        assert!(config.rrf.inherit_components);
        assert_eq!(config.rrf.name_policy, NamePolicy::PreferTermStatus);
        assert_eq!(
            config.outputs,
            vec![OutputTarget::Ndjson(PathBuf::from("out.ndjson"))]
        );
    }

    #[test]
    fn test_inheritance_can_be_disabled() {
        let config = ExportConfig::from_lookup(lookup(&[
            ("RXNORM_RRF_DIR", "rrf"),
            ("RXNORM_INHERIT_COMPONENTS", "false"),
        ]))
        .unwrap();
        assert!(!config.rrf.inherit_components);
    }

    #[test]
    fn test_invalid_values() {
        let bad_mode = ExportConfig::from_lookup(lookup(&[
            ("RXNORM_RRF_DIR", "rrf"),
            ("RXNORM_OUTPUT_MODE", "xml"),
        ]));
        assert!(matches!(bad_mode, Err(ExportError::Config(_))));

        let bad_flag = ExportConfig::from_lookup(lookup(&[
            ("RXNORM_RRF_DIR", "rrf"),
            ("RXNORM_INCLUDE_SUPPRESSED", "maybe"),
        ]));
        assert!(matches!(bad_flag, Err(ExportError::Config(_))));
    }
}
