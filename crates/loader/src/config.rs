//! Reading [`ValidatorConfig`] from JSON.

use std::fs;
use std::path::Path;

use tracing::debug;
use vigil_validator::ValidatorConfig;

use crate::error::{LoaderError, LoaderResult};

/// Parses a configuration document. Absent fields keep their defaults.
pub fn parse_config(json: &str) -> LoaderResult<ValidatorConfig> {
    serde_json::from_str(json).map_err(LoaderError::from)
}

/// Reads a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> LoaderResult<ValidatorConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
    let config = parse_config(&content)?;
    debug!(
        path = %path.display(),
        implicit_class_groups = config.implicit_class_groups,
        max_depth = config.max_depth,
        "loaded validator configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_default_config() {
        assert_eq!(parse_config("{}").unwrap(), ValidatorConfig::default());
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let config = parse_config(r#"{"implicit_class_groups": false, "max_depth": 4}"#).unwrap();
        assert_eq!(config, ValidatorConfig::strict().with_max_depth(4));
    }

    #[test]
    fn wrong_types_are_parse_errors() {
        assert!(matches!(
            parse_config(r#"{"max_depth": "deep"}"#),
            Err(LoaderError::Parse(_))
        ));
    }
}
