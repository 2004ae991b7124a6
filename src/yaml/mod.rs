//! YAML parsing with source-located diagnostics

pub mod diagnostics;

use serde::de::DeserializeOwned;
use std::path::Path;

pub use diagnostics::{YamlError, YamlSyntaxError};

/// Parse a YAML document, attaching the source to any syntax error
pub fn parse_yaml_str<T: DeserializeOwned>(source: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(source)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, source, filename).into())
}

/// Read and parse a YAML file
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let source = std::fs::read_to_string(path)?;
    parse_yaml_str(&source, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_yaml_str_ok() {
        let map: BTreeMap<String, i64> = parse_yaml_str("\"613278\": 6\n", "totals.yaml").unwrap();
        assert_eq!(map.get("613278"), Some(&6));
    }

    #[test]
    fn test_parse_yaml_str_reports_syntax() {
        let err = parse_yaml_str::<BTreeMap<String, i64>>("a: [1, 2\n", "bad.yaml").unwrap_err();
        assert!(matches!(err, YamlError::Syntax(_)));
    }

    #[test]
    fn test_parse_yaml_file_missing() {
        let err =
            parse_yaml_file::<BTreeMap<String, i64>>(Path::new("/nonexistent/order.yaml")).unwrap_err();
        assert!(matches!(err, YamlError::Io(_)));
    }
}
