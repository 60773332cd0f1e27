//! YAML parsing with error handling

use serde::de::DeserializeOwned;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Parse YAML content into a typed value with nice error messages
pub fn parse_yaml<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlError::from(YamlSyntaxError::from_serde_error(&e, content, filename)))
}

/// Parse YAML from a file path
pub fn parse_yaml_file<T: DeserializeOwned>(path: &std::path::Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();
    parse_yaml(&content, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Engine;

    #[test]
    fn test_parse_valid_engine() {
        let yaml = r#"
id: ENG-01HQ5V2KRMJ0B9XYZ3NTWPGQ4E
make: Chevrolet
model: LS3
power_hp: 430
created: "2024-01-01T00:00:00Z"
"#;
        let engine: Engine = parse_yaml(yaml, "engine.swap.yaml").unwrap();
        assert_eq!(engine.make, "Chevrolet");
        assert_eq!(engine.power_hp, Some(430));
    }

    #[test]
    fn test_parse_wrong_type_returns_error() {
        let yaml = r#"
id: ENG-01HQ5V2KRMJ0B9XYZ3NTWPGQ4E
make: Chevrolet
model: LS3
power_hp: lots
created: "2024-01-01T00:00:00Z"
"#;
        let result: Result<Engine, _> = parse_yaml(yaml, "engine.swap.yaml");
        assert!(matches!(result, Err(YamlError::Syntax(_))));
    }

    #[test]
    fn test_parse_missing_file_is_io_error() {
        let result: Result<Engine, _> =
            parse_yaml_file(std::path::Path::new("/nonexistent/ENG-x.swap.yaml"));
        assert!(matches!(result, Err(YamlError::Io(_))));
    }
}
