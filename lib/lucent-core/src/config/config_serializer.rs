use crate::config::Config;
use schemars::{schema_for, Schema};
use std::collections::HashMap;

const HEADER: &str = "# Lucent Configuration File\n# Changes take effect the next time Lucent starts\n\n";

/// Renders the config as YAML with each field's documentation above it as a comment.
pub fn serialize_config(config: &Config) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(config)?;
    let field_docs = field_documentation(&schema_for!(Config));

    let mut output = String::from(HEADER);
    output.push_str(&add_comments_to_yaml(&yaml, &field_docs));
    output.push('\n');
    Ok(output)
}

fn field_documentation(schema: &Schema) -> HashMap<String, String> {
    let mut field_docs = HashMap::new();
    let Some(properties) = schema
        .as_object()
        .and_then(|schema| schema.get("properties"))
        .and_then(|properties| properties.as_object())
    else {
        return field_docs;
    };

    for (key, property) in properties {
        if let Some(description) = property.get("description").and_then(|d| d.as_str()) {
            field_docs.insert(key.clone(), description.to_string());
        }
    }
    field_docs
}

fn add_comments_to_yaml(yaml: &str, field_docs: &HashMap<String, String>) -> String {
    let mut result: Vec<String> = Vec::new();

    for line in yaml.lines() {
        // Only top-level keys carry documentation
        let is_top_level = !line.starts_with(' ') && !line.starts_with('-');
        let doc = line
            .split_once(':')
            .filter(|_| is_top_level)
            .and_then(|(key, _)| field_docs.get(key.trim()));

        if let Some(doc) = doc {
            if !result.is_empty() {
                result.push(String::new());
            }
            result.push(format!("# {doc}"));
        }
        result.push(line.to_string());
    }

    result.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_commented() {
        let output = serialize_config(&Config::default()).unwrap();
        assert!(output.starts_with("# Lucent Configuration File"));
        assert!(output.contains("# Shows or hides every overlay\ntoggle_hotkey: CmdOrCtrl+Alt+F11"));
        assert!(output.contains("# Exits once every overlay window has been closed\nquit_when_all_windows_closed: false"));
    }

    #[test]
    fn test_commented_output_parses_back() {
        let output = serialize_config(&Config::default()).unwrap();
        let config = Config::from_yaml(&output).unwrap();
        assert_eq!(config.window_level, Config::default().window_level);
        assert_eq!(config.toggle_hotkey, Config::default().toggle_hotkey);
    }

    #[test]
    fn test_skipped_fields_are_not_written() {
        let mut config = Config::default();
        config.config_path = Some("/tmp/config.yaml".into());
        let output = serialize_config(&config).unwrap();
        assert!(!output.contains("config_path"));
    }
}
