use anyhow::Result;
use serde::Deserialize;

/// Content type assumed when nothing else resolves one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Character encoding assumed when the content type carries no charset.
pub const DEFAULT_CHARSET: &str = "UTF-8";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Headers that must pass through exactly as the backend sent them.
    pub preserve_headers: Vec<String>,
    /// Externally configured content type, consulted before the no-body
    /// heuristic when the backend sent none.
    pub fallback_content_type: Option<String>,
}

impl TargetConfig {
    pub fn is_preserved(&self, name: &str) -> bool {
        self.preserve_headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case(name))
    }
}

pub fn read_config(content: &str) -> Result<TargetConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserved_headers_match_any_case() {
        let config = read_config(r#"preserve_headers = ["Location"]"#).unwrap();
        assert!(config.is_preserved("location"));
        assert!(config.is_preserved("LOCATION"));
        assert!(!config.is_preserved("Content-Type"));
    }

    #[test]
    fn empty_config_has_no_fallback() {
        let config = read_config("").unwrap();
        assert!(config.fallback_content_type.is_none());
        assert!(config.preserve_headers.is_empty());
    }
}
