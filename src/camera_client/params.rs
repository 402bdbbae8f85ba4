//! Camera params blob parsing
//!
//! `get_camera_params.cgi` answers with lines of `var key=value;` - a
//! JavaScript-shaped text blob, not JSON. Values are either bare integers
//! or quoted strings. Unknown keys are kept in the raw map; the device
//! firmware grows keys across versions.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Parsed device parameters
#[derive(Debug, Clone, Default)]
pub struct CameraParams {
    raw: HashMap<String, String>,
}

impl CameraParams {
    /// Raw string value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw.get(key).map(String::as_str)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    pub fn brightness(&self) -> Option<i64> {
        self.get_int("vbright")
    }

    pub fn contrast(&self) -> Option<i64> {
        self.get_int("vcontrast")
    }

    pub fn saturation(&self) -> Option<i64> {
        self.get_int("vsaturation")
    }

    /// Infrared cut filter status
    pub fn ir_status(&self) -> Option<i64> {
        self.get_int("ircut")
    }

    pub fn resolution(&self) -> Option<i64> {
        self.get_int("resolution")
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Parse the params blob. Lines that do not fit the `var key=value;` shape
/// are skipped; a blob with no valid line at all is a parse error.
pub fn parse_params(body: &str) -> Result<CameraParams> {
    let mut raw = HashMap::new();

    for line in body.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("var ") else {
            continue;
        };
        let Some((key, value)) = rest.split_once('=') else {
            continue;
        };

        let key = key.trim();
        let value = value
            .trim()
            .trim_end_matches(';')
            .trim()
            .trim_matches(|c| c == '\'' || c == '"');

        if key.is_empty() {
            continue;
        }
        raw.insert(key.to_string(), value.to_string());
    }

    if raw.is_empty() {
        return Err(Error::Parse("no parameters in response body".to_string()));
    }

    Ok(CameraParams { raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "var id='ZOD001234';\n\
                          var resolution=32;\n\
                          var vbright=128;\n\
                          var vcontrast=4;\n\
                          var vsaturation=120;\n\
                          var ircut=1;\n\
                          var alias='garden cam';\n";

    #[test]
    fn parses_known_keys() {
        let params = parse_params(SAMPLE).unwrap();
        assert_eq!(params.brightness(), Some(128));
        assert_eq!(params.contrast(), Some(4));
        assert_eq!(params.saturation(), Some(120));
        assert_eq!(params.ir_status(), Some(1));
        assert_eq!(params.resolution(), Some(32));
    }

    #[test]
    fn keeps_unknown_keys_raw() {
        let params = parse_params(SAMPLE).unwrap();
        assert_eq!(params.get("alias"), Some("garden cam"));
        assert_eq!(params.get("id"), Some("ZOD001234"));
        assert_eq!(params.len(), 7);
    }

    #[test]
    fn skips_malformed_lines() {
        let params = parse_params("garbage\nvar vbright=7;\nnot=a var\n").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.brightness(), Some(7));
    }

    #[test]
    fn empty_blob_is_a_parse_error() {
        assert!(matches!(parse_params(""), Err(Error::Parse(_))));
        assert!(matches!(parse_params("<html>404</html>"), Err(Error::Parse(_))));
    }
}
