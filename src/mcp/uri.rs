//! Resource URI templates
//!
//! Templates are matched segment by segment on `/`. A `{name}` segment binds
//! any non-empty segment; every other segment must match literally.

use std::collections::HashMap;

/// Parameters bound by a matched template
pub type UriParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    pub fn new(template: &str) -> Self {
        let segments = template
            .split('/')
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                {
                    Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                    _ => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        Self {
            raw: template.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the template has no placeholders (a concrete URI)
    pub fn is_concrete(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    /// Match a URI, returning the bound parameters
    pub fn matches(&self, uri: &str) -> Option<UriParams> {
        let parts: Vec<&str> = uri.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = UriParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.insert(name.clone(), part.to_string());
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_match() {
        let template = UriTemplate::new("memory://symbol_map");
        assert!(template.is_concrete());
        assert_eq!(template.matches("memory://symbol_map"), Some(UriParams::new()));
        assert_eq!(template.matches("memory://activity_log"), None);
    }

    #[test]
    fn test_param_binding() {
        let template = UriTemplate::new("resource://crypto_price/{symbol}");
        assert!(!template.is_concrete());

        let params = template.matches("resource://crypto_price/BTCUSDT").unwrap();
        assert_eq!(params.get("symbol").map(String::as_str), Some("BTCUSDT"));
    }

    #[test]
    fn test_param_requires_segment() {
        let template = UriTemplate::new("resource://crypto_price/{symbol}");
        assert_eq!(template.matches("resource://crypto_price/"), None);
        assert_eq!(template.matches("resource://crypto_price"), None);
        assert_eq!(template.matches("resource://crypto_price/btc/extra"), None);
        assert_eq!(template.matches("resource://other/btc"), None);
    }
}
