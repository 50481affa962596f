use crate::row::SourceRow;
use serde::{Deserialize, Serialize};

/// Tokenize attribute text into elementary terms
/// Uses lowercase normalization and removes punctuation
#[inline]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|s| !s.is_empty() && s.len() > 1) // Filter single chars
        .collect()
}

/// An attribute-scoped excerpt of a source row together with its split terms.
///
/// Splitting happens per attribute; a term never spans two attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signal {
    attribute: String,
    text: String,
    terms: Vec<String>,
}

impl Signal {
    #[must_use]
    pub fn new(attribute: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let terms = tokenize(&text);
        Self {
            attribute: attribute.into(),
            text,
            terms,
        }
    }

    #[inline]
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Decompose a row into one signal per attribute, in attribute order.
///
/// Pure function of the row; callers cache the result per `TupleId`.
#[must_use]
pub fn extract_signals(row: &SourceRow) -> Vec<Signal> {
    row.attributes
        .iter()
        .map(|(attribute, text)| Signal::new(attribute.clone(), text.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let terms = tokenize("Miles Davis, Kind of Blue (1959)");
        assert_eq!(terms, vec!["miles", "davis", "kind", "of", "blue", "1959"]);
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        let terms = tokenize("a b cd");
        assert_eq!(terms, vec!["cd"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ,;  ").is_empty());
    }

    #[test]
    fn test_signals_preserve_attribute_boundaries() {
        let row = SourceRow::new(
            0,
            vec![
                ("title".to_string(), "kind of blue".to_string()),
                ("artist".to_string(), "miles davis".to_string()),
            ],
        );
        let signals = extract_signals(&row);
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].attribute(), "title");
        assert_eq!(signals[0].terms(), ["kind", "of", "blue"]);
        assert_eq!(signals[1].attribute(), "artist");
        assert_eq!(signals[1].terms(), ["miles", "davis"]);
    }

    #[test]
    fn test_empty_attribute_yields_empty_signal() {
        let row = SourceRow::new(0, vec![("notes".to_string(), String::new())]);
        let signals = extract_signals(&row);
        assert_eq!(signals.len(), 1);
        assert!(signals[0].is_empty());
    }
}
