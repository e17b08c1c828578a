/// Tooltip adapter: reads the raw slider label from a display surface and
/// replaces it with the formatted timestamp.
///
/// The display surface is anything implementing `DisplaySink`. `Document` is a
/// flat selector -> text map persisted as a JSON object.
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TimestampError;
use crate::timefmt;

/// Selector of the slider tooltip text in the dashboard page.
pub const TOOLTIP_SELECTOR: &str = ".rc-slider-tooltip-inner";

/// A surface whose elements can be looked up by selector and rewritten.
pub trait DisplaySink {
    /// Current text of the element matching `selector`, if there is one.
    fn text(&self, selector: &str) -> Option<String>;

    /// Replace the text of the element matching `selector`.
    fn set_text(&mut self, selector: &str, text: &str);
}

/// Convert the label shown under `selector` and write the result back.
///
/// The sink is left untouched when the element is missing or the label is
/// not a whole number of hours.
pub fn render_tooltip<S: DisplaySink + ?Sized>(
    sink: &mut S,
    selector: &str,
) -> Result<String, TimestampError> {
    let raw_label = sink
        .text(selector)
        .ok_or_else(|| TimestampError::ElementNotFound {
            selector: selector.to_string(),
        })?;

    let formatted = match timefmt::convert(&raw_label) {
        Ok(formatted) => formatted,
        Err(err) => {
            tracing::warn!(selector, %err, "tooltip label rejected");
            return Err(err);
        }
    };

    sink.set_text(selector, &formatted);
    tracing::debug!(selector, raw = %raw_label.trim(), %formatted, "tooltip rendered");
    Ok(formatted)
}

/// In-memory page content keyed by selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    elements: IndexMap<String, String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and fixtures.
    pub fn with(mut self, selector: &str, text: &str) -> Self {
        self.elements.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Load a document from a JSON object file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let document: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse document: {}", path.display()))?;
        Ok(document)
    }

    /// Save the document as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize document")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write document: {}", path.display()))?;
        Ok(())
    }
}

impl DisplaySink for Document {
    fn text(&self, selector: &str) -> Option<String> {
        self.elements.get(selector).cloned()
    }

    fn set_text(&mut self, selector: &str, text: &str) {
        self.elements.insert(selector.to_string(), text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseReason;

    /// Sink that records every write.
    #[derive(Default)]
    struct RecordingSink {
        label: Option<String>,
        writes: Vec<(String, String)>,
    }

    impl DisplaySink for RecordingSink {
        fn text(&self, _selector: &str) -> Option<String> {
            self.label.clone()
        }

        fn set_text(&mut self, selector: &str, text: &str) {
            self.writes.push((selector.to_string(), text.to_string()));
        }
    }

    #[test]
    fn test_render_rewrites_label() {
        let mut doc = Document::new().with(TOOLTIP_SELECTOR, "328728");
        let formatted = render_tooltip(&mut doc, TOOLTIP_SELECTOR).unwrap();
        assert_eq!(formatted, "1987-07-03T00:00:00.000Z");
        assert_eq!(
            doc.text(TOOLTIP_SELECTOR).as_deref(),
            Some("1987-07-03T00:00:00.000Z")
        );
    }

    #[test]
    fn test_render_missing_element_does_not_write() {
        let mut sink = RecordingSink::default();
        let err = render_tooltip(&mut sink, TOOLTIP_SELECTOR).unwrap_err();
        assert_eq!(
            err,
            TimestampError::ElementNotFound {
                selector: TOOLTIP_SELECTOR.to_string()
            }
        );
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_render_bad_label_leaves_text_unchanged() {
        let mut sink = RecordingSink {
            label: Some("soon".to_string()),
            ..Default::default()
        };
        let err = render_tooltip(&mut sink, TOOLTIP_SELECTOR).unwrap_err();
        assert!(matches!(
            err,
            TimestampError::Parse {
                reason: ParseReason::NotNumeric,
                ..
            }
        ));
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_render_twice_fails_on_formatted_text() {
        let mut doc = Document::new().with(TOOLTIP_SELECTOR, "0");
        render_tooltip(&mut doc, TOOLTIP_SELECTOR).unwrap();
        assert!(render_tooltip(&mut doc, TOOLTIP_SELECTOR).is_err());
        assert_eq!(
            doc.text(TOOLTIP_SELECTOR).as_deref(),
            Some("1950-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_render_only_touches_selected_element() {
        let mut doc = Document::new()
            .with("#title", "Sea surface temperature")
            .with(TOOLTIP_SELECTOR, "24");
        render_tooltip(&mut doc, TOOLTIP_SELECTOR).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc.text("#title").as_deref(),
            Some("Sea surface temperature")
        );
    }

    #[test]
    fn test_document_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        let doc = Document::new().with(TOOLTIP_SELECTOR, "12");
        doc.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\".rc-slider-tooltip-inner\": \"12\""));
        assert_eq!(Document::load(&path).unwrap(), doc);
    }

    #[test]
    fn test_document_load_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(Document::load(&path).is_err());
    }
}
