//! JSON rendering for page records and export payloads.

use crate::error::{Error, Result};
use serde::Serialize;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a record (page, layout, box or export payload) to JSON.
pub fn to_json<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Record(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoxType, OcrBox, PageLayout};

    #[test]
    fn test_to_json_pretty() {
        let layout = PageLayout::from_boxes(vec![OcrBox::with_geometry(
            1,
            2,
            3,
            4,
            BoxType::Table,
        )]);

        let json = to_json(&layout.to_record(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"TABLE\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let layout = PageLayout::new();
        let json = to_json(&layout.to_record(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"header_y\":0"));
    }
}
