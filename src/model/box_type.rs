//! Box type taxonomy.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of page object a box represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoxType {
    /// Not yet classified
    #[default]
    Unknown,
    /// Running body text
    FlowingText,
    /// Heading text
    HeadingText,
    /// Pull quote or sidebar text
    PulloutText,
    /// Vertically set text
    VerticalText,
    /// Figure or table caption
    CaptionText,
    /// Equation embedded in a text line
    InlineEquation,
    /// Standalone equation
    Equation,
    /// Table
    Table,
    /// Image in the text flow
    FlowingImage,
    /// Image belonging to a heading
    HeadingImage,
    /// Image outside the text flow
    PulloutImage,
    /// Horizontal rule
    HorzLine,
    /// Vertical rule
    VertLine,
    /// Speckles, stains and other artifacts
    Noise,
    /// Region used for counting
    Count,
    /// Region excluded from recognition
    Ignore,
}

/// Concrete box variant a [`BoxType`] maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxVariant {
    /// Base box without extra state
    Generic,
    /// Text-bearing box with user text
    Text,
    /// Image region
    Image,
    /// Rule line
    Line,
    /// Standalone equation
    Equation,
    /// Table
    Table,
    /// Noise region
    Noise,
    /// Count region
    Count,
}

impl BoxType {
    /// Every box type, in declaration order.
    pub const ALL: [BoxType; 17] = [
        BoxType::Unknown,
        BoxType::FlowingText,
        BoxType::HeadingText,
        BoxType::PulloutText,
        BoxType::VerticalText,
        BoxType::CaptionText,
        BoxType::InlineEquation,
        BoxType::Equation,
        BoxType::Table,
        BoxType::FlowingImage,
        BoxType::HeadingImage,
        BoxType::PulloutImage,
        BoxType::HorzLine,
        BoxType::VertLine,
        BoxType::Noise,
        BoxType::Count,
        BoxType::Ignore,
    ];

    /// The box variant this type is stored as.
    pub fn variant(self) -> BoxVariant {
        match self {
            BoxType::FlowingText
            | BoxType::HeadingText
            | BoxType::PulloutText
            | BoxType::VerticalText
            | BoxType::CaptionText
            | BoxType::InlineEquation => BoxVariant::Text,
            BoxType::Equation => BoxVariant::Equation,
            BoxType::Table => BoxVariant::Table,
            BoxType::FlowingImage | BoxType::HeadingImage | BoxType::PulloutImage => {
                BoxVariant::Image
            }
            BoxType::HorzLine | BoxType::VertLine => BoxVariant::Line,
            BoxType::Noise => BoxVariant::Noise,
            BoxType::Count => BoxVariant::Count,
            BoxType::Unknown | BoxType::Ignore => BoxVariant::Generic,
        }
    }

    /// Record name of the type (e.g. `"CAPTION_TEXT"`).
    pub fn name(self) -> &'static str {
        match self {
            BoxType::Unknown => "UNKNOWN",
            BoxType::FlowingText => "FLOWING_TEXT",
            BoxType::HeadingText => "HEADING_TEXT",
            BoxType::PulloutText => "PULLOUT_TEXT",
            BoxType::VerticalText => "VERTICAL_TEXT",
            BoxType::CaptionText => "CAPTION_TEXT",
            BoxType::InlineEquation => "INLINE_EQUATION",
            BoxType::Equation => "EQUATION",
            BoxType::Table => "TABLE",
            BoxType::FlowingImage => "FLOWING_IMAGE",
            BoxType::HeadingImage => "HEADING_IMAGE",
            BoxType::PulloutImage => "PULLOUT_IMAGE",
            BoxType::HorzLine => "HORZ_LINE",
            BoxType::VertLine => "VERT_LINE",
            BoxType::Noise => "NOISE",
            BoxType::Count => "COUNT",
            BoxType::Ignore => "IGNORE",
        }
    }

    /// Check if boxes of this type carry text.
    pub fn is_text(self) -> bool {
        self.variant() == BoxVariant::Text
    }

    /// Check if boxes of this type are image regions.
    pub fn is_image(self) -> bool {
        self.variant() == BoxVariant::Image
    }

    /// Converting to this type drops recognition results.
    pub fn discards_results(self) -> bool {
        matches!(self.variant(), BoxVariant::Image | BoxVariant::Line)
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoxType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BoxType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownBoxType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_table() {
        assert_eq!(BoxType::CaptionText.variant(), BoxVariant::Text);
        assert_eq!(BoxType::InlineEquation.variant(), BoxVariant::Text);
        assert_eq!(BoxType::Equation.variant(), BoxVariant::Equation);
        assert_eq!(BoxType::PulloutImage.variant(), BoxVariant::Image);
        assert_eq!(BoxType::VertLine.variant(), BoxVariant::Line);
        assert_eq!(BoxType::Ignore.variant(), BoxVariant::Generic);
    }

    #[test]
    fn test_name_round_trip() {
        for box_type in BoxType::ALL {
            assert_eq!(box_type.name().parse::<BoxType>().unwrap(), box_type);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "SIDEBAR".parse::<BoxType>().unwrap_err();
        assert!(matches!(err, Error::UnknownBoxType(name) if name == "SIDEBAR"));
    }

    #[test]
    fn test_serde_uses_record_names() {
        let json = serde_json::to_string(&BoxType::HorzLine).unwrap();
        assert_eq!(json, "\"HORZ_LINE\"");
        let parsed: BoxType = serde_json::from_str("\"FLOWING_TEXT\"").unwrap();
        assert_eq!(parsed, BoxType::FlowingText);
    }

    #[test]
    fn test_discards_results() {
        assert!(BoxType::FlowingImage.discards_results());
        assert!(BoxType::HorzLine.discards_results());
        assert!(!BoxType::Table.discards_results());
        assert!(!BoxType::HeadingText.discards_results());
    }
}
