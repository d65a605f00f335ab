//! Positioned text fragments.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Axis-aligned bounding box in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Approximate box for a run placed at `(x, baseline)`.
    ///
    /// Ascender and descender are estimated from the font size.
    pub fn from_baseline(x: f32, baseline: f32, width: f32, font_size: f32) -> Self {
        Self {
            x0: x,
            y0: baseline - font_size * 0.2,
            x1: x + width,
            y1: baseline + font_size * 0.8,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// One contiguous run of identically styled text.
///
/// Spans are immutable once collected: fields are private and only
/// validated values get in through [`Span::new`], deserialization included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpanRecord")]
pub struct Span {
    text: String,
    font_size: f32,
    is_bold: bool,
    page: u32,
    position_index: usize,
    bbox: BoundingBox,
}

impl Span {
    /// Create a validated span.
    ///
    /// Rejects blank text, non-finite or negative font sizes and page 0.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        is_bold: bool,
        page: u32,
        position_index: usize,
        bbox: BoundingBox,
    ) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::invalid("span", "text is blank"));
        }
        if !font_size.is_finite() || font_size < 0.0 {
            return Err(Error::invalid(
                "span",
                format!("font size {} is not a valid size", font_size),
            ));
        }
        if page == 0 {
            return Err(Error::invalid("span", "page numbers start at 1"));
        }

        Ok(Self {
            text,
            font_size,
            is_bold,
            page,
            position_index,
            bbox,
        })
    }

    /// The span text (whitespace already collapsed by the collector).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font size in points.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Whether the run uses a bold face.
    pub fn is_bold(&self) -> bool {
        self.is_bold
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Position of the span among the kept spans of its page.
    pub fn position_index(&self) -> usize {
        self.position_index
    }

    /// Bounding geometry.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Number of characters (not bytes) in the text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Unvalidated wire form of a [`Span`].
#[derive(Deserialize)]
struct SpanRecord {
    text: String,
    font_size: f32,
    is_bold: bool,
    page: u32,
    position_index: usize,
    bbox: BoundingBox,
}

impl TryFrom<SpanRecord> for Span {
    type Error = Error;

    fn try_from(record: SpanRecord) -> Result<Self> {
        Span::new(
            record.text,
            record.font_size,
            record.is_bold,
            record.page,
            record.position_index,
            record.bbox,
        )
    }
}

/// Detect a bold face from its font name.
pub fn is_bold_font(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    lower.contains("bold") || lower.contains("bld")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_validation() {
        let bbox = BoundingBox::default();
        assert!(Span::new("Heading", 12.0, false, 1, 0, bbox).is_ok());
        assert!(Span::new("   ", 12.0, false, 1, 0, bbox).is_err());
        assert!(Span::new("Heading", f32::NAN, false, 1, 0, bbox).is_err());
        assert!(Span::new("Heading", -1.0, false, 1, 0, bbox).is_err());
        assert!(Span::new("Heading", 12.0, false, 0, 0, bbox).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let span = Span::new("Heading", 12.0, true, 2, 3, BoundingBox::default()).unwrap();
        let json = serde_json::to_string(&span).unwrap();
        assert_eq!(serde_json::from_str::<Span>(&json).unwrap(), span);

        let bbox = r#"{"x0":0.0,"y0":0.0,"x1":0.0,"y1":0.0}"#;
        let blank = format!(
            r#"{{"text":"  ","font_size":12.0,"is_bold":false,"page":1,"position_index":0,"bbox":{}}}"#,
            bbox
        );
        assert!(serde_json::from_str::<Span>(&blank).is_err());

        let page_zero = format!(
            r#"{{"text":"Heading","font_size":12.0,"is_bold":false,"page":0,"position_index":0,"bbox":{}}}"#,
            bbox
        );
        assert!(serde_json::from_str::<Span>(&page_zero).is_err());
    }

    #[test]
    fn test_char_len_counts_chars() {
        let span = Span::new("परिचय", 12.0, false, 1, 0, BoundingBox::default()).unwrap();
        assert_eq!(span.char_len(), 5);
        assert!(span.text().len() > 5);
    }

    #[test]
    fn test_bold_font_detection() {
        assert!(is_bold_font("Helvetica-Bold"));
        assert!(is_bold_font("ArialMT-Bld"));
        assert!(!is_bold_font("Mangal-Black"));
        assert!(!is_bold_font("Helvetica-Oblique"));
        assert!(!is_bold_font("NotoSansDevanagari-Regular"));
    }

    #[test]
    fn test_bbox_from_baseline() {
        let bbox = BoundingBox::from_baseline(10.0, 100.0, 50.0, 10.0);
        assert_eq!(bbox.x0, 10.0);
        assert_eq!(bbox.x1, 60.0);
        assert!((bbox.y0 - 98.0).abs() < 1e-4);
        assert!((bbox.y1 - 108.0).abs() < 1e-4);
        assert!((bbox.height() - 10.0).abs() < 1e-4);
    }
}
