//! lopdf-backed page source.
//!
//! Walks each page content stream, decodes text through the page fonts
//! and rebuilds lines and blocks from run positions.

use std::collections::HashMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::source::{DecodedBlock, DecodedLine, DecodedPage, PageSource, StyledRun};
use crate::error::{Error, Result};
use crate::lang::integrity::is_authentic_devanagari;
use crate::model::{BoundingBox, DocumentMetadata};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// TJ adjustments larger than this (thousandths of an em) become spaces.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Rough average glyph width as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// Check whether data starts like a PDF file.
///
/// The header may be preceded by junk bytes, so the first kilobyte is
/// searched.
pub fn has_pdf_header(data: &[u8]) -> bool {
    let window = &data[..data.len().min(1024)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !has_pdf_header(data) {
            return Err(Error::UnknownFormat);
        }
        let doc = LopdfDocument::load_mem(data)?;
        let pages = doc.get_pages().into_values().collect();
        Ok(Self { doc, pages })
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        let count = self.pages.len() as u32;
        if number == 0 || number > count {
            return Err(Error::PageOutOfRange(number, count));
        }
        Ok(self.pages[(number - 1) as usize])
    }

    fn page_fonts(&self, page_id: ObjectId) -> Result<HashMap<Vec<u8>, PageFont<'_>>> {
        let fonts = self.doc.get_page_fonts(page_id)?;
        Ok(fonts
            .into_iter()
            .map(|(name, dict)| (name, PageFont::from_dict(dict)))
            .collect())
    }

    /// Walk the content stream of one page and emit positioned runs.
    fn raw_runs(&self, page_id: ObjectId) -> Result<Vec<RawRun>> {
        let fonts = self.page_fonts(page_id)?;
        let data = self.doc.get_page_content(page_id)?;
        let content = lopdf::content::Content::decode(&data)?;

        let mut runs = Vec::new();
        let mut state = TextState::default();
        let mut font_key: Vec<u8> = Vec::new();
        let mut font_size = 12.0f32;
        let mut in_text = false;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    state.begin();
                }
                "ET" => in_text = false,
                "Tf" if operands.len() >= 2 => {
                    if let Object::Name(name) = &operands[0] {
                        font_key = name.clone();
                    }
                    font_size = number(&operands[1]).unwrap_or(12.0);
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(number) {
                        state.leading = Some(leading);
                    }
                }
                "Td" | "TD" if operands.len() >= 2 => {
                    let tx = number(&operands[0]).unwrap_or(0.0);
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = Some(-ty);
                    }
                    state.move_line(tx, ty);
                }
                "Tm" if operands.len() >= 6 => {
                    let mut m = [0.0f32; 6];
                    for (slot, operand) in m.iter_mut().zip(operands.iter()) {
                        *slot = number(operand).unwrap_or(0.0);
                    }
                    state.set_matrix(m);
                }
                "T*" => state.next_line(font_size),
                "Tj" | "TJ" | "'" | "\"" if in_text => {
                    if op.operator == "'" || op.operator == "\"" {
                        state.next_line(font_size);
                    }
                    let font = fonts.get(&font_key);
                    let text = match op.operator.as_str() {
                        "TJ" => match operands.first() {
                            Some(Object::Array(items)) => self.decode_array(font, items),
                            _ => String::new(),
                        },
                        "\"" => self.decode_operand(font, operands.get(2)),
                        _ => self.decode_operand(font, operands.first()),
                    };
                    if text.trim().is_empty() {
                        continue;
                    }

                    let size = font_size * state.scale();
                    let width = text.chars().count() as f32 * size * GLYPH_WIDTH_RATIO;
                    let (x, y) = state.origin();
                    runs.push(RawRun {
                        text,
                        x,
                        y,
                        width,
                        font_size: size,
                        font_name: font
                            .map(|f| f.base_font.clone())
                            .unwrap_or_else(|| String::from_utf8_lossy(&font_key).to_string()),
                    });
                    state.advance += width;
                }
                _ => {}
            }
        }

        Ok(runs)
    }

    fn decode_operand(&self, font: Option<&PageFont<'_>>, operand: Option<&Object>) -> String {
        match operand {
            Some(Object::String(bytes, _)) => decode_with(&self.doc, font, bytes),
            _ => String::new(),
        }
    }

    fn decode_array(&self, font: Option<&PageFont<'_>>, items: &[Object]) -> String {
        let mut combined = String::new();
        for item in items {
            let adjustment = match item {
                Object::String(bytes, _) => {
                    combined.push_str(&decode_with(&self.doc, font, bytes));
                    continue;
                }
                Object::Integer(n) => -(*n as f32),
                Object::Real(n) => -*n,
                _ => continue,
            };
            if adjustment > TJ_SPACE_THRESHOLD
                && !combined.is_empty()
                && !combined.ends_with(char::is_whitespace)
            {
                combined.push(' ');
            }
        }
        combined
    }

    fn info_dict(&self) -> Option<&Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<DecodedPage> {
        let page_id = self.page_id(number)?;
        let runs = self.raw_runs(page_id)?;
        let lines = group_into_lines(runs);
        Ok(DecodedPage {
            number,
            blocks: group_into_blocks(lines),
        })
    }

    fn page_text(&self, number: u32) -> Result<String> {
        self.page_id(number)?;
        let primary = match self.doc.extract_text(&[number]) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("Primary text extraction failed on page {}: {}", number, e);
                String::new()
            }
        };
        if !primary.trim().is_empty() && is_authentic_devanagari(&primary) {
            return Ok(primary);
        }
        Ok(self.page(number)?.text())
    }

    fn metadata(&self) -> DocumentMetadata {
        let mut metadata = DocumentMetadata {
            page_count: self.page_count(),
            ..Default::default()
        };
        if let Some(info) = self.info_dict() {
            metadata.title = info_string(info, b"Title");
            metadata.author = info_string(info, b"Author");
            metadata.subject = info_string(info, b"Subject");
            metadata.creator = info_string(info, b"Creator");
            metadata.producer = info_string(info, b"Producer");
        }
        metadata
    }
}

/// Font resource of one page.
struct PageFont<'a> {
    base_font: String,
    dict: &'a Dictionary,
}

impl<'a> PageFont<'a> {
    fn from_dict(dict: &'a Dictionary) -> Self {
        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        Self { base_font, dict }
    }
}

fn decode_with(doc: &LopdfDocument, font: Option<&PageFont<'_>>, bytes: &[u8]) -> String {
    if let Some(font) = font {
        if let Ok(encoding) = font.dict.get_font_encoding(doc) {
            if let Ok(text) = LopdfDocument::decode_text(&encoding, bytes) {
                return text;
            }
        }
    }
    decode_text_simple(bytes)
}

/// Decode a string without font information: UTF-16BE (BOM), then UTF-8,
/// then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn info_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let value = match dict.get(key).ok()? {
        Object::String(bytes, _) => decode_text_simple(bytes),
        Object::Name(bytes) => String::from_utf8_lossy(bytes).to_string(),
        _ => return None,
    };
    let value = value.trim_matches(char::from(0)).trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Text positioning state inside a BT/ET block.
#[derive(Debug, Clone, Copy)]
struct TextState {
    /// Text line matrix `[a b c d e f]`
    line: [f32; 6],
    /// Estimated horizontal advance since the line start
    advance: f32,
    leading: Option<f32>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            line: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            advance: 0.0,
            leading: None,
        }
    }
}

impl TextState {
    fn begin(&mut self) {
        self.line = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        self.advance = 0.0;
    }

    fn set_matrix(&mut self, m: [f32; 6]) {
        self.line = m;
        self.advance = 0.0;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.line;
        self.line[4] = e + tx * a + ty * c;
        self.line[5] = f + tx * b + ty * d;
        self.advance = 0.0;
    }

    fn next_line(&mut self, font_size: f32) {
        let leading = self.leading.unwrap_or(font_size * 1.2);
        self.move_line(0.0, -leading);
    }

    fn origin(&self) -> (f32, f32) {
        (self.line[4] + self.advance, self.line[5])
    }

    /// Vertical scale of the text matrix.
    fn scale(&self) -> f32 {
        let [_, _, c, d, _, _] = self.line;
        let scale = (c * c + d * d).sqrt();
        if scale > 0.0 {
            scale
        } else {
            1.0
        }
    }
}

/// A positioned run before line grouping.
#[derive(Debug, Clone)]
struct RawRun {
    text: String,
    x: f32,
    y: f32,
    width: f32,
    font_size: f32,
    font_name: String,
}

impl RawRun {
    fn same_style(&self, other: &RawRun) -> bool {
        self.font_name == other.font_name && (self.font_size - other.font_size).abs() < 0.01
    }

    fn into_styled(self) -> StyledRun {
        let bbox = BoundingBox::from_baseline(self.x, self.y, self.width, self.font_size);
        StyledRun {
            text: self.text,
            font_size: self.font_size,
            font_name: self.font_name,
            bbox,
        }
    }
}

/// Sort runs top to bottom then left to right and group them by baseline.
///
/// Adjacent runs of the same style on a line are merged into one.
fn group_into_lines(mut runs: Vec<RawRun>) -> Vec<LineGroup> {
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<RawRun>> = Vec::new();
    for run in runs {
        let same_line = lines
            .last()
            .and_then(|line| line.first())
            .map(|first| (run.y - first.y).abs() <= run.font_size.max(first.font_size) * 0.3)
            .unwrap_or(false);
        match lines.last_mut() {
            Some(line) if same_line => line.push(run),
            _ => lines.push(vec![run]),
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.x.total_cmp(&b.x));
            let mut merged: Vec<RawRun> = Vec::with_capacity(line.len());
            for run in line {
                match merged.last_mut() {
                    Some(prev) if prev.same_style(&run) => {
                        let gap = run.x - (prev.x + prev.width);
                        if gap > prev.font_size * 0.15 && !prev.text.ends_with(char::is_whitespace)
                        {
                            prev.text.push(' ');
                        }
                        prev.text.push_str(&run.text);
                        prev.width = (run.x + run.width) - prev.x;
                    }
                    _ => merged.push(run),
                }
            }
            LineGroup::new(merged)
        })
        .collect()
}

struct LineGroup {
    y: f32,
    x: f32,
    font_size: f32,
    runs: Vec<RawRun>,
}

impl LineGroup {
    fn new(runs: Vec<RawRun>) -> Self {
        let y = runs.first().map(|r| r.y).unwrap_or(0.0);
        let x = runs.first().map(|r| r.x).unwrap_or(0.0);
        let font_size = runs.iter().map(|r| r.font_size).fold(0.0, f32::max);
        Self {
            y,
            x,
            font_size,
            runs,
        }
    }

    fn into_decoded(self) -> DecodedLine {
        DecodedLine {
            runs: self.runs.into_iter().map(RawRun::into_styled).collect(),
        }
    }
}

/// Group lines into blocks on large vertical gaps or font size changes.
fn group_into_blocks(lines: Vec<LineGroup>) -> Vec<DecodedBlock> {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();
    let avg_spacing = if spacings.is_empty() {
        12.0
    } else {
        spacings.iter().sum::<f32>() / spacings.len() as f32
    };

    let mut blocks = Vec::new();
    let mut current: Vec<DecodedLine> = Vec::new();
    let mut prev: Option<(f32, f32, f32)> = None;

    for line in lines {
        if let Some((prev_y, prev_x, prev_size)) = prev {
            let breaks = (prev_y - line.y).abs() > avg_spacing * 1.5
                || (prev_size - line.font_size).abs() > 1.0
                || (prev_x - line.x).abs() > 20.0;
            if breaks && !current.is_empty() {
                blocks.push(DecodedBlock {
                    lines: std::mem::take(&mut current),
                });
            }
        }
        prev = Some((line.y, line.x, line.font_size));
        current.push(line.into_decoded());
    }
    if !current.is_empty() {
        blocks.push(DecodedBlock { lines: current });
    }

    blocks
}
