//! Rendering of structure and ranking records.

mod json;

pub use json::{report_to_json, structure_to_json, to_json, JsonFormat};
