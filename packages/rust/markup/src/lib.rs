//! Inline text markup: the format category catalog and the stripper.
//!
//! Formatted text carries escape-introduced control sequences such as
//! `\C1;` (color), `\Farial;` (font) or `{\S1/2;}` (stacked fraction).
//! [`strip`] removes exactly the categories the caller selects and leaves
//! everything else in place.

pub mod catalog;
mod passes;

use tracing::debug;

pub use catalog::{CodeSet, FormatCategory, FormatCode, category, is_known_code, list_categories};

/// Remove the selected categories of formatting from `text`.
///
/// Literal newlines always become paragraph breaks and grouping braces are
/// always removed, whatever the selection. Categories that act on the
/// container rather than the string (fields, mask, columns) have no effect
/// here. Never fails: a pattern that does not occur is a no-op.
pub fn strip(text: &str, codes: &CodeSet) -> String {
    let stripped = passes::run_pipeline(text, codes);
    debug!(
        codes = %codes,
        input_len = text.len(),
        output_len = stripped.len(),
        "stripped markup"
    );
    stripped
}
