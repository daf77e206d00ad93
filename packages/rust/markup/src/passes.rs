//! Text passes of the markup stripper.
//!
//! Each pass is a function `&str -> String`. Linefeed normalization and brace
//! cleanup always run; every other pass runs only when its code is selected.
//! A pass whose pattern does not occur returns its input unchanged.

use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};
use tracing::{trace, warn};

use crate::catalog::{CodeSet, FormatCode};

/// Upper bound on rewrites performed by a single fixpoint pass.
pub(crate) const MAX_FIXPOINT_ITERATIONS: usize = 4096;

/// Paragraph-break control sequence.
const PARAGRAPH_BREAK: &str = r"\P";

/// Run every pass on `text`, in the fixed order.
pub(crate) fn run_pipeline(text: &str, codes: &CodeSet) -> String {
    let mut result = normalize_linefeeds(text);

    result = apply(codes, FormatCode::Alignment, strip_alignment, result);
    result = apply(codes, FormatCode::Tabs, replace_tabs, result);
    result = apply(codes, FormatCode::Color, strip_color, result);
    result = apply(codes, FormatCode::Font, strip_font, result);
    result = apply(codes, FormatCode::Height, strip_height, result);
    result = apply(codes, FormatCode::Overline, strip_overline, result);
    result = apply(codes, FormatCode::Oblique, strip_oblique, result);
    result = apply(codes, FormatCode::ParagraphAlignment, strip_paragraph_alignment, result);
    result = apply(codes, FormatCode::Paragraph, strip_paragraph_breaks, result);
    result = apply(codes, FormatCode::Stacking, unstack_fractions, result);
    result = apply(codes, FormatCode::Strikethrough, strip_strikethrough, result);
    result = apply(codes, FormatCode::Tracking, strip_tracking, result);
    result = apply(codes, FormatCode::Underline, strip_underline, result);
    result = apply(codes, FormatCode::Width, strip_width, result);
    result = apply(codes, FormatCode::NonBreakingSpace, replace_hard_spaces, result);
    // Fractions and strike-through groups can surface once the passes above
    // have removed the codes wrapped around them.
    result = apply(codes, FormatCode::Stacking, unstack_fractions, result);
    result = apply(codes, FormatCode::Strikethrough, strip_strikethrough, result);

    strip_braces(&result)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run `pass` when `code` is selected.
fn apply(codes: &CodeSet, code: FormatCode, pass: fn(&str) -> String, text: String) -> String {
    if codes.contains(code) {
        trace!(%code, "applying pass");
        pass(&text)
    } else {
        text
    }
}

/// Replace every match of `re` with the literal `replacement`.
fn replace_literal(re: &Regex, text: &str, replacement: &str) -> String {
    re.replace_all(text, NoExpand(replacement)).into_owned()
}

/// Rewrite the leftmost match of `re` until none remains.
///
/// `rewrite` gets the captures and the text after the match; returning `None`
/// ends the pass. Every rewrite must shorten the text. The loop still stops
/// after [`MAX_FIXPOINT_ITERATIONS`] and returns what it has so far.
fn until_fixpoint(
    text: &str,
    re: &Regex,
    pass: &'static str,
    rewrite: impl Fn(&Captures<'_>, &str) -> Option<String>,
) -> String {
    let mut current = text.to_string();

    for _ in 0..MAX_FIXPOINT_ITERATIONS {
        let (range, replacement) = {
            let Some(caps) = re.captures(&current) else {
                return current;
            };
            let Some(whole) = caps.get(0) else {
                return current;
            };
            let Some(replacement) = rewrite(&caps, &current[whole.end()..]) else {
                return current;
            };
            (whole.range(), replacement)
        };
        current.replace_range(range, &replacement);
    }

    if re.is_match(&current) {
        warn!(
            pass,
            limit = MAX_FIXPOINT_ITERATIONS,
            "fixpoint pass hit its iteration cap, returning partial result"
        );
    }
    current
}

// ---------------------------------------------------------------------------
// Unconditional passes
// ---------------------------------------------------------------------------

/// Replace literal newlines with the paragraph-break sequence.
fn normalize_linefeeds(text: &str) -> String {
    static LF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n").expect("valid regex"));

    replace_literal(&LF_RE, text, PARAGRAPH_BREAK)
}

/// Remove every grouping brace.
fn strip_braces(text: &str) -> String {
    static BRACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[{}]").expect("valid regex"));

    replace_literal(&BRACE_RE, text, "")
}

// ---------------------------------------------------------------------------
// Selectable passes
// ---------------------------------------------------------------------------

/// `A`: `\A0;`, `\A1;`, `\A2;`.
fn strip_alignment(text: &str) -> String {
    static ALIGN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\A[012];").expect("valid regex"));

    replace_literal(&ALIGN_RE, text, "")
}

/// `B`: tabs become single spaces.
fn replace_tabs(text: &str) -> String {
    static TAB_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\t").expect("valid regex"));

    replace_literal(&TAB_RE, text, " ")
}

/// `C`: `\C<n>;` or `\c<n>;`.
fn strip_color(text: &str) -> String {
    static COLOR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\[Cc]\d*;").expect("valid regex"));

    replace_literal(&COLOR_RE, text, "")
}

/// `F`: `\F...;` or `\f...;`, value free-form up to the first `;`.
fn strip_font(text: &str) -> String {
    static FONT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\[Ff].*?;").expect("valid regex"));

    replace_literal(&FONT_RE, text, "")
}

/// `H`: height multiplier, `\H1.5x;`.
fn strip_height(text: &str) -> String {
    static HEIGHT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\H[0-9]*?\.?[0-9]*?[xX]+;").expect("valid regex"));

    replace_literal(&HEIGHT_RE, text, "")
}

/// `O`: `\O` on, `\o` off.
fn strip_overline(text: &str) -> String {
    static OVERLINE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\[Oo]").expect("valid regex"));

    replace_literal(&OVERLINE_RE, text, "")
}

/// `Q`: `\Q<signed number>;`.
fn strip_oblique(text: &str) -> String {
    static OBLIQUE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\Q-?[0-9]*?\.?[0-9]+;").expect("valid regex"));

    replace_literal(&OBLIQUE_RE, text, "")
}

/// `X`: `\p...;` (lower-case only; `\P` is a paragraph break).
fn strip_paragraph_alignment(text: &str) -> String {
    static PARA_ALIGN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\p.*?;").expect("valid regex"));

    replace_literal(&PARA_ALIGN_RE, text, "")
}

/// `P`: every `\P`, joining paragraphs.
fn strip_paragraph_breaks(text: &str) -> String {
    static PARA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\P").expect("valid regex"));

    replace_literal(&PARA_RE, text, "")
}

/// `S`: `{\S1/2;...}` becomes `1/2...}`.
///
/// Only the opener is rewritten, and only when a closing brace follows it
/// somewhere later. An alignment directive directly inside the opening brace
/// goes with it. The closing brace is left for [`strip_braces`].
fn unstack_fractions(text: &str) -> String {
    static STACK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{(?:\\A[012];)?\\S(\s*\d+/\d+);").expect("valid regex"));

    // Later openers have even less text after them, so the first one
    // without a closing brace ends the pass.
    until_fixpoint(text, &STACK_RE, "stacking", |caps, rest| {
        rest.contains('}').then(|| caps[1].to_string())
    })
}

/// `K`: `{\Kc}` becomes `c`; `{\K}` disappears.
fn strip_strikethrough(text: &str) -> String {
    static STRIKE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{\\K(.?)\}").expect("valid regex"));

    until_fixpoint(text, &STRIKE_RE, "strikethrough", |caps, _| {
        Some(caps[1].to_string())
    })
}

/// `T`: `\T<n>;`.
fn strip_tracking(text: &str) -> String {
    static TRACKING_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\T[0-9]?\.?[0-9]+;").expect("valid regex"));

    replace_literal(&TRACKING_RE, text, "")
}

/// `U`: `\L` on, `\l` off.
fn strip_underline(text: &str) -> String {
    static UNDERLINE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\[Ll]").expect("valid regex"));

    replace_literal(&UNDERLINE_RE, text, "")
}

/// `W`: `\W<n>;`.
fn strip_width(text: &str) -> String {
    static WIDTH_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\W[0-9]?\.?[0-9]+;").expect("valid regex"));

    replace_literal(&WIDTH_RE, text, "")
}

/// `Z`: `\~`, or a font-scoped `{\F...\~}` block, becomes a plain space.
fn replace_hard_spaces(text: &str) -> String {
    static HARD_SPACE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{\\[Ff](.*?)\\~\}|\\~").expect("valid regex"));

    replace_literal(&HARD_SPACE_RE, text, " ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
