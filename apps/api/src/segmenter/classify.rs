//! Line Classifier: tags a single line of a technical-test document.
//!
//! Pure function of the line string. Priority order matters: a line is tested
//! against each shape in turn and the first match wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static OPTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-?\s*([A-D])\)(.*)$").expect("invalid lettered option regex")
});

static NUMBERED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s*(.*)$").expect("invalid numbered item regex"));

static BOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("invalid bold regex"));

/// A run of inline text, either plain or wrapped in `**`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSegment {
    pub text: String,
    pub bold: bool,
}

/// The shape of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `` ``` `` with the (possibly empty) language tag that follows it.
    CodeFence { language: String },
    H1(String),
    H2(String),
    H3(String),
    LetteredOption { letter: char, text: String },
    Bullet(String),
    NumberedItem { number: u32, rest: String },
    Bold(Vec<InlineSegment>),
    Blank,
    Paragraph(String),
}

impl LineKind {
    pub fn is_lettered_option(&self) -> bool {
        matches!(self, LineKind::LetteredOption { .. })
    }
}

pub fn classify(line: &str) -> LineKind {
    if let Some(language) = line.strip_prefix("```") {
        return LineKind::CodeFence {
            language: language.trim().to_string(),
        };
    }
    if let Some(text) = line.strip_prefix("# ") {
        return LineKind::H1(text.to_string());
    }
    if let Some(text) = line.strip_prefix("## ") {
        return LineKind::H2(text.to_string());
    }
    if let Some(text) = line.strip_prefix("### ") {
        return LineKind::H3(text.to_string());
    }
    if let Some(caps) = OPTION_PATTERN.captures(line) {
        // The pattern guarantees exactly one ASCII letter in group 1.
        let letter = caps[1].chars().next().unwrap_or('A');
        return LineKind::LetteredOption {
            letter,
            text: caps[2].trim().to_string(),
        };
    }
    if let Some(text) = line.strip_prefix("- ") {
        return LineKind::Bullet(text.to_string());
    }
    if let Some(caps) = NUMBERED_PATTERN.captures(line) {
        // Digit runs too long for u32 still classify; the number is display-only.
        let number = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        return LineKind::NumberedItem {
            number,
            rest: caps[2].to_string(),
        };
    }
    if line.contains("**") {
        return LineKind::Bold(split_bold(line));
    }
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    LineKind::Paragraph(line.to_string())
}

/// Splits a line into plain and bold runs. Empty plain runs are dropped;
/// an unmatched `**` stays in the plain text.
pub fn split_bold(line: &str) -> Vec<InlineSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in BOLD_PATTERN.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            segments.push(InlineSegment {
                text: line[cursor..whole.start()].to_string(),
                bold: false,
            });
        }
        segments.push(InlineSegment {
            text: inner.as_str().to_string(),
            bold: true,
        });
        cursor = whole.end();
    }

    if cursor < line.len() {
        segments.push(InlineSegment {
            text: line[cursor..].to_string(),
            bold: false,
        });
    }

    segments
}

/// Text of the first bold run, or an empty string.
pub fn first_bold_text(segments: &[InlineSegment]) -> &str {
    segments
        .iter()
        .find(|s| s.bold)
        .map(|s| s.text.as_str())
        .unwrap_or("")
}
