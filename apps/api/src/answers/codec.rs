//! Answer blob codec: the flat-text submission format.
//!
//! ```text
//! Pregunta q1:
//! B) Dos
//!
//! Pregunta q2:
//! Mi explicación
//!
//! === Comentarios adicionales ===
//! texto libre
//! ```
//!
//! Parsing never fails; anything it cannot place is dropped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::store::AnswerStore;

static MARKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Pregunta (q\d+):").expect("invalid answer marker regex"));

static QUESTION_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^q(\d+)$").expect("invalid question id regex"));

const SECTION_PREFIX: &str = "===";
pub const COMMENTS_HEADER: &str = "=== Comentarios adicionales ===";

/// A parsed submission: per-question answers plus the trailing comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub answers: AnswerStore,
    pub comments: Option<String>,
}

/// Trims the answer and drops blank lines, the shape `parse_submission` returns.
pub fn canonical_answer(value: &str) -> String {
    value
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn question_number(id: &str) -> Option<u64> {
    QUESTION_ID_PATTERN
        .captures(id)
        .and_then(|caps| caps[1].parse().ok())
}

/// Serializes answers in ascending id order.
///
/// Blank answers and ids that are not `q<digits>` are skipped, since the
/// parser could never map them back.
pub fn serialize_answers(answers: &AnswerStore, comments: Option<&str>) -> String {
    let mut numbered: Vec<(u64, &str, String)> = answers
        .entries()
        .filter_map(|(id, value)| match question_number(id) {
            Some(n) => Some((n, id, canonical_answer(value))),
            None => {
                debug!(question_id = id, "skipping answer with non-question id");
                None
            }
        })
        .filter(|(_, _, value)| !value.is_empty())
        .collect();
    numbered.sort_by_key(|(n, _, _)| *n);

    let mut blob = String::new();
    for (_, id, value) in numbered {
        blob.push_str(&format!("Pregunta {id}:\n{value}\n\n"));
    }

    if let Some(comments) = comments.map(canonical_answer).filter(|c| !c.is_empty()) {
        blob.push_str(COMMENTS_HEADER);
        blob.push('\n');
        blob.push_str(&comments);
        blob.push('\n');
    }

    blob
}

enum Section {
    Preamble,
    Question(String),
    Comments,
}

fn append_line(buffer: &mut String, line: &str) {
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(line);
}

fn commit(answers: &mut AnswerStore, section: &Section, buffer: &str) {
    if let Section::Question(id) = section {
        let value = buffer.trim();
        if !value.is_empty() {
            answers.set(id.clone(), value);
        }
    }
}

/// Rebuilds answers (and trailing comments) from a submitted blob.
///
/// A line starting with `===` does not just get skipped: it closes the open
/// answer, and every later line up to the next `Pregunta qN:` marker goes to
/// `comments`. Text after the comments header is therefore never appended to
/// the last question's answer.
pub fn parse_submission(blob: &str) -> Submission {
    let mut answers = AnswerStore::new();
    let mut comments = String::new();
    let mut section = Section::Preamble;
    let mut buffer = String::new();

    for line in blob.lines() {
        if let Some(caps) = MARKER_PATTERN.captures(line) {
            commit(&mut answers, &section, &buffer);
            section = Section::Question(caps[1].to_string());
            buffer.clear();
        } else if line.starts_with(SECTION_PREFIX) {
            commit(&mut answers, &section, &buffer);
            section = Section::Comments;
            buffer.clear();
        } else if !line.trim().is_empty() {
            match section {
                Section::Preamble => {}
                Section::Question(_) => append_line(&mut buffer, line),
                Section::Comments => append_line(&mut comments, line),
            }
        }
    }
    commit(&mut answers, &section, &buffer);

    let comments = comments.trim();
    Submission {
        answers,
        comments: (!comments.is_empty()).then(|| comments.to_string()),
    }
}

/// Id → answer mapping of a submitted blob. Absent input gives an empty store.
pub fn parse_submitted_answers(blob: Option<&str>) -> AnswerStore {
    blob.map(|b| parse_submission(b).answers).unwrap_or_default()
}
