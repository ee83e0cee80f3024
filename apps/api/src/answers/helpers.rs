use crate::segmenter::{Question, QuestionKind};

/// Minimum length for a multiline (exercise) answer.
const MIN_LONG_ANSWER_CHARS: usize = 10;

/// Checks an answer against the shape its question expects.
///
/// - Single choice: must be exactly one of the option values.
/// - Single-line free text: must not be blank.
/// - Multiline free text: at least 10 characters once trimmed.
pub fn validate_answer(question: &Question, answer: &str) -> bool {
    match question.kind {
        QuestionKind::SingleChoice => question.options.iter().any(|o| o.value() == answer),
        QuestionKind::FreeText if question.multiline => {
            answer.trim().chars().count() >= MIN_LONG_ANSWER_CHARS
        }
        QuestionKind::FreeText => !answer.trim().is_empty(),
    }
}

/// Rounded share of answered questions, 0–100.
pub fn progress_percent(total: usize, answered: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let answered = answered.min(total);
    ((answered as f64 / total as f64) * 100.0).round() as u32
}

/// `H:MM:SS` from one hour up, `M:SS` below.
pub fn format_time_remaining(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// HTML-escapes text a candidate typed before it is echoed back.
pub fn sanitize_input(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}
