//! Binds segmented blocks to an answer store for display.

use crate::answers::store::AnswerStore;
use crate::segmenter::accumulator::Block;
use crate::segmenter::rules::ProfileKind;

/// An option counts as selected when the stored answer is its exact value,
/// or at least starts with its `"<letter>)"` prefix.
fn is_selected(answer: Option<&str>, letter: char, value: &str) -> bool {
    let Some(answer) = answer else {
        return false;
    };
    let answer = answer.trim();
    answer == value || answer.starts_with(&format!("{letter})"))
}

/// Fills `selected` and `value` from `answers`.
///
/// The reviewer view hides text inputs the candidate left empty.
pub fn bind(blocks: &[Block], answers: &AnswerStore, view: ProfileKind) -> Vec<Block> {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Option {
                question_id,
                letter,
                text,
                value,
                ..
            } => Some(Block::Option {
                question_id: question_id.clone(),
                letter: *letter,
                text: text.clone(),
                value: value.clone(),
                selected: is_selected(answers.get(question_id), *letter, value),
            }),
            Block::TextInput {
                question_id,
                multiline,
                ..
            } => {
                let value = answers.get(question_id).unwrap_or_default().to_string();
                if view == ProfileKind::Reviewer && value.trim().is_empty() {
                    return None;
                }
                Some(Block::TextInput {
                    question_id: question_id.clone(),
                    multiline: *multiline,
                    value,
                })
            }
            other => Some(other.clone()),
        })
        .collect()
}
