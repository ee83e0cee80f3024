// Answer store, submission blob codec, and answer helpers.

pub mod codec;
pub mod handlers;
pub mod helpers;
pub mod store;

pub use codec::{parse_submission, parse_submitted_answers, serialize_answers, Submission};
pub use store::AnswerStore;
