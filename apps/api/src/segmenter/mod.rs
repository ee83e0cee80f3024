// Technical-test segmenter.
// Splits a generated test document into display blocks and addressable
// questions, and binds them to an answer store. No HTTP or storage here.

pub mod accumulator;
pub mod classify;
pub mod handlers;
pub mod render;
pub mod rules;

pub use accumulator::{segment, Block, ChoiceOption, Question, QuestionKind, SegmentedTest};
pub use render::bind;
pub use rules::{ProfileKind, RuleProfile};
