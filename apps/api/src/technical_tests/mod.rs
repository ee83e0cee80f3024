// Technical-test lifecycle: sent -> in progress -> submitted -> reviewed.
// Storage is behind `TestRepository`; all parsing goes through `segmenter`
// and `answers`.

pub mod handlers;
pub mod repository;
