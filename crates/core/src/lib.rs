//! Question-draw domain for leetdraw: catalog types, text normalization, and random selection.

pub mod config;
pub mod domain;
pub mod errors;
pub mod normalize;
pub mod selector;

pub use domain::question::{
    problem_url, Difficulty, DisplayRecord, QuestionDetail, QuestionSlug, QuestionSummary,
    TopicTag,
};
pub use errors::{DrawError, FetchError, APOLOGY_MESSAGE};
pub use normalize::{join_tags, strip_markup};
pub use selector::{QuestionSelector, QuestionSource, SeededPicker, SlugPicker, UniformPicker};
