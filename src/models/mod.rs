pub mod answer;
pub mod history;
pub mod loaders;
pub mod report;

pub use answer::{AnswerSet, AnsweredQuestion, CategoryGroup, QuestionRef};
pub use history::{ScoreHistoryEntry, TriggeredBy};
pub use loaders::{load_answers_json, load_catalog_toml, parse_catalog_toml};
pub use report::{CategoryResult, FallbackReason, QuestionFeedback, ScoreOutcome, ScoreReport};
