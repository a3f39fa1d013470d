pub mod aggregator;
pub mod catalog;
pub mod categorizer;
pub mod category_scorer;
pub mod fallback;
pub mod history_writer;
pub mod response_parser;
pub mod score_cache;

pub use aggregator::{aggregate, Aggregate};
pub use catalog::{CatalogEntry, InMemoryCatalog, QuestionCatalog};
pub use categorizer::{categorize, Categorization};
pub use category_scorer::CategoryScorer;
pub use fallback::{fallback_category, fallback_results};
pub use history_writer::HistoryWriter;
pub use response_parser::{parse_oracle_response, ParsedResponse};
pub use score_cache::ScoreCache;
