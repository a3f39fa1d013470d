pub mod toml_loader;

pub use toml_loader::{load_answers_json, load_catalog_toml, parse_catalog_toml};
