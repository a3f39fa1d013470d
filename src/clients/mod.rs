pub mod llm_client;

pub use llm_client::{OpenAiOracle, Oracle, OracleRequest, OracleStatus};
