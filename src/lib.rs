//! # Assessment Scoring
//!
//! 问卷评分引擎：按类别对答案评分，生成完整的评分报告
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 外部文本评估服务的接入，只暴露能力
//! - `Oracle` - 评估服务接口，`OpenAiOracle` 为 OpenAI 兼容实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个模块只做一件事
//! - `categorizer` - 答案按类别分组
//! - `category_scorer` - 单个类别评分（LLM + 解析 + 兜底）
//! - `fallback` - 启发式评分（纯函数）
//! - `aggregator` - 总分与总结建议
//! - `score_cache` / `history_writer` - 由调用方按需注入
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/assembler` - 唯一的评分入口，管理并发与取消
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{OpenAiOracle, Oracle, OracleRequest, OracleStatus};
pub use config::Config;
pub use error::{AppError, AppResult, LlmError, ScoringError};
pub use models::{
    AnswerSet, CategoryGroup, CategoryResult, FallbackReason, QuestionFeedback, QuestionRef,
    ScoreHistoryEntry, ScoreOutcome, ScoreReport, TriggeredBy,
};
pub use orchestrator::{validate_submission, ScoreReportAssembler};
pub use services::{HistoryWriter, InMemoryCatalog, QuestionCatalog, ScoreCache};
pub use utils::{CancelHandle, CancelSignal};
