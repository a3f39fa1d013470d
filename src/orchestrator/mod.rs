//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次评分的完整调度，是整个引擎唯一的对外入口。
//!
//! ## 层次关系
//!
//! ```text
//! assembler (处理 AnswerSet)
//!     ↓
//! services::categorizer (分组)
//!     ↓
//! services::category_scorer (处理单个类别，可并发)
//!     ↓
//! clients::Oracle / services::fallback
//!     ↓
//! services::aggregator (汇总)
//! ```
//!
//! ## 设计原则
//!
//! 1. **只做调度**：具体的评分、解析、汇总都在能力层
//! 2. **向下依赖**：编排层 → services → clients
//! 3. **永远出报告**：除空提交外不向调用方返回错误

pub mod assembler;

// 重新导出主要类型
pub use assembler::{validate_submission, ScoreReportAssembler, HEURISTIC_MODEL};
