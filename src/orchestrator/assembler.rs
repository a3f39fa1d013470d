//! 评分报告组装器 - 编排层
//!
//! ## 职责
//!
//! 对外唯一的评分入口：分组 → 各类别评分 → 汇总 → 报告。
//!
//! ## 核心功能
//!
//! 1. **提交校验**：空提交直接返回 `ScoringError::EmptySubmission`
//! 2. **并发评分**：各类别相互独立，最多 `max_concurrent_categories` 个同时评分
//! 3. **顺序保证**：报告中的类别顺序与分组顺序一致，与完成先后无关
//! 4. **取消**：取消后未完成的类别改用启发式评分，报告依然完整

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::clients::{OpenAiOracle, Oracle, OracleStatus};
use crate::config::Config;
use crate::error::{AppResult, ScoringError};
use crate::models::answer::AnswerSet;
use crate::models::report::ScoreReport;
use crate::services::aggregator::aggregate;
use crate::services::catalog::QuestionCatalog;
use crate::services::categorizer::categorize;
use crate::services::category_scorer::CategoryScorer;
use crate::services::score_cache::ScoreCache;
use crate::utils::cancel::CancelSignal;
use crate::utils::logging::log_report_summary;

/// 启发式评分时写入历史的模型名
pub const HEURISTIC_MODEL: &str = "heuristic";

/// 校验提交，空提交返回错误
pub fn validate_submission(answers: &AnswerSet) -> Result<(), ScoringError> {
    if answers.is_empty() {
        return Err(ScoringError::EmptySubmission);
    }
    Ok(())
}

/// 评分报告组装器
pub struct ScoreReportAssembler {
    scorer: CategoryScorer,
    max_concurrent: usize,
    neutral_score: u8,
    verbose_logging: bool,
}

impl ScoreReportAssembler {
    /// 根据配置创建，配置了 API Key 时使用 OpenAI 兼容接口
    pub fn new(config: &Config) -> Self {
        let oracle = OpenAiOracle::from_config(config).map(|o| Arc::new(o) as Arc<dyn Oracle>);
        Self::with_oracle(config, oracle)
    }

    /// 使用指定的 LLM 实现（`None` 表示只用启发式评分）
    pub fn with_oracle(config: &Config, oracle: Option<Arc<dyn Oracle>>) -> Self {
        Self::with_scorer(config, CategoryScorer::new(config, oracle))
    }

    /// 使用自定义的类别评分器
    pub fn with_scorer(config: &Config, scorer: CategoryScorer) -> Self {
        Self {
            scorer,
            max_concurrent: config.max_concurrent_categories.max(1),
            neutral_score: config.neutral_score.clamp(1, 10),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 注入评分缓存
    pub fn with_cache(mut self, cache: Arc<ScoreCache>) -> Self {
        self.scorer = self.scorer.with_cache(cache);
        self
    }

    /// LLM 配置状态
    pub fn oracle_status(&self) -> OracleStatus {
        match self.scorer.oracle() {
            Some(oracle) => OracleStatus::Configured {
                model: oracle.model_name().to_string(),
            },
            None => OracleStatus::NotConfigured,
        }
    }

    /// 写入评分历史的模型名
    pub fn model_label(&self) -> String {
        self.scorer
            .oracle()
            .map(|o| o.model_name().to_string())
            .unwrap_or_else(|| HEURISTIC_MODEL.to_string())
    }

    /// 对一份提交评分
    ///
    /// 只有空提交会返回错误；其它情况（包括所有题目都查不到）都会返回完整报告。
    pub async fn score(&self, answers: &AnswerSet, catalog: &dyn QuestionCatalog) -> AppResult<ScoreReport> {
        self.score_with_cancel(answers, catalog, CancelSignal::never()).await
    }

    /// 带取消信号的评分
    pub async fn score_with_cancel(
        &self,
        answers: &AnswerSet,
        catalog: &dyn QuestionCatalog,
        cancel: CancelSignal,
    ) -> AppResult<ScoreReport> {
        validate_submission(answers)?;

        let categorization = categorize(answers, catalog);
        if !categorization.unresolved.is_empty() {
            warn!(
                "⚠️ {} 条答案无法匹配题目，不参与评分: {:?}",
                categorization.unresolved.len(),
                categorization.unresolved
            );
        }

        info!(
            "开始评分: {} 条答案, {} 个类别",
            answers.len(),
            categorization.groups.len()
        );

        // buffered 按输入顺序产出结果
        let scorer = &self.scorer;
        let cancel = &cancel;
        let results = stream::iter(categorization.groups.iter())
            .map(move |group| scorer.score_category(group, cancel))
            .buffered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        let summary = aggregate(&results, self.neutral_score);
        let report = ScoreReport::assemble(results, summary.overall_score, summary.summary_recommendation);

        log_report_summary(&report, self.verbose_logging);

        Ok(report)
    }
}
