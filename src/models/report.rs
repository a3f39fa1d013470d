//! 评分结果数据结构

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 单题反馈
///
/// `correct` / `explanation` 只对事实类题目有意义；观点/经历类题目的 `explanation` 为空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFeedback {
    /// 提交时的题目 ID（按位置回填，尽力而为）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    pub question: String,
    pub answer: String,
    pub correct: bool,
    #[serde(default)]
    pub explanation: String,
}

/// 降级到启发式评分的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum FallbackReason {
    /// LLM 未配置或被关闭
    OracleDisabled,
    /// 调用失败（网络、鉴权等）
    OracleError(String),
    /// 调用超时
    Timeout,
    /// 调用方取消
    Cancelled,
    /// 返回内容无法解析，也提取不到分数
    Unparseable,
}

/// 单个类别分数的来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ScoreOutcome {
    /// LLM 返回了完整的结构化结果
    StrictParse,
    /// 结构化解析失败，但从原文中提取到了分数
    PartialRecovery,
    /// 使用启发式评分
    FallbackUsed { reason: FallbackReason },
}

impl ScoreOutcome {
    pub fn fallback(reason: FallbackReason) -> Self {
        ScoreOutcome::FallbackUsed { reason }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ScoreOutcome::FallbackUsed { .. })
    }
}

/// 单个类别的评分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: String,
    /// 1 到 10
    pub score: u8,
    pub recommendation: String,
    pub question_feedback: Vec<QuestionFeedback>,
    pub outcome: ScoreOutcome,
}

/// 完整的评分报告，组装完成后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall_score: u8,
    /// 类别名 → 结果，顺序与类别首次出现的顺序一致
    pub categories: IndexMap<String, CategoryResult>,
    /// 所有类别反馈按类别顺序拼接
    pub question_feedback: Vec<QuestionFeedback>,
    pub summary_recommendation: String,
}

impl ScoreReport {
    /// 由各类别结果组装报告
    pub(crate) fn assemble(
        results: Vec<CategoryResult>,
        overall_score: u8,
        summary_recommendation: String,
    ) -> Self {
        let question_feedback = results
            .iter()
            .flat_map(|r| r.question_feedback.iter().cloned())
            .collect();

        let categories = results
            .into_iter()
            .map(|r| (r.category.clone(), r))
            .collect();

        Self {
            overall_score,
            categories,
            question_feedback,
            summary_recommendation,
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryResult> {
        self.categories.get(name)
    }

    /// 按报告顺序返回类别名
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// 是否有任何类别使用了启发式评分
    pub fn used_fallback(&self) -> bool {
        self.categories.values().any(|r| r.outcome.is_fallback())
    }
}
