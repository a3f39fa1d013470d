//! 评分历史记录
//!
//! 每次评分生成一条记录，只追加，不修改。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::report::ScoreReport;

/// 触发评分的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggeredBy {
    Mentor,
    Admin,
    System,
}

/// 一条评分历史
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistoryEntry {
    /// 对应的提交 ID
    pub submission_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apprentice_id: Option<String>,
    pub scored_at: DateTime<Utc>,
    /// 使用的模型，启发式评分时为 `heuristic`
    pub model_used: String,
    pub triggered_by: TriggeredBy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_by_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub report: ScoreReport,
}

impl ScoreHistoryEntry {
    pub fn new(
        submission_id: impl Into<String>,
        report: ScoreReport,
        model_used: impl Into<String>,
        triggered_by: TriggeredBy,
    ) -> Self {
        Self {
            submission_id: submission_id.into(),
            apprentice_id: None,
            scored_at: Utc::now(),
            model_used: model_used.into(),
            triggered_by,
            triggered_by_user_id: None,
            notes: None,
            report,
        }
    }

    pub fn with_apprentice(mut self, apprentice_id: impl Into<String>) -> Self {
        self.apprentice_id = Some(apprentice_id.into());
        self
    }

    pub fn with_trigger_user(mut self, user_id: impl Into<String>) -> Self {
        self.triggered_by_user_id = Some(user_id.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
