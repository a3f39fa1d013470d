//! 评分历史写入服务 - 业务能力层
//!
//! 只负责"追加一条评分历史"能力，不关心流程

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::models::history::ScoreHistoryEntry;

/// 评分历史写入服务
///
/// 职责：
/// - 每条历史写成一行 JSON（JSONL）
/// - 只追加，不修改已写入的内容
pub struct HistoryWriter {
    history_file_path: String,
}

impl HistoryWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            history_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.history_file_path
    }

    /// 追加一条评分历史
    pub async fn append(&self, entry: &ScoreHistoryEntry) -> Result<()> {
        debug!(
            "写入评分历史: 提交 {} | 总分 {} | 模型 {}",
            entry.submission_id, entry.report.overall_score, entry.model_used
        );

        let mut line = serde_json::to_string(entry).context("无法序列化评分历史")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history_file_path)
            .with_context(|| format!("无法打开评分历史文件: {}", self.history_file_path))?;

        file.write_all(line.as_bytes())?;

        Ok(())
    }
}
