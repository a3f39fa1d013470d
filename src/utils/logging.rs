/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::clients::OracleStatus;
use crate::config::Config;
use crate::models::report::ScoreReport;

/// 记录程序启动信息
pub fn log_startup(config: &Config, status: &OracleStatus) {
    info!("{}", "=".repeat(60));
    info!("🚀 评分引擎启动");
    match status {
        OracleStatus::Configured { model } => info!("🤖 LLM 已配置，模型: {}", model),
        OracleStatus::NotConfigured => info!("🤖 LLM 未配置，使用启发式评分"),
    }
    info!("📊 类别最大并发数: {}", config.max_concurrent_categories);
    info!("{}", "=".repeat(60));
}

/// 记录评分报告摘要
pub fn log_report_summary(report: &ScoreReport, verbose: bool) {
    info!("{}", "─".repeat(60));
    info!("📊 总分: {}/10 ({} 个类别)", report.overall_score, report.categories.len());
    for result in report.categories.values() {
        info!(
            "  {} → {}/10 ({:?})",
            result.category, result.score, result.outcome
        );
        if verbose {
            info!("    建议: {}", truncate_text(&result.recommendation, 80));
        }
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("祷告生活很重要", 4), "祷告生活...");
    }
}
