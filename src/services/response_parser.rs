//! LLM 返回内容解析
//!
//! 三级解析：
//! 1. 严格按固定结构解析 JSON（允许外层包了 ```json 代码块或多余文字）
//! 2. 失败时用正则只提取 `score`
//! 3. 仍然失败则交给启发式评分

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// LLM 应返回的结构
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OracleScorePayload {
    pub score: f64,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub question_feedback: Vec<OracleFeedbackItem>,
}

/// LLM 返回的单题反馈
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OracleFeedbackItem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// 解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// 完整解析
    Strict(OracleScorePayload),
    /// 只提取到了分数
    Partial { score: f64 },
    /// 无法使用
    Unusable,
}

/// 解析 LLM 返回的原始文本
pub fn parse_oracle_response(raw: &str) -> ParsedResponse {
    for candidate in json_candidates(raw) {
        match serde_json::from_str::<OracleScorePayload>(candidate) {
            Ok(payload) if payload.score.is_finite() => return ParsedResponse::Strict(payload),
            Ok(_) => debug!("LLM 返回的分数不是有限数值"),
            Err(e) => debug!("结构化解析失败: {}", e),
        }
    }

    match extract_score(raw) {
        Some(score) => ParsedResponse::Partial { score },
        None => ParsedResponse::Unusable,
    }
}

/// 把分数转换为 1 到 10 的整数（四舍五入）
pub fn clamp_score(score: f64) -> u8 {
    if !score.is_finite() {
        return 1;
    }
    score.round().clamp(1.0, 10.0) as u8
}

/// 依次尝试：原文、去掉代码块后的内容、第一个 `{` 到最后一个 `}` 之间的内容
fn json_candidates(raw: &str) -> Vec<&str> {
    let trimmed = raw.trim();
    let mut candidates = vec![trimmed];

    let unfenced = strip_code_fence(trimmed);
    if unfenced != trimmed {
        candidates.push(unfenced);
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            let braced = &trimmed[start..=end];
            if !candidates.contains(&braced) {
                candidates.push(braced);
            }
        }
    }

    candidates
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // 跳过语言标记（如 json）
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn score_regex() -> Option<&'static Regex> {
    static SCORE_RE: OnceLock<Option<Regex>> = OnceLock::new();
    SCORE_RE
        .get_or_init(|| Regex::new(r#"(?i)["']?score["']?\s*[:=]\s*["']?(-?\d+(?:\.\d+)?)"#).ok())
        .as_ref()
}

fn extract_score(raw: &str) -> Option<f64> {
    score_regex()?
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
