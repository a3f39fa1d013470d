//! 启发式评分 - 业务能力层
//!
//! LLM 不可用或返回内容无法使用时的兜底评分。纯函数，不做任何外部调用。

use crate::models::answer::CategoryGroup;
use crate::models::report::{CategoryResult, FallbackReason, QuestionFeedback, ScoreOutcome};

/// 答案超过这个词数才判为"回答充分"
const MIN_DETAILED_WORDS: usize = 5;

/// 平均每多这么多个词加一分，20 个词封顶
const WORDS_PER_POINT: f64 = 4.0;

/// 回答不充分时的说明
pub const MORE_DETAIL_EXPLANATION: &str =
    "Please provide more detail in your answer so it can be evaluated fully.";

/// 类别的通用建议
pub fn generic_recommendation(category: &str) -> String {
    format!(
        "Continue growing in {}: set aside regular time for it and talk with your mentor about next steps.",
        category
    )
}

/// 对单个类别做启发式评分
///
/// 分数 = 5 + 平均词数 / 4，四舍五入后限制在 1 到 10。
pub fn fallback_category(group: &CategoryGroup, reason: FallbackReason) -> CategoryResult {
    let question_feedback = group
        .items
        .iter()
        .map(|item| {
            let detailed = word_count(&item.answer) > MIN_DETAILED_WORDS;
            QuestionFeedback {
                question_id: Some(item.question.id.clone()),
                question: item.question.text.clone(),
                answer: item.answer.clone(),
                correct: detailed,
                explanation: if detailed {
                    String::new()
                } else {
                    MORE_DETAIL_EXPLANATION.to_string()
                },
            }
        })
        .collect();

    CategoryResult {
        category: group.category.clone(),
        score: heuristic_score(group),
        recommendation: generic_recommendation(&group.category),
        question_feedback,
        outcome: ScoreOutcome::fallback(reason),
    }
}

/// 对所有类别做启发式评分，顺序不变
pub fn fallback_results(groups: &[CategoryGroup], reason: FallbackReason) -> Vec<CategoryResult> {
    groups
        .iter()
        .map(|group| fallback_category(group, reason.clone()))
        .collect()
}

fn heuristic_score(group: &CategoryGroup) -> u8 {
    if group.is_empty() {
        return 5;
    }

    let total_words: usize = group.items.iter().map(|item| word_count(&item.answer)).sum();
    let average = total_words as f64 / group.len() as f64;

    (5.0 + average / WORDS_PER_POINT).round().clamp(1.0, 10.0) as u8
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
