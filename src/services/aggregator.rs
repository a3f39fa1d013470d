//! 结果汇总 - 业务能力层
//!
//! 计算总分并生成总结建议

use crate::models::report::CategoryResult;

/// 最强与最弱类别的分差超过该值时，才在总结里点名最弱类别
const WEAK_AREA_GAP: u8 = 2;

const CLOSING_ENCOURAGEMENT: &str =
    "Maintain consistent practice and seek guidance from your mentor in the areas that need growth.";

/// 汇总结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub overall_score: u8,
    pub summary_recommendation: String,
}

/// 汇总所有类别
///
/// 总分为各类别分数的向下取整平均值；没有类别时使用 `neutral_score`。
/// 并列时取先出现的类别。
pub fn aggregate(results: &[CategoryResult], neutral_score: u8) -> Aggregate {
    let Some((strongest, weakest)) = extremes(results) else {
        return Aggregate {
            overall_score: neutral_score,
            summary_recommendation: format!(
                "No answers could be matched to assessment categories, so no category scores are available. {}",
                CLOSING_ENCOURAGEMENT
            ),
        };
    };

    let total: u32 = results.iter().map(|r| u32::from(r.score)).sum();
    let overall_score = (total / results.len() as u32) as u8;

    let mut summary = format!(
        "Your strongest area is {} (score {}/10).",
        strongest.category, strongest.score
    );
    if strongest.score.saturating_sub(weakest.score) > WEAK_AREA_GAP {
        summary.push_str(&format!(
            " Give focused attention to {} (score {}/10), which has the most room to grow.",
            weakest.category, weakest.score
        ));
    }
    summary.push(' ');
    summary.push_str(CLOSING_ENCOURAGEMENT);

    Aggregate {
        overall_score,
        summary_recommendation: summary,
    }
}

fn extremes(results: &[CategoryResult]) -> Option<(&CategoryResult, &CategoryResult)> {
    let first = results.first()?;
    let mut strongest = first;
    let mut weakest = first;

    for result in &results[1..] {
        if result.score > strongest.score {
            strongest = result;
        }
        if result.score < weakest.score {
            weakest = result;
        }
    }

    Some((strongest, weakest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::ScoreOutcome;

    fn result(category: &str, score: u8) -> CategoryResult {
        CategoryResult {
            category: category.to_string(),
            score,
            recommendation: String::new(),
            question_feedback: Vec::new(),
            outcome: ScoreOutcome::StrictParse,
        }
    }

    #[test]
    fn test_floor_average_and_weak_area() {
        let results = vec![result("Prayer Life", 9), result("Service", 5), result("Community", 7)];
        let agg = aggregate(&results, 7);

        assert_eq!(agg.overall_score, 7);
        assert!(agg.summary_recommendation.contains("strongest area is Prayer Life"));
        assert!(agg.summary_recommendation.contains("attention to Service"));
        assert!(agg.summary_recommendation.ends_with(CLOSING_ENCOURAGEMENT));
    }

    #[test]
    fn test_average_is_floored() {
        let results = vec![result("A", 8), result("B", 7)];
        assert_eq!(aggregate(&results, 7).overall_score, 7);
    }

    #[test]
    fn test_small_gap_omits_weak_area() {
        let results = vec![result("A", 8), result("B", 6)];
        let agg = aggregate(&results, 7);

        assert!(agg.summary_recommendation.contains("strongest area is A"));
        assert!(!agg.summary_recommendation.contains("attention to"));
    }

    #[test]
    fn test_ties_pick_first_seen() {
        let results = vec![result("A", 9), result("B", 3), result("C", 9), result("D", 3)];
        let agg = aggregate(&results, 7);

        assert!(agg.summary_recommendation.contains("strongest area is A"));
        assert!(agg.summary_recommendation.contains("attention to B"));
    }

    #[test]
    fn test_empty_uses_neutral_score() {
        let agg = aggregate(&[], 7);
        assert_eq!(agg.overall_score, 7);
        assert!(agg.summary_recommendation.ends_with(CLOSING_ENCOURAGEMENT));
    }
}
