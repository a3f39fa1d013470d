//! 类别评分 - 业务能力层
//!
//! 只负责"给一个类别打分"，不关心流程
//!
//! 对外保证：每个类别一定返回一个 `CategoryResult`，所有 LLM 错误都在这里消化。
//! 调用只做一次，不重试。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clients::{Oracle, OracleRequest};
use crate::config::Config;
use crate::error::LlmError;
use crate::models::answer::CategoryGroup;
use crate::models::report::{CategoryResult, FallbackReason, QuestionFeedback, ScoreOutcome};
use crate::services::fallback::{fallback_category, generic_recommendation};
use crate::services::response_parser::{clamp_score, parse_oracle_response, OracleScorePayload, ParsedResponse};
use crate::services::score_cache::ScoreCache;
use crate::utils::cancel::CancelSignal;
use crate::utils::logging::truncate_text;

const SYSTEM_MESSAGE: &str = "You are an experienced mentor who evaluates written answers to a \
personal growth assessment. You judge each category fairly, explain factual mistakes briefly, \
and never judge personal opinions or experiences as right or wrong. \
You always answer with a single valid JSON object and nothing else.";

/// 类别评分器
pub struct CategoryScorer {
    oracle: Option<Arc<dyn Oracle>>,
    cache: Option<Arc<ScoreCache>>,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
}

impl CategoryScorer {
    /// 创建评分器，`oracle` 为 `None` 或配置关闭 LLM 时全部使用启发式评分
    pub fn new(config: &Config, oracle: Option<Arc<dyn Oracle>>) -> Self {
        let oracle = if config.llm_enabled {
            oracle
        } else {
            if oracle.is_some() {
                debug!("配置已关闭 LLM，忽略注入的评分模型");
            }
            None
        };

        Self {
            oracle,
            cache: None,
            timeout: Duration::from_secs(config.llm_timeout_secs),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    /// 注入评分缓存
    pub fn with_cache(mut self, cache: Arc<ScoreCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// 覆盖单次调用超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn oracle(&self) -> Option<&Arc<dyn Oracle>> {
        self.oracle.as_ref()
    }

    /// 给一个类别打分，永不失败
    pub async fn score_category(&self, group: &CategoryGroup, cancel: &CancelSignal) -> CategoryResult {
        let Some(oracle) = &self.oracle else {
            debug!("[{}] LLM 未配置，使用启发式评分", group.category);
            return fallback_category(group, FallbackReason::OracleDisabled);
        };

        if cancel.is_cancelled() {
            info!("[{}] 评分已取消，使用启发式评分", group.category);
            return fallback_category(group, FallbackReason::Cancelled);
        }

        let cache_key = self.cache.as_ref().map(|_| ScoreCache::key_for(group));
        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(cached) = cache.get(key) {
                return cached;
            }
        }

        let request = self.build_request(group);

        let raw = match self.call_oracle(oracle.as_ref(), &request, cancel).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("[{}] ⚠️ {}，使用启发式评分", group.category, e);
                return fallback_category(group, fallback_reason(&e));
            }
        };

        let result = match parse_oracle_response(&raw) {
            ParsedResponse::Strict(payload) => {
                info!("[{}] ✓ LLM 评分完成: {}", group.category, clamp_score(payload.score));
                strict_result(group, payload)
            }
            ParsedResponse::Partial { score } => {
                warn!(
                    "[{}] ⚠️ LLM 返回内容不是有效 JSON，只提取到分数 {}",
                    group.category, score
                );
                CategoryResult {
                    category: group.category.clone(),
                    score: clamp_score(score),
                    recommendation: generic_recommendation(&group.category),
                    question_feedback: Vec::new(),
                    outcome: ScoreOutcome::PartialRecovery,
                }
            }
            ParsedResponse::Unusable => {
                warn!(
                    "[{}] ⚠️ 无法解析 LLM 返回内容: '{}'，使用启发式评分",
                    group.category,
                    truncate_text(&raw, 120)
                );
                return fallback_category(group, FallbackReason::Unparseable);
            }
        };

        if let (Some(cache), Some(key), ScoreOutcome::StrictParse) = (&self.cache, cache_key, &result.outcome) {
            cache.insert(key, result.clone());
        }

        result
    }

    /// 带超时和取消的单次调用
    async fn call_oracle(
        &self,
        oracle: &dyn Oracle,
        request: &OracleRequest,
        cancel: &CancelSignal,
    ) -> Result<String, LlmError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LlmError::Cancelled),
            result = tokio::time::timeout(self.timeout, oracle.complete(request)) => match result {
                Ok(inner) => inner,
                Err(_) => Err(LlmError::Timeout { timeout: self.timeout }),
            },
        }
    }

    fn build_request(&self, group: &CategoryGroup) -> OracleRequest {
        OracleRequest {
            system_message: SYSTEM_MESSAGE.to_string(),
            user_message: build_prompt(group),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn fallback_reason(error: &LlmError) -> FallbackReason {
    match error {
        LlmError::Timeout { .. } => FallbackReason::Timeout,
        LlmError::Cancelled => FallbackReason::Cancelled,
        other => FallbackReason::OracleError(other.to_string()),
    }
}

/// 把完整解析的结果转换为 `CategoryResult`
///
/// 题目 ID 按位置回填，两边数量不一致时多出的反馈直接丢弃。
fn strict_result(group: &CategoryGroup, payload: OracleScorePayload) -> CategoryResult {
    let recommendation = payload
        .recommendation
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| generic_recommendation(&group.category));

    if payload.question_feedback.len() != group.len() {
        debug!(
            "[{}] 反馈数量 {} 与题目数量 {} 不一致，按较短的一方对齐",
            group.category,
            payload.question_feedback.len(),
            group.len()
        );
    }

    let question_feedback = group
        .items
        .iter()
        .zip(payload.question_feedback)
        .map(|(item, feedback)| QuestionFeedback {
            question_id: Some(item.question.id.clone()),
            question: if feedback.question.trim().is_empty() {
                item.question.text.clone()
            } else {
                feedback.question
            },
            answer: if feedback.answer.trim().is_empty() {
                item.answer.clone()
            } else {
                feedback.answer
            },
            correct: feedback.correct,
            explanation: feedback.explanation.unwrap_or_default(),
        })
        .collect();

    CategoryResult {
        category: group.category.clone(),
        score: clamp_score(payload.score),
        recommendation,
        question_feedback,
        outcome: ScoreOutcome::StrictParse,
    }
}

/// 构建评分提示词
fn build_prompt(group: &CategoryGroup) -> String {
    let questions: Vec<serde_json::Value> = group
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::json!({
                "index": idx + 1,
                "question": &item.question.text,
                "answer": &item.answer,
            })
        })
        .collect();

    let questions_json = serde_json::to_string_pretty(&questions).unwrap_or_default();

    format!(
        r#"Evaluate the answers in the category "{category}".

Rating scale for the category score (integer 1-10):
- 1-3: major gaps, little evidence of growth in this area
- 4-6: developing, some foundations but inconsistent
- 7-8: good, consistent and growing
- 9-10: excellent, mature and able to help others

For each question, first decide its type:
- FACT: the question has an objectively correct answer. Set "correct" accordingly and, when the answer is wrong, give a short "explanation" of the correct answer.
- OPINION/EXPERIENCE: the question asks about personal practice, feelings or experience. There is no right or wrong: set "correct" to true and leave "explanation" as an empty string.

Questions and answers ({count} total, keep the same order in your feedback):
{questions}

Respond with exactly one JSON object in this shape and nothing else:
{{
  "score": <integer 1-10>,
  "recommendation": "<one or two sentences for the mentor on how to help in this category>",
  "question_feedback": [
    {{"question": "<question text>", "answer": "<answer text>", "correct": <true|false>, "explanation": "<text or empty>"}}
  ]
}}"#,
        category = group.category,
        count = group.len(),
        questions = questions_json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer::QuestionRef;
    use crate::utils::cancel::CancelHandle;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 固定返回一段文本
    struct CannedOracle {
        response: String,
        calls: AtomicUsize,
    }

    impl CannedOracle {
        fn new(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Oracle for CannedOracle {
        fn model_name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, _request: &OracleRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    struct FailingOracle;

    #[async_trait]
    impl Oracle for FailingOracle {
        fn model_name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &OracleRequest) -> Result<String, LlmError> {
            Err(LlmError::api_call_failed(
                "failing",
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            ))
        }
    }

    struct SlowOracle;

    #[async_trait]
    impl Oracle for SlowOracle {
        fn model_name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, _request: &OracleRequest) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(r#"{"score": 9}"#.to_string())
        }
    }

    fn group() -> CategoryGroup {
        let mut group = CategoryGroup::new("Bible Knowledge");
        group.push(
            QuestionRef::new("q1", "Who led Israel out of Egypt?", Some("Bible Knowledge"), "General Assessment"),
            "Moses led them out",
        );
        group.push(
            QuestionRef::new("q2", "How often do you read Scripture?", Some("Bible Knowledge"), "General Assessment"),
            "Most days of the week",
        );
        group
    }

    fn scorer(oracle: Option<Arc<dyn Oracle>>) -> CategoryScorer {
        CategoryScorer::new(&Config::default(), oracle)
    }

    #[tokio::test]
    async fn test_no_oracle_uses_fallback() {
        let result = scorer(None).score_category(&group(), &CancelSignal::never()).await;
        assert_eq!(result.outcome, ScoreOutcome::fallback(FallbackReason::OracleDisabled));
        assert_eq!(result.question_feedback.len(), 2);
    }

    #[tokio::test]
    async fn test_strict_response_reattaches_ids() {
        let oracle = CannedOracle::new(
            r#"{"score": 8.4, "recommendation": "Encourage daily reading.", "question_feedback": [
                {"question": "Who led Israel out of Egypt?", "answer": "Moses led them out", "correct": true, "explanation": ""},
                {"question": "How often do you read Scripture?", "answer": "Most days of the week", "correct": true, "explanation": ""}
            ]}"#,
        );
        let result = scorer(Some(oracle)).score_category(&group(), &CancelSignal::never()).await;

        assert_eq!(result.outcome, ScoreOutcome::StrictParse);
        assert_eq!(result.score, 8);
        assert_eq!(result.recommendation, "Encourage daily reading.");
        let ids: Vec<_> = result.question_feedback.iter().map(|f| f.question_id.clone()).collect();
        assert_eq!(ids, vec![Some("q1".to_string()), Some("q2".to_string())]);
    }

    #[tokio::test]
    async fn test_extra_feedback_is_dropped_and_missing_recommendation_defaulted() {
        let oracle = CannedOracle::new(
            r#"{"score": 14, "question_feedback": [
                {"question": "a", "answer": "b", "correct": false, "explanation": "It was Moses."},
                {"question": "c", "answer": "d", "correct": true},
                {"question": "e", "answer": "f", "correct": true}
            ]}"#,
        );
        let result = scorer(Some(oracle)).score_category(&group(), &CancelSignal::never()).await;

        assert_eq!(result.score, 10);
        assert_eq!(result.recommendation, generic_recommendation("Bible Knowledge"));
        assert_eq!(result.question_feedback.len(), 2);
        assert_eq!(result.question_feedback[0].explanation, "It was Moses.");
        assert_eq!(result.question_feedback[1].explanation, "");
    }

    #[tokio::test]
    async fn test_short_feedback_list_is_kept() {
        let oracle = CannedOracle::new(r#"{"score": 5, "question_feedback": [{"correct": true}]}"#);
        let result = scorer(Some(oracle)).score_category(&group(), &CancelSignal::never()).await;

        assert_eq!(result.question_feedback.len(), 1);
        assert_eq!(result.question_feedback[0].question, "Who led Israel out of Egypt?");
        assert_eq!(result.question_feedback[0].answer, "Moses led them out");
    }

    #[tokio::test]
    async fn test_partial_recovery() {
        let oracle = CannedOracle::new(r#"Sure! {"score": 6, "recommendation": "cut off"#);
        let result = scorer(Some(oracle)).score_category(&group(), &CancelSignal::never()).await;

        assert_eq!(result.outcome, ScoreOutcome::PartialRecovery);
        assert_eq!(result.score, 6);
        assert!(result.question_feedback.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_falls_back() {
        let oracle = CannedOracle::new("<html>502 Bad Gateway</html>");
        let result = scorer(Some(oracle)).score_category(&group(), &CancelSignal::never()).await;
        assert_eq!(result.outcome, ScoreOutcome::fallback(FallbackReason::Unparseable));
    }

    #[tokio::test]
    async fn test_network_error_falls_back() {
        let result = scorer(Some(Arc::new(FailingOracle)))
            .score_category(&group(), &CancelSignal::never())
            .await;
        assert!(matches!(
            result.outcome,
            ScoreOutcome::FallbackUsed { reason: FallbackReason::OracleError(_) }
        ));
        assert!((1..=10).contains(&result.score));
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let result = scorer(Some(Arc::new(SlowOracle)))
            .with_timeout(Duration::from_millis(20))
            .score_category(&group(), &CancelSignal::never())
            .await;
        assert_eq!(result.outcome, ScoreOutcome::fallback(FallbackReason::Timeout));
    }

    #[tokio::test]
    async fn test_cancel_abandons_call() {
        let (handle, signal) = CancelHandle::new();
        let scorer = scorer(Some(Arc::new(SlowOracle)));

        let canceller = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        };
        let group = group();
        let (result, _) = tokio::join!(scorer.score_category(&group, &signal), canceller);

        assert_eq!(result.outcome, ScoreOutcome::fallback(FallbackReason::Cancelled));
    }

    #[tokio::test]
    async fn test_disabled_flag_ignores_injected_oracle() {
        let oracle = CannedOracle::new(r#"{"score": 9, "question_feedback": []}"#);
        let config = Config {
            llm_enabled: false,
            ..Config::default()
        };
        let scorer = CategoryScorer::new(&config, Some(oracle.clone()));

        assert!(scorer.oracle().is_none());
        let result = scorer.score_category(&group(), &CancelSignal::never()).await;
        assert_eq!(result.outcome, ScoreOutcome::fallback(FallbackReason::OracleDisabled));
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_keeps_ids_of_current_submission() {
        let oracle = CannedOracle::new(
            r#"{"score": 8, "recommendation": "ok", "question_feedback": [{"correct": true}]}"#,
        );
        let cache = Arc::new(ScoreCache::new(Duration::from_secs(60)));
        let scorer = scorer(Some(oracle.clone())).with_cache(cache);

        let single = |id: &str| {
            let mut group = CategoryGroup::new("Prayer Life");
            group.push(QuestionRef::new(id, "How do you pray?", Some("Prayer Life"), "General Assessment"), "daily");
            group
        };

        let first = scorer.score_category(&single("tmplA-q1"), &CancelSignal::never()).await;
        let second = scorer.score_category(&single("tmplB-q7"), &CancelSignal::never()).await;

        assert_eq!(first.question_feedback[0].question_id.as_deref(), Some("tmplA-q1"));
        assert_eq!(second.question_feedback[0].question_id.as_deref(), Some("tmplB-q7"));
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_timeout_error_keeps_sub_second_precision() {
        let err = LlmError::Timeout {
            timeout: Duration::from_millis(250),
        };
        assert!(err.to_string().contains("250ms"));
    }

    #[tokio::test]
    async fn test_cache_reuses_strict_results() {
        let oracle = CannedOracle::new(r#"{"score": 7, "recommendation": "ok", "question_feedback": []}"#);
        let cache = Arc::new(ScoreCache::new(Duration::from_secs(60)));
        let scorer = scorer(Some(oracle.clone())).with_cache(cache.clone());

        let first = scorer.score_category(&group(), &CancelSignal::never()).await;
        let second = scorer.score_category(&group(), &CancelSignal::never()).await;

        assert_eq!(first, second);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_prompt_contains_contract() {
        let prompt = build_prompt(&group());
        assert!(prompt.contains("Bible Knowledge"));
        assert!(prompt.contains("1-3: major gaps"));
        assert!(prompt.contains("FACT"));
        assert!(prompt.contains("OPINION/EXPERIENCE"));
        assert!(prompt.contains("\"question_feedback\""));
        assert!(prompt.contains("Who led Israel out of Egypt?"));
    }
}
