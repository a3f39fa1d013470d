//! 评分缓存
//!
//! 由调用方创建并注入，相同的类别和答案在有效期内直接复用 LLM 结果。
//! 不注入时评分器不做任何缓存。

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::answer::CategoryGroup;
use crate::models::report::CategoryResult;

const MAX_ENTRIES: usize = 1000;
const EVICT_BATCH: usize = 100;

struct CacheEntry {
    stored_at: Instant,
    value: CategoryResult,
}

/// 带过期时间的内存缓存
pub struct ScoreCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ScoreCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// 缓存键：类别 + 按顺序的 (题目 ID, 题干, 答案)
    ///
    /// 缓存的反馈带有题目 ID，所以 ID 必须参与计算。
    pub fn key_for(group: &CategoryGroup) -> String {
        let mut hasher = DefaultHasher::new();
        group.category.hash(&mut hasher);
        for item in &group.items {
            item.question.id.hash(&mut hasher);
            item.question.text.hash(&mut hasher);
            item.answer.hash(&mut hasher);
        }
        format!("category_score:{:016x}", hasher.finish())
    }

    pub fn get(&self, key: &str) -> Option<CategoryResult> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let expired = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                debug!("缓存命中: {}", key);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: String, value: CategoryResult) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );

        // 超出上限时淘汰最旧的一批
        if entries.len() > MAX_ENTRIES {
            let mut by_age: Vec<(String, Instant)> = entries
                .iter()
                .map(|(k, e)| (k.clone(), e.stored_at))
                .collect();
            by_age.sort_by_key(|(_, stored_at)| *stored_at);
            for (old_key, _) in by_age.into_iter().take(EVICT_BATCH) {
                entries.remove(&old_key);
            }
            debug!("缓存已满，淘汰 {} 条", EVICT_BATCH);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer::QuestionRef;
    use crate::models::report::ScoreOutcome;

    fn group(answer: &str) -> CategoryGroup {
        group_with_id("q1", answer)
    }

    fn group_with_id(id: &str, answer: &str) -> CategoryGroup {
        let mut group = CategoryGroup::new("Prayer Life");
        group.push(QuestionRef::new(id, "How do you pray?", Some("Prayer Life"), "General Assessment"), answer);
        group
    }

    fn result(score: u8) -> CategoryResult {
        CategoryResult {
            category: "Prayer Life".to_string(),
            score,
            recommendation: "Keep going".to_string(),
            question_feedback: Vec::new(),
            outcome: ScoreOutcome::StrictParse,
        }
    }

    #[test]
    fn test_key_depends_on_answers() {
        assert_eq!(ScoreCache::key_for(&group("daily")), ScoreCache::key_for(&group("daily")));
        assert_ne!(ScoreCache::key_for(&group("daily")), ScoreCache::key_for(&group("weekly")));
    }

    #[test]
    fn test_key_depends_on_question_ids() {
        assert_ne!(
            ScoreCache::key_for(&group_with_id("tmplA-q1", "daily")),
            ScoreCache::key_for(&group_with_id("tmplB-q7", "daily"))
        );
    }

    #[test]
    fn test_get_and_expire() {
        let cache = ScoreCache::new(Duration::from_secs(60));
        let key = ScoreCache::key_for(&group("daily"));
        cache.insert(key.clone(), result(8));
        assert_eq!(cache.get(&key).map(|r| r.score), Some(8));

        let cache = ScoreCache::new(Duration::ZERO);
        cache.insert(key.clone(), result(8));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_keeps_cache_bounded() {
        let cache = ScoreCache::new(Duration::from_secs(60));
        for i in 0..=MAX_ENTRIES {
            cache.insert(format!("key-{}", i), result(5));
        }
        assert_eq!(cache.len(), MAX_ENTRIES + 1 - EVICT_BATCH);
    }
}
