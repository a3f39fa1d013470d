//! 提交的答案与题目引用

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 用户提交的答案集合
///
/// 题目 ID → 答案文本。保持插入顺序，类别分组的先后顺序依赖于它。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: IndexMap<String, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一条答案，已存在的题目 ID 会被覆盖（位置不变）
    pub fn insert(&mut self, question_id: impl Into<String>, answer: impl Into<String>) {
        self.answers.insert(question_id.into(), answer.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// 按提交顺序遍历 (题目 ID, 答案)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// 已解析的题目引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRef {
    pub id: String,
    pub text: String,
    pub category: String,
}

impl QuestionRef {
    /// 创建题目引用，类别缺失或为空白时使用 `default_category`
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        category: Option<&str>,
        default_category: &str,
    ) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(default_category);

        Self {
            id: id.into(),
            text: text.into(),
            category: category.to_string(),
        }
    }
}

/// 一道题及其答案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: QuestionRef,
    pub answer: String,
}

/// 同一类别下的所有题目和答案，顺序与提交顺序一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<AnsweredQuestion>,
}

impl CategoryGroup {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, question: QuestionRef, answer: impl Into<String>) {
        self.items.push(AnsweredQuestion {
            question,
            answer: answer.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
