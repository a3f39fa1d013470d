//! 题目目录查询 - 业务能力层
//!
//! 只负责"题目 ID → 题干 + 类别"的解析

use std::collections::HashMap;

use crate::models::answer::QuestionRef;

/// 题目目录查询接口
///
/// 查不到时返回 `None`，由调用方决定如何处理。测试里可以直接传闭包。
pub trait QuestionCatalog: Send + Sync {
    fn resolve(&self, question_id: &str) -> Option<QuestionRef>;
}

impl<F> QuestionCatalog for F
where
    F: Fn(&str) -> Option<QuestionRef> + Send + Sync,
{
    fn resolve(&self, question_id: &str) -> Option<QuestionRef> {
        self(question_id)
    }
}

/// 目录中的一道题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub text: String,
    pub category: Option<String>,
}

/// 内存中的题目目录
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    entries: HashMap<String, CatalogEntry>,
    default_category: String,
}

impl InMemoryCatalog {
    pub fn new(default_category: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            default_category: default_category.into(),
        }
    }

    pub fn insert(&mut self, question_id: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(question_id.into(), entry);
    }

    /// 便捷方法：直接添加题干和类别
    pub fn with_question(
        mut self,
        question_id: impl Into<String>,
        text: impl Into<String>,
        category: Option<&str>,
    ) -> Self {
        self.insert(
            question_id,
            CatalogEntry {
                text: text.into(),
                category: category.map(str::to_string),
            },
        );
        self
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.entries.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl QuestionCatalog for InMemoryCatalog {
    fn resolve(&self, question_id: &str) -> Option<QuestionRef> {
        self.entries.get(question_id).map(|entry| {
            QuestionRef::new(
                question_id,
                entry.text.clone(),
                entry.category.as_deref(),
                &self.default_category,
            )
        })
    }
}
