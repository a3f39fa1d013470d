//! 答案分组 - 业务能力层
//!
//! 把提交的答案按类别分组，类别顺序以首次出现为准

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::models::answer::{AnswerSet, CategoryGroup};
use crate::services::catalog::QuestionCatalog;

/// 分组结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categorization {
    /// 按首次出现顺序排列的类别分组
    pub groups: Vec<CategoryGroup>,
    /// 目录中查不到的题目 ID（不参与评分，原答案仍由调用方保存）
    pub unresolved: Vec<String>,
}

impl Categorization {
    pub fn answered_count(&self) -> usize {
        self.groups.iter().map(CategoryGroup::len).sum()
    }
}

/// 按类别对答案分组
///
/// 同样的输入总是得到同样的分组和顺序。
pub fn categorize(answers: &AnswerSet, catalog: &dyn QuestionCatalog) -> Categorization {
    let mut groups: IndexMap<String, CategoryGroup> = IndexMap::new();
    let mut unresolved = Vec::new();

    for (question_id, answer) in answers.iter() {
        let Some(question) = catalog.resolve(question_id) else {
            warn!("题目 {} 在目录中不存在，跳过评分", question_id);
            unresolved.push(question_id.to_string());
            continue;
        };

        groups
            .entry(question.category.clone())
            .or_insert_with(|| CategoryGroup::new(question.category.clone()))
            .push(question, answer);
    }

    debug!(
        "分组完成: {} 个类别, {} 道题无法解析",
        groups.len(),
        unresolved.len()
    );

    Categorization {
        groups: groups.into_values().collect(),
        unresolved,
    }
}
