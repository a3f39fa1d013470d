use crate::models::answer::AnswerSet;
use crate::services::catalog::{CatalogEntry, InMemoryCatalog};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 题目目录文件格式
///
/// ```toml
/// [[questions]]
/// id = "q1"
/// text = "How often do you pray?"
/// category = "Prayer Life"
/// ```
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    questions: Vec<CatalogFileEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogFileEntry {
    id: String,
    text: String,
    category: Option<String>,
}

/// 解析 TOML 格式的题目目录
pub fn parse_catalog_toml(content: &str, default_category: &str) -> Result<InMemoryCatalog> {
    let file: CatalogFile = toml::from_str(content).context("无法解析题目目录")?;

    let mut catalog = InMemoryCatalog::new(default_category);
    for entry in file.questions {
        if catalog.contains(&entry.id) {
            tracing::warn!("题目目录中存在重复的题目ID: {}，后者覆盖前者", entry.id);
        }
        catalog.insert(
            entry.id,
            CatalogEntry {
                text: entry.text,
                category: entry.category,
            },
        );
    }

    Ok(catalog)
}

/// 从 TOML 文件加载题目目录
pub async fn load_catalog_toml(path: &Path, default_category: &str) -> Result<InMemoryCatalog> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取题目目录文件: {}", path.display()))?;

    let catalog = parse_catalog_toml(&content, default_category)
        .with_context(|| format!("无法解析题目目录文件: {}", path.display()))?;

    tracing::info!("成功加载 {} 道题目", catalog.len());
    Ok(catalog)
}

/// 从 JSON 文件加载答案（保持文件中的顺序）
pub async fn load_answers_json(path: &Path) -> Result<AnswerSet> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取答案文件: {}", path.display()))?;

    let answers: AnswerSet = serde_json::from_str(&content)
        .with_context(|| format!("无法解析答案文件: {}", path.display()))?;

    tracing::info!("成功加载 {} 条答案", answers.len());
    Ok(answers)
}
