use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use assessment_scoring::models::{load_answers_json, load_catalog_toml};
use assessment_scoring::utils::logging::log_startup;
use assessment_scoring::{
    logger, Config, HistoryWriter, ScoreCache, ScoreHistoryEntry, ScoreReportAssembler, TriggeredBy,
};

const USAGE: &str = "用法: assessment_scoring <catalog.toml> <answers.json> [submission_id]";

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();
    config.validate()?;

    let mut args = std::env::args().skip(1);
    let catalog_path = PathBuf::from(args.next().context(USAGE)?);
    let answers_path = PathBuf::from(args.next().context(USAGE)?);
    let submission_id = args.next().unwrap_or_else(|| "local".to_string());

    let catalog = load_catalog_toml(&catalog_path, &config.default_category).await?;
    let answers = load_answers_json(&answers_path).await?;

    let cache = Arc::new(ScoreCache::new(Duration::from_secs(config.cache_ttl_secs)));
    let assembler = ScoreReportAssembler::new(&config).with_cache(cache);
    log_startup(&config, &assembler.oracle_status());

    let report = assembler.score(&answers, &catalog).await?;

    // 写入评分历史
    let entry = ScoreHistoryEntry::new(
        submission_id,
        report.clone(),
        assembler.model_label(),
        TriggeredBy::System,
    );
    let writer = HistoryWriter::with_path(&config.history_file);
    writer.append(&entry).await?;
    tracing::info!("评分历史已保存至: {}", writer.path());

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
