use crate::error::ConfigError;

/// 占位用的 API Key，视为未配置
const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时评分的类别数量（1 表示顺序评分）
    pub max_concurrent_categories: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    /// LLM 总开关，关闭后全部使用启发式评分
    pub llm_enabled: bool,
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次 LLM 调用超时（秒）
    pub llm_timeout_secs: u64,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 评分配置 ---
    /// 题目没有类别时使用的默认类别名
    pub default_category: String,
    /// 没有任何类别可评分时的总分
    pub neutral_score: u8,
    /// 评分缓存有效期（秒）
    pub cache_ttl_secs: u64,
    /// 评分历史文件（JSONL，只追加）
    pub history_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_categories: 4,
            verbose_logging: false,
            llm_enabled: true,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_timeout_secs: 30,
            llm_temperature: 0.3,
            llm_max_tokens: 1024,
            default_category: "General Assessment".to_string(),
            neutral_score: 7,
            cache_ttl_secs: 300,
            history_file: "score_history.jsonl".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_categories: std::env::var("MAX_CONCURRENT_CATEGORIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_categories),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_enabled: std::env::var("LLM_ENABLED").ok().map(|v| parse_bool(&v)).unwrap_or(default.llm_enabled),
            llm_api_key: std::env::var("LLM_API_KEY").or_else(|_| std::env::var("OPENAI_API_KEY")).unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_timeout_secs),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_temperature),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
            default_category: std::env::var("DEFAULT_CATEGORY").unwrap_or(default.default_category),
            neutral_score: std::env::var("NEUTRAL_SCORE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.neutral_score),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.cache_ttl_secs),
            history_file: std::env::var("HISTORY_FILE").unwrap_or(default.history_file),
        }
    }

    /// 是否提供了可用的 API Key
    pub fn has_llm_credentials(&self) -> bool {
        let key = self.llm_api_key.trim();
        !key.is_empty() && key != PLACEHOLDER_API_KEY
    }

    /// LLM 是否可用（开关打开且有凭证）
    pub fn oracle_enabled(&self) -> bool {
        self.llm_enabled && self.has_llm_credentials()
    }

    /// 校验配置取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_categories == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_concurrent_categories",
                value: "0".to_string(),
                expected: "至少为 1",
            });
        }
        if self.llm_timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "llm_timeout_secs",
                value: "0".to_string(),
                expected: "至少为 1 秒",
            });
        }
        if !(1..=10).contains(&self.neutral_score) {
            return Err(ConfigError::OutOfRange {
                field: "neutral_score",
                value: self.neutral_score.to_string(),
                expected: "1 到 10 之间",
            });
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ConfigError::OutOfRange {
                field: "llm_temperature",
                value: self.llm_temperature.to_string(),
                expected: "0.0 到 2.0 之间",
            });
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
