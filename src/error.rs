use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 评分业务错误
    #[error("评分错误: {0}")]
    Scoring(#[from] ScoringError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// LLM 服务错误
///
/// 评分器会在本地消化这些错误并降级到启发式评分，不会传给调用方。
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败（网络、鉴权等）
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 构建请求失败
    #[error("构建LLM请求失败: {0}")]
    RequestBuildFailed(String),
    /// 调用超时
    #[error("LLM调用超时 ({timeout:?})")]
    Timeout { timeout: std::time::Duration },
    /// 调用被取消
    #[error("LLM调用已取消")]
    Cancelled,
}

/// 评分业务错误
#[derive(Debug, Error)]
pub enum ScoringError {
    /// 提交的答案为空
    #[error("提交的答案为空，无法评分")]
    EmptySubmission,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置值超出范围
    #[error("配置项 {field} 的值 '{value}' 无效: 应当{expected}")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 是否为空提交错误
    pub fn is_empty_submission(&self) -> bool {
        matches!(self, AppError::Scoring(ScoringError::EmptySubmission))
    }
}

impl LlmError {
    /// 创建LLM API调用错误
    pub fn api_call_failed(model: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
