//! LLM 客户端
//!
//! 封装所有与 LLM API 相关的调用逻辑
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;

/// 一次 LLM 调用的请求
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub system_message: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// 文本评估服务
///
/// 输入提示词，返回文本。评分器只依赖这个接口，测试里用假实现替换。
#[async_trait]
pub trait Oracle: Send + Sync {
    /// 模型名称，写入评分历史
    fn model_name(&self) -> &str;

    async fn complete(&self, request: &OracleRequest) -> Result<String, LlmError>;
}

/// LLM 配置状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum OracleStatus {
    Configured { model: String },
    /// 未配置，使用启发式评分
    NotConfigured,
}

/// 基于 OpenAI 兼容接口的实现
pub struct OpenAiOracle {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiOracle {
    /// 创建新的 LLM 客户端
    pub fn new(api_key: &str, api_base_url: &str, model_name: impl Into<String>) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: model_name.into(),
        }
    }

    /// 根据配置创建，LLM 被关闭或缺少 API Key 时返回 `None`
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.oracle_enabled() {
            debug!("LLM 未启用或缺少 API Key，将使用启发式评分");
            return None;
        }

        Some(Self::new(
            &config.llm_api_key,
            &config.llm_api_base_url,
            config.llm_model_name.clone(),
        ))
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: &OracleRequest) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", request.user_message.len());

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_message.as_str())
            .build()
            .map_err(|e| LlmError::RequestBuildFailed(e.to_string()))?;

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_message.as_str())
            .build()
            .map_err(|e| LlmError::RequestBuildFailed(e.to_string()))?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        // 构建请求
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
            .map_err(|e| LlmError::RequestBuildFailed(e.to_string()))?;

        // 调用 API
        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::api_call_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_credentials() {
        let config = Config::default();
        assert!(OpenAiOracle::from_config(&config).is_none());

        let config = Config {
            llm_api_key: "sk-test".to_string(),
            ..Config::default()
        };
        let oracle = OpenAiOracle::from_config(&config).unwrap();
        assert_eq!(oracle.model_name(), "gpt-4o-mini");

        let config = Config {
            llm_api_key: "sk-test".to_string(),
            llm_enabled: false,
            ..Config::default()
        };
        assert!(OpenAiOracle::from_config(&config).is_none());
    }

    /// 测试真实 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_live_completion -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_completion() {
        crate::logger::init();

        let config = Config::from_env();
        let Some(oracle) = OpenAiOracle::from_config(&config) else {
            println!("未配置 LLM_API_KEY，跳过");
            return;
        };

        let request = OracleRequest {
            system_message: "You are a concise assistant.".to_string(),
            user_message: "Reply with the JSON {\"score\": 5}".to_string(),
            temperature: config.llm_temperature,
            max_tokens: 64,
        };

        let response = oracle.complete(&request).await.unwrap();
        println!("LLM 响应: {}", response);
        assert!(!response.is_empty());
    }
}
