//! LLM 服务 - 业务能力层
//!
//! 只负责"发一次 JSON 模式的对话补全"，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;

/// 对话补全能力
///
/// 返回第一个 choice 的内容；服务没有返回内容时为 `Ok(None)`，
/// 由调用方决定如何处理。
#[allow(async_fn_in_trait)]
pub trait CompletionClient {
    async fn complete_json(
        &self,
        system_message: &str,
        user_message: &str,
    ) -> Result<Option<String>, LlmError>;
}

impl<T: CompletionClient + ?Sized> CompletionClient for &T {
    async fn complete_json(
        &self,
        system_message: &str,
        user_message: &str,
    ) -> Result<Option<String>, LlmError> {
        (**self).complete_json(system_message, user_message).await
    }
}

/// LLM 服务
///
/// 职责：
/// - 每个文档一次请求，不做批量合并
/// - 要求服务以 JSON 对象格式返回
/// - 不做重试
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn build_messages(
        system_message: &str,
        user_message: &str,
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()
            .map_err(LlmError::RequestBuildFailed)?;

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(LlmError::RequestBuildFailed)?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ])
    }
}

impl CompletionClient for LlmService {
    async fn complete_json(
        &self,
        system_message: &str,
        user_message: &str,
    ) -> Result<Option<String>, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let messages = Self::build_messages(system_message, user_message)?;

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(LlmError::RequestBuildFailed)?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::ApiCallFailed {
                model: self.model_name.clone(),
                source: e,
            }
        })?;

        debug!("LLM API 调用成功，choices: {}", response.choices.len());

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> LlmService {
        let config = Config {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or_else(|_| "sk-test".to_string()),
            ..Config::default()
        }
        .apply_env();
        LlmService::new(&config)
    }

    #[test]
    fn test_build_messages_order() {
        let messages = LlmService::build_messages("You are a helpful assistant.", "prompt").unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_model_from_config() {
        let config = Config {
            llm_model_name: "gpt-4o-mini".to_string(),
            ..Config::default()
        };
        assert_eq!(LlmService::new(&config).model_name(), "gpt-4o-mini");
    }

    /// 测试真实 API 的 JSON 模式
    #[tokio::test]
    #[ignore]
    async fn test_complete_json_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let prompt = crate::services::prompt::build_prompt("XK-100 Lamp, 40W, 12V");

        let content = service
            .complete_json("You are a helpful assistant.", &prompt)
            .await
            .unwrap()
            .expect("LLM 没有返回内容");

        println!("\n========== LLM 响应 ==========\n{}\n", content);
        assert!(crate::models::ProductRecord::parse(&content).is_ok());
    }
}
