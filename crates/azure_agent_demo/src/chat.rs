//! Minimal chat-completions client for an Azure OpenAI deployment.
//!
//! One POST per completion, no retries, no streaming. Authentication is
//! either a shared key sent in the `api-key` header or a bearer token
//! obtained from a [`TokenCredential`] (see [`crate::auth`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use azure_agent_demo::chat::{ChatClient, ChatCredential};
//!
//! # fn example() -> azure_agent_demo::error::AgentResult<()> {
//! let client = ChatClient::builder()
//!     .endpoint("https://your-resource.openai.azure.com")
//!     .deployment("gpt-4o")
//!     .credential(ChatCredential::api_key("your-key"))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use azure_core::credentials::TokenCredential;
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AgentError, AgentResult};

/// Default API version for Azure OpenAI chat completions.
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Token scope requested for Entra ID authentication.
pub(crate) const COGNITIVE_SERVICES_SCOPE: &str = "https://cognitiveservices.azure.com/.default";

/// Environment variable holding the Azure OpenAI endpoint URL.
pub const ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";
/// Environment variable holding the chat deployment name.
pub const DEPLOYMENT_VAR: &str = "AZURE_OPENAI_CHAT_DEPLOYMENT_NAME";
/// Environment variable holding an optional shared key.
pub const API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";

/// Credential types accepted by [`ChatClient`].
#[derive(Clone)]
pub enum ChatCredential {
    /// Shared-key authentication via the `api-key` header.
    ApiKey(SecretString),

    /// Entra ID token-based authentication.
    Token(Arc<dyn TokenCredential>),
}

impl ChatCredential {
    /// Create a shared-key credential.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(SecretString::from(key.into()))
    }

    /// Wrap a resolved token credential.
    pub fn token(credential: Arc<dyn TokenCredential>) -> Self {
        Self::Token(credential)
    }

    /// Create a shared-key credential from `AZURE_OPENAI_API_KEY`, if set.
    pub fn from_env() -> Option<Self> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.is_empty() => Some(Self::api_key(key)),
            _ => None,
        }
    }

    /// Resolve the credential to an authentication header.
    async fn resolve(&self) -> AgentResult<(&'static str, String)> {
        match self {
            Self::ApiKey(key) => Ok(("api-key", key.expose_secret().to_string())),
            Self::Token(credential) => {
                let token = credential
                    .get_token(&[COGNITIVE_SERVICES_SCOPE], None)
                    .await
                    .map_err(|e| AgentError::Auth(format!("token acquisition failed: {e}")))?;
                Ok(("Authorization", format!("Bearer {}", token.token.secret())))
            }
        }
    }
}

impl std::fmt::Debug for ChatCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => write!(f, "ChatCredential::ApiKey(****)"),
            Self::Token(_) => write!(f, "ChatCredential::Token(..)"),
        }
    }
}

/// Client for one Azure OpenAI chat deployment.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: HttpClient,
    endpoint: Url,
    deployment: String,
    api_version: String,
    credential: ChatCredential,
}

/// Builder for constructing a [`ChatClient`].
#[derive(Debug, Default)]
pub struct ChatClientBuilder {
    endpoint: Option<String>,
    deployment: Option<String>,
    api_version: Option<String>,
    credential: Option<ChatCredential>,
    http_client: Option<HttpClient>,
}

impl ChatClient {
    /// Create a new builder for configuring a `ChatClient`.
    pub fn builder() -> ChatClientBuilder {
        ChatClientBuilder::default()
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the deployment name.
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// Get the API version being used.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn completions_url(&self) -> AgentResult<Url> {
        let path = format!("openai/deployments/{}/chat/completions", self.deployment);
        let mut url = self
            .endpoint
            .join(&path)
            .map_err(|e| AgentError::InvalidEndpoint(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    /// Send one chat completion request.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> AgentResult<ChatCompletionResponse> {
        let url = self.completions_url()?;
        let (header, value) = self.credential.resolve().await?;

        tracing::debug!(deployment = %self.deployment, "sending chat completion request");

        let response = self
            .http
            .post(url)
            .header(header, value)
            .json(request)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json::<ChatCompletionResponse>().await?)
    }

    /// Check the response status and return an error if not successful.
    async fn check_response(response: reqwest::Response) -> AgentResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        // Prefer the structured API error shape when the body parses.
        if let Ok(error) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(err_obj) = error.get("error") {
                return Err(AgentError::Api {
                    code: err_obj
                        .get("code")
                        .and_then(|c| c.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    message: err_obj
                        .get("message")
                        .and_then(|m| m.as_str())
                        .unwrap_or(&body)
                        .to_string(),
                });
            }
        }

        Err(AgentError::Http {
            status,
            message: body,
        })
    }
}

impl ChatClientBuilder {
    /// Set the Azure OpenAI endpoint URL.
    ///
    /// If not set, the builder falls back to `AZURE_OPENAI_ENDPOINT`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the chat deployment name.
    ///
    /// If not set, the builder falls back to `AZURE_OPENAI_CHAT_DEPLOYMENT_NAME`.
    pub fn deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    /// Set the API version. Defaults to [`DEFAULT_API_VERSION`].
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the credential to use for authentication.
    ///
    /// If not set, the builder falls back to `AZURE_OPENAI_API_KEY`.
    pub fn credential(mut self, credential: ChatCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set a custom HTTP client, e.g. to configure timeouts or proxies.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the `ChatClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint, deployment, or credential is neither
    /// set on the builder nor available from the environment, or if the
    /// endpoint URL is invalid.
    pub fn build(self) -> AgentResult<ChatClient> {
        let endpoint_str = self
            .endpoint
            .or_else(|| std::env::var(ENDPOINT_VAR).ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AgentError::MissingConfig(format!(
                    "endpoint is required. Set it via builder or {ENDPOINT_VAR}."
                ))
            })?;

        let endpoint = Url::parse(&endpoint_str)
            .map_err(|e| AgentError::InvalidEndpoint(e.to_string()))?;

        let deployment = self
            .deployment
            .or_else(|| std::env::var(DEPLOYMENT_VAR).ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AgentError::MissingConfig(format!(
                    "deployment is required. Set it via builder or {DEPLOYMENT_VAR}."
                ))
            })?;

        let credential = self
            .credential
            .or_else(ChatCredential::from_env)
            .ok_or_else(|| {
                AgentError::MissingConfig(format!(
                    "credential is required. Set it via builder or {API_KEY_VAR}."
                ))
            })?;

        Ok(ChatClient {
            http: self.http_client.unwrap_or_default(),
            endpoint,
            deployment,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            credential,
        })
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A chat completion request.
///
/// The deployment is addressed in the URL, so no `model` field is sent.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Builder for [`ChatCompletionRequest`].
#[derive(Debug, Default)]
pub struct ChatCompletionRequestBuilder {
    messages: Vec<ChatMessage>,
    tools: Option<Vec<Tool>>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    /// Create a new builder.
    pub fn builder() -> ChatCompletionRequestBuilder {
        ChatCompletionRequestBuilder::default()
    }
}

impl ChatCompletionRequestBuilder {
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn build(self) -> ChatCompletionRequest {
        ChatCompletionRequest {
            messages: self.messages,
            tools: self.tools,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool calls requested by the assistant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// For `tool` messages, the id of the call being answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a tool output message answering `tool_call_id`.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// The role of a message in a conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// The type of tool, always "function" for this sample.
    #[serde(rename = "type")]
    pub tool_type: String,

    pub function: FunctionDefinition,
}

impl Tool {
    /// Create a function tool with the given definition.
    pub fn function(definition: FunctionDefinition) -> Self {
        Self {
            tool_type: "function".into(),
            function: definition,
        }
    }
}

/// Definition of a function tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// The name of the function.
    pub name: String,

    /// Description of what the function does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema for the function parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// A tool call requested by the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// The id of the tool call.
    pub id: String,

    /// The type of tool call.
    #[serde(rename = "type")]
    pub call_type: String,

    /// The function that was called.
    pub function: FunctionCall,
}

/// A function call within a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The name of the function.
    pub name: String,

    /// The arguments passed to the function (JSON string).
    pub arguments: String,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

/// A single choice in a chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

/// Usage statistics returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: Option<u32>,
    pub total_tokens: u32,
}
