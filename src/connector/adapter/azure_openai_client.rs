use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{ChatConfig, DomainError, Role, SamplingParams, Turn};

const DEPLOYMENTS_PATH: &str = "/openai/deployments";
const COMPLETIONS_PATH: &str = "/chat/completions";
pub const AZURE_API_VERSION: &str = "2023-05-15";

/// Azure OpenAI chat completions request payload.
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    max_tokens: u32,
    n: u32,
    temperature: f32,
    top_p: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: Role,
    content: &'a str,
}

/// Minimal subset of the chat completions response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    // `null` when the service filtered the reply.
    content: Option<String>,
}

/// HTTP client for the Azure OpenAI chat completions API.
///
/// Each call is one `POST {endpoint}/openai/deployments/{deployment}/chat/completions`
/// with the key in the `api-key` header. Idle connections are not pooled, so the
/// connection opened for a request is released once that exchange completes.
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    api_key: String,
    deployment: String,
    /// Full endpoint URL including the `api-version` query.
    url: String,
    max_tokens: u32,
    sampling: SamplingParams,
}

impl AzureOpenAiClient {
    pub fn new(config: &ChatConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let url = completions_url(config.endpoint(), config.deployment());

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| DomainError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key().to_string(),
            deployment: config.deployment().to_string(),
            url,
            max_tokens: config.max_tokens(),
            sampling: config.sampling(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request<'a>(&'a self, turns: &'a [Turn]) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.deployment,
            messages: turns
                .iter()
                .map(|t| ApiMessage {
                    role: t.role(),
                    content: t.content(),
                })
                .collect(),
            max_tokens: self.max_tokens,
            n: 1,
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
            presence_penalty: self.sampling.presence_penalty,
            frequency_penalty: self.sampling.frequency_penalty,
        }
    }

    /// Pull `choices[0].message.content` out of a response body.
    fn parse_reply(body: &str) -> Result<String, DomainError> {
        let api_response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| DomainError::parse(format!("Unexpected completion response: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::parse("Completion response has no choices"))?
            .message
            .content
            .ok_or_else(|| DomainError::parse("Completion choice has no message content"))
    }
}

/// Join endpoint and deployment into the chat completions URL.
pub fn completions_url(endpoint: &str, deployment: &str) -> String {
    format!(
        "{}{DEPLOYMENTS_PATH}/{}{COMPLETIONS_PATH}?api-version={AZURE_API_VERSION}",
        endpoint.trim_end_matches('/'),
        deployment
    )
}

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    async fn complete(&self, turns: &[Turn]) -> Result<String, DomainError> {
        if turns.len() < 2 || turns.last().map(Turn::role) != Some(Role::User) {
            return Err(DomainError::invalid_input(
                "A completion request needs the system turn and a trailing user turn",
            ));
        }
        if self.max_tokens == 0 {
            return Err(DomainError::invalid_input("maxTokens must be greater than zero"));
        }

        let request = self.build_request(turns);
        let body = serde_json::to_string(&request)
            .map_err(|e| DomainError::invalid_input(format!("Failed to serialize request: {e}")))?;

        debug!(
            "POST {} ({} messages, max_tokens={})",
            self.url,
            turns.len(),
            self.max_tokens
        );

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("Request to {} failed: {e}", self.url)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            debug!("Azure OpenAI returned {status}");
            return Err(DomainError::server(status.as_u16(), text));
        }

        Self::parse_reply(&text)
    }

    fn model_name(&self) -> &str {
        &self.deployment
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(endpoint: &str) -> ChatConfig {
        ChatConfig::new(endpoint, "test-key", "gpt-35").with_max_tokens(150)
    }

    fn conversation() -> Vec<Turn> {
        vec![Turn::system("You are a historian."), Turn::user("Salve")]
    }

    #[test]
    fn url_joins_endpoint_and_deployment() {
        assert_eq!(
            completions_url("https://x.openai.azure.com/", "gpt-35"),
            "https://x.openai.azure.com/openai/deployments/gpt-35/chat/completions?api-version=2023-05-15"
        );
        assert_eq!(
            completions_url("https://x.openai.azure.com", "gpt-35"),
            completions_url("https://x.openai.azure.com/", "gpt-35")
        );
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        let result = AzureOpenAiClient::new(&config_for("not a url"));
        assert!(result.is_err_and(|e| e.is_config_error()));
    }

    #[test]
    fn request_serializes_all_fields() {
        let client = AzureOpenAiClient::new(&config_for("https://x.openai.azure.com")).unwrap();
        let turns = conversation();
        let json = serde_json::to_value(client.build_request(&turns)).unwrap();

        assert_eq!(json["model"], "gpt-35");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["n"], 1);
        assert_eq!(json["temperature"], 1.0);
        assert_eq!(json["top_p"], 1.0);
        assert_eq!(json["presence_penalty"], 0.0);
        assert_eq!(json["frequency_penalty"], 0.0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Salve");
    }

    #[test]
    fn parse_reply_extracts_first_choice() {
        let reply =
            AzureOpenAiClient::parse_reply(r#"{"choices":[{"message":{"content":"Ave"}}]}"#);
        assert_eq!(reply.unwrap(), "Ave");
    }

    #[test]
    fn parse_reply_rejects_missing_choices() {
        let err = AzureOpenAiClient::parse_reply(r#"{"id":"x"}"#).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn parse_reply_rejects_empty_choices_and_null_content() {
        assert!(AzureOpenAiClient::parse_reply(r#"{"choices":[]}"#)
            .is_err_and(|e| e.is_parse_error()));
        assert!(
            AzureOpenAiClient::parse_reply(r#"{"choices":[{"message":{"content":null}}]}"#)
                .is_err_and(|e| e.is_parse_error())
        );
    }

    #[tokio::test]
    async fn complete_posts_to_deployment_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-35/chat/completions"))
            .and(query_param("api-version", AZURE_API_VERSION))
            .and(header("api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-35",
                "n": 1,
                "messages": [
                    {"role": "system", "content": "You are a historian."},
                    {"role": "user", "content": "Salve"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"choices":[{"message":{"role":"assistant","content":"Ave"}}]}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = AzureOpenAiClient::new(&config_for(&server.uri())).unwrap();
        let reply = client.complete(&conversation()).await.unwrap();

        assert_eq!(reply, "Ave");
    }

    #[tokio::test]
    async fn complete_surfaces_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("access denied"))
            .mount(&server)
            .await;

        let client = AzureOpenAiClient::new(&config_for(&server.uri())).unwrap();
        let err = client.complete(&conversation()).await.unwrap_err();

        match err {
            DomainError::ServerError { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "access denied");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn complete_reports_parse_error_for_unexpected_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"object":"chat"}"#))
            .mount(&server)
            .await;

        let client = AzureOpenAiClient::new(&config_for(&server.uri())).unwrap();
        let err = client.complete(&conversation()).await.unwrap_err();

        assert!(err.is_parse_error());
    }

    #[tokio::test]
    async fn complete_reports_transport_error_when_unreachable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client =
            AzureOpenAiClient::new(&config_for(&format!("http://127.0.0.1:{port}"))).unwrap();
        let err = client.complete(&conversation()).await.unwrap_err();

        assert!(err.is_transport_error());
    }

    #[tokio::test]
    async fn complete_rejects_empty_conversation() {
        let client = AzureOpenAiClient::new(&config_for("https://x.openai.azure.com")).unwrap();
        let err = client.complete(&[]).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn complete_requires_system_and_trailing_user_turn() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let client = AzureOpenAiClient::new(&config_for(&server.uri())).unwrap();

        let system_only = client.complete(&[Turn::system("sys")]).await.unwrap_err();
        assert!(matches!(system_only, DomainError::InvalidInput(_)));

        let ends_with_assistant = client
            .complete(&[
                Turn::system("sys"),
                Turn::user("Salve"),
                Turn::assistant("Ave"),
            ])
            .await
            .unwrap_err();
        assert!(matches!(ends_with_assistant, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn complete_times_out_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"choices":[{"message":{"content":"late"}}]}"#)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = config_for(&server.uri()).with_request_timeout(Duration::from_secs(1));
        let client = AzureOpenAiClient::new(&config).unwrap();
        let err = client.complete(&conversation()).await.unwrap_err();

        assert!(err.is_transport_error());
    }
}
