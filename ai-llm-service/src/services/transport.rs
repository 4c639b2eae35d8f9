//! HTTP plumbing shared by the provider chat clients.

use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// Used when the profile carries no `timeout_secs`.
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

/// One chat message in the `{role, content}` shape both providers accept.
#[derive(Debug, Serialize)]
pub(crate) struct ChatTurn<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Optional system prompt followed by the user text.
pub(crate) fn turns<'a>(system: Option<&'a str>, user: &'a str) -> Vec<ChatTurn<'a>> {
    system
        .map(|content| ChatTurn {
            role: "system",
            content,
        })
        .into_iter()
        .chain(std::iter::once(ChatTurn {
            role: "user",
            content: user,
        }))
        .collect()
}

fn provider_of(p: LlmProvider) -> Provider {
    match p {
        LlmProvider::Ollama => Provider::Ollama,
        LlmProvider::OpenAI => Provider::OpenAI,
    }
}

/// A configured client bound to one provider endpoint.
#[derive(Debug)]
pub(crate) struct Transport {
    client: reqwest::Client,
    provider: Provider,
    base: String,
}

impl Transport {
    /// Checks that `cfg` targets `expected` with an http(s) endpoint and builds
    /// a client with the profile timeout and `headers` as defaults.
    pub fn new(
        expected: LlmProvider,
        cfg: &LlmModelConfig,
        headers: HeaderMap,
    ) -> Result<Self, AiLlmError> {
        let provider = provider_of(expected);
        if cfg.provider != expected {
            return Err(ProviderError::new(provider, ProviderErrorKind::InvalidProvider).into());
        }

        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ProviderError::new(
                provider,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout().unwrap_or(FALLBACK_TIMEOUT))
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self {
            client,
            provider,
            base: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// POSTs `body` as JSON and decodes a JSON reply.
    ///
    /// Non-2xx statuses become `HttpStatus` with a short body snippet; an
    /// undecodable reply becomes `Decode`.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, AiLlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(provider = %self.provider, "POST {url}");

        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(provider = %self.provider, %status, %url, %snippet, "provider returned non-success status");
            return Err(ProviderError::new(
                self.provider,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        resp.json::<R>().await.map_err(|e| {
            ProviderError::new(self.provider, ProviderErrorKind::Decode(e.to_string())).into()
        })
    }
}
