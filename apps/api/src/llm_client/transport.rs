//! HTTP transport seam for provider calls.
//!
//! `LlmClient` never talks to reqwest directly; it hands a fully built
//! `HttpRequest` to an `HttpTransport`. Production uses `ReqwestTransport`,
//! tests swap in `SpyTransport` to record calls and script responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::LlmError;

/// A single outbound JSON POST.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
}

/// Raw provider reply. Classification happens in `LlmClient`, not here.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues exactly one request. Implementations must not retry.
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, LlmError>;
}

/// reqwest-backed transport. Connection pooling is reqwest's.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, LlmError> {
        let mut builder = self
            .client
            .post(&request.url)
            .header("content-type", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder
            .json(&request.body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub mod spy {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{HttpRequest, HttpResponse, HttpTransport};
    use crate::llm_client::LlmError;

    enum Scripted {
        Reply(HttpResponse),
        Fail(String),
    }

    /// Records every request and replays scripted replies in order.
    /// Once the script runs out, the last reply is repeated.
    pub struct SpyTransport {
        script: Mutex<VecDeque<Scripted>>,
        calls: Mutex<Vec<HttpRequest>>,
        delay: Option<Duration>,
    }

    impl SpyTransport {
        fn with_script(item: Scripted) -> Self {
            Self {
                script: Mutex::new(VecDeque::from([item])),
                calls: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        pub fn replying(status: u16, body: impl Into<String>) -> Self {
            Self::with_script(Scripted::Reply(HttpResponse {
                status,
                body: body.into(),
            }))
        }

        pub fn failing(message: &str) -> Self {
            Self::with_script(Scripted::Fail(message.to_string()))
        }

        /// Holds every reply for `delay` before returning it.
        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn then_replying(self, status: u16, body: impl Into<String>) -> Self {
            self.script
                .lock()
                .unwrap()
                .push_back(Scripted::Reply(HttpResponse {
                    status,
                    body: body.into(),
                }));
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<HttpRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for SpyTransport {
        async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, LlmError> {
            self.calls.lock().unwrap().push(request);

            let next = {
                let mut script = self.script.lock().unwrap();
                if script.len() > 1 {
                    script.pop_front()
                } else {
                    script.front().map(|item| match item {
                        Scripted::Reply(r) => Scripted::Reply(r.clone()),
                        Scripted::Fail(m) => Scripted::Fail(m.clone()),
                    })
                }
            };

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            match next {
                Some(Scripted::Reply(response)) => Ok(response),
                Some(Scripted::Fail(message)) => Err(LlmError::Transport(message)),
                None => Err(LlmError::Transport("no scripted reply".to_string())),
            }
        }
    }
}
