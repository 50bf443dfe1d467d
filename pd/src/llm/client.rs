//! LlmClient trait definition

use async_trait::async_trait;

use super::{GenerateRequest, GenerateResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// One call in, one answer out. No conversation state is kept between calls
/// and implementations must not retry on their own.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single generation request and wait for the full answer
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Model identifier used for requests (for logging)
    fn model(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::debug;

    type Responder = Box<dyn Fn(&GenerateRequest) -> Result<GenerateResponse, LlmError> + Send + Sync>;

    enum Script {
        Queue(Mutex<VecDeque<Result<GenerateResponse, LlmError>>>),
        Responder(Responder),
    }

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        script: Script,
        delay: Option<Duration>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl MockLlmClient {
        /// Replay the given results in order
        pub fn new(replies: Vec<Result<GenerateResponse, LlmError>>) -> Self {
            debug!(reply_count = %replies.len(), "MockLlmClient::new: called");
            Self {
                script: Script::Queue(Mutex::new(replies.into())),
                delay: None,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Replay successful text replies in order
        pub fn with_texts(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| Ok(GenerateResponse::from_text(*t))).collect())
        }

        /// Answer every request with a closure (for concurrent callers)
        pub fn from_fn<F>(f: F) -> Self
        where
            F: Fn(&GenerateRequest) -> Result<GenerateResponse, LlmError> + Send + Sync + 'static,
        {
            Self {
                script: Script::Responder(Box::new(f)),
                delay: None,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Sleep before answering each request
        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Requests seen so far, in call order
        pub fn requests(&self) -> Vec<GenerateRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::generate: called");
            self.requests.lock().unwrap().push(request.clone());

            let reply = match &self.script {
                Script::Queue(queue) => queue
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Err(LlmError::InvalidResponse("No more mock responses".to_string()))),
                Script::Responder(f) => f(&request),
            };

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            reply
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockLlmClient::with_texts(&["Response 1", "Response 2"]);
            let req = GenerateRequest::text("Test", "prompt", 1000);

            let resp1 = client.generate(req.clone()).await.unwrap();
            assert_eq!(resp1.text, Some("Response 1".to_string()));

            let resp2 = client.generate(req.clone()).await.unwrap();
            assert_eq!(resp2.text, Some("Response 2".to_string()));

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let result = client.generate(GenerateRequest::text("Test", "prompt", 1000)).await;
            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_mock_client_responder() {
            let client = MockLlmClient::from_fn(|req| Ok(GenerateResponse::from_text(req.prompt.to_uppercase())));
            let resp = client.generate(GenerateRequest::text("Test", "abc", 10)).await.unwrap();
            assert_eq!(resp.text.as_deref(), Some("ABC"));
        }
    }
}
