//! The API client and its response interceptor chain.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::request::{HttpRequest, HttpResponse, RequestDescriptor};
use crate::transport::Transport;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Hook run by [`ApiClient::send`] for every response.
///
/// Interceptors run synchronously, in registration order, before the result
/// is handed back to the caller. They observe; they cannot swallow a failure.
pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, _request: &RequestDescriptor, _response: &HttpResponse) {}

    fn on_error(&self, error: &ApiError);
}

impl<I> ResponseInterceptor for Arc<I>
where
    I: ResponseInterceptor + ?Sized,
{
    fn on_response(&self, request: &RequestDescriptor, response: &HttpResponse) {
        (**self).on_response(request, response)
    }

    fn on_error(&self, error: &ApiError) {
        (**self).on_error(error)
    }
}

/// HTTP client for the back-office API.
///
/// Interceptors are fixed at construction; there is no way to issue a request
/// that skips them.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: Option<String>,
    interceptors: Arc<[Arc<dyn ResponseInterceptor>]>,
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

pub struct ApiClientBuilder {
    transport: Arc<dyn Transport>,
    base_url: Option<String>,
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn interceptor(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn build(self) -> ApiClient {
        ApiClient {
            transport: self.transport,
            base_url: self.base_url,
            interceptors: self.interceptors.into(),
        }
    }
}

impl ApiClient {
    pub fn builder(transport: impl Transport + 'static) -> ApiClientBuilder {
        ApiClientBuilder {
            transport: Arc::new(transport),
            base_url: None,
            interceptors: Vec::new(),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Send a request through the transport and the interceptor chain.
    ///
    /// Non-2xx statuses become [`ApiError::Status`]; the interceptors see the
    /// error before it is returned unchanged.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        if request.base_url.is_none() {
            request.base_url = self.base_url.clone();
        }

        let request_id = Uuid::now_v7();
        request = request.with_header(REQUEST_ID_HEADER, request_id.to_string());

        let span = tracing::debug_span!(
            "http_request",
            method = %request.method,
            url = %request.url,
            %request_id,
        );

        async {
            let descriptor = request.descriptor();
            let result = match self.transport.execute(&request).await {
                Ok(response) if response.is_success() => {
                    tracing::debug!(status = response.status, "response");
                    Ok(response)
                }
                Ok(response) => {
                    tracing::debug!(status = response.status, "error response");
                    Err(ApiError::Status {
                        status: response.status,
                        body: response.body,
                        request: descriptor.clone(),
                    })
                }
                Err(failure) => {
                    tracing::debug!(code = %failure.code, "no response");
                    Err(ApiError::Transport {
                        code: failure.code,
                        message: failure.message,
                        request: descriptor.clone(),
                    })
                }
            };

            match &result {
                Ok(response) => {
                    for interceptor in self.interceptors.iter() {
                        interceptor.on_response(&descriptor, response);
                    }
                }
                Err(error) => {
                    for interceptor in self.interceptors.iter() {
                        interceptor.on_error(error);
                    }
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    pub async fn get_json<T>(
        &self,
        url: &str,
        query: Vec<(String, String)>,
        token: Option<&str>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let request = HttpRequest::get(url).with_query(query).with_bearer(token);
        self.send_json(request).await
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = with_body(HttpRequest::post(url), body)?.with_bearer(token);
        self.send_json(request).await
    }

    pub async fn put_json<B, T>(&self, url: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = with_body(HttpRequest::put(url), body)?.with_bearer(token);
        self.send_json(request).await
    }

    pub async fn patch_json<B, T>(&self, url: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = with_body(HttpRequest::patch(url), body)?.with_bearer(token);
        self.send_json(request).await
    }

    pub async fn delete(&self, url: &str, token: Option<&str>) -> Result<(), ApiError> {
        self.send(HttpRequest::delete(url).with_bearer(token)).await?;
        Ok(())
    }

    async fn send_json<T>(&self, request: HttpRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let descriptor = request.descriptor();
        let response = self.send(request).await?;
        serde_json::from_value(response.body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
            request: descriptor,
        })
    }
}

fn with_body<B>(request: HttpRequest, body: &B) -> Result<HttpRequest, ApiError>
where
    B: Serialize + ?Sized,
{
    let descriptor = request.descriptor();
    let value = serde_json::to_value(body).map_err(|e| ApiError::Decode {
        message: format!("failed to encode request body: {e}"),
        request: descriptor,
    })?;
    Ok(request.with_json(value))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::transport::TransportFailure;

    /// Transport that replays scripted responses and records what it was sent.
    #[derive(Default)]
    pub struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<HttpResponse, TransportFailure>>>,
        pub seen: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new(replies: impl IntoIterator<Item = Result<HttpResponse, TransportFailure>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportFailure::network("no scripted reply")))
        }
    }
}
