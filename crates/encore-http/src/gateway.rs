//! The API gateway: one HTTP client, one base URL, session-aware hooks.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use encore_core::error::{ApiError, Error, InvalidInputError, TransportError};
use encore_core::{ApiUrl, Navigator, Result, SessionStore};

use crate::config::GatewayConfig;
use crate::interceptor::AuthInterceptor;

pub(crate) fn map_transport(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// Shared HTTP client for every domain query.
///
/// Each request passes through the [`AuthInterceptor`]: the token is
/// attached (or the request refused) before dispatch, and authentication
/// failures end the session before the caller sees the error.
///
/// Cheap to clone; clones share the client, the session and the navigator.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: ApiUrl,
    interceptor: Arc<AuthInterceptor>,
}

/// A request ready for the gateway.
pub(crate) struct ApiRequest<'a, B: Serialize + ?Sized> {
    pub method: Method,
    pub path: &'a str,
    pub query: &'a [(&'static str, String)],
    pub body: Option<&'a B>,
}

impl<'a> ApiRequest<'a, ()> {
    pub fn get(path: &'a str) -> Self {
        Self {
            method: Method::GET,
            path,
            query: &[],
            body: None,
        }
    }

    pub fn delete(path: &'a str) -> Self {
        Self {
            method: Method::DELETE,
            path,
            query: &[],
            body: None,
        }
    }

    pub fn post_empty(path: &'a str) -> Self {
        Self {
            method: Method::POST,
            path,
            query: &[],
            body: None,
        }
    }

    pub fn with_query(mut self, query: &'a [(&'static str, String)]) -> Self {
        self.query = query;
        self
    }
}

impl<'a, B: Serialize + ?Sized> ApiRequest<'a, B> {
    pub fn post(path: &'a str, body: &'a B) -> Self {
        Self {
            method: Method::POST,
            path,
            query: &[],
            body: Some(body),
        }
    }

    pub fn put(path: &'a str, body: &'a B) -> Self {
        Self {
            method: Method::PUT,
            path,
            query: &[],
            body: Some(body),
        }
    }
}

impl ApiGateway {
    /// Create a gateway for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (for example when
    /// no TLS backend is available).
    pub fn new(
        config: GatewayConfig,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!("encore/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let interceptor = AuthInterceptor::new(&config, session, navigator);

        Ok(Self {
            client,
            base_url: config.base_url,
            interceptor: Arc::new(interceptor),
        })
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    /// Returns the session this gateway authenticates with.
    pub fn session(&self) -> &Arc<SessionStore> {
        self.interceptor.session()
    }

    pub fn interceptor(&self) -> &AuthInterceptor {
        &self.interceptor
    }

    /// Send a request and decode a JSON response body.
    pub(crate) async fn call<B, R>(&self, request: ApiRequest<'_, B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let path = request.path.to_string();
        let response = self.dispatch(request).await?;
        response.json::<R>().await.map_err(|e| {
            debug!(path = %path, error = %e, "Response body did not match");
            map_transport(e)
        })
    }

    /// Send a request and discard the response body.
    pub(crate) async fn call_no_content<B>(&self, request: ApiRequest<'_, B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(request).await?;
        Ok(())
    }

    /// Run the outgoing hook, send, and run the incoming hook.
    #[instrument(skip(self, request), fields(method = %request.method, path = request.path))]
    async fn dispatch<B>(&self, request: ApiRequest<'_, B>) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let token = self.interceptor.before_send(request.path)?;

        let url = self.base_url.endpoint(request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(request.query);
        }
        if let Some(body) = request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &token {
            let value = HeaderValue::from_str(&token.bearer()).map_err(|_| {
                InvalidInputError::Other {
                    message: "access token contains invalid header characters".to_string(),
                }
            })?;
            builder = builder.header(AUTHORIZATION, value);
        }

        debug!(authenticated = token.is_some(), "Sending request");
        let response = builder.send().await.map_err(map_transport)?;

        let status = response.status();
        trace!(status = %status, "Response received");

        if status.is_success() {
            Ok(response)
        } else {
            let error = parse_error_response(request.path, response).await;
            Err(self.interceptor.on_failure(error, token.as_ref()))
        }
    }
}

/// Build an [`ApiError`] from a failed response.
///
/// JSON bodies contribute their `error` and `message` fields; plain-text
/// bodies become the message.
async fn parse_error_response(path: &str, response: reqwest::Response) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let (error, message) = match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(body)) => (
            body.get("error").and_then(Value::as_str).map(str::to_string),
            body.get("message").and_then(Value::as_str).map(str::to_string),
        ),
        _ if !text.trim().is_empty() => (None, Some(text.trim().to_string())),
        _ => (None, None),
    };

    ApiError::new(
        status.as_u16(),
        path,
        error.or_else(|| reason(status)),
        message,
    )
}

fn reason(status: StatusCode) -> Option<String> {
    status.canonical_reason().map(str::to_string)
}
