use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Async client for the Talkrix REST backend.
///
/// Every protected call carries `Authorization: Bearer <token>`. Calling one
/// without a token fails with [`ApiError::MissingToken`] before any request is
/// made.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

/// Some endpoints answer `{ "data": ... }`, others the bare value.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(value) => value,
        }
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_request(&self, request: RequestBuilder) -> ApiResult<RequestBuilder> {
        match &self.token {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Err(ApiError::MissingToken),
        }
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        tracing::debug!("[ApiClient] {} {}", method, path);
        self.auth_request(self.http.request(method, self.url(path)))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let request = self.request(Method::GET, path)?;
        self.execute(path, request, true).await
    }

    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path)?.query(query);
        self.execute(path, request, true).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(path, request, true).await
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PATCH, path)?.json(body);
        self.execute(path, request, true).await
    }

    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.request(Method::DELETE, path)?;
        self.execute_empty(path, request, true).await
    }

    /// POST that ignores the response body.
    pub(crate) async fn post_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute_empty(path, request, true).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<T> {
        let request = self.request(Method::POST, path)?.multipart(form);
        self.execute(path, request, true).await
    }

    /// Unauthenticated POST for the login and signup endpoints.
    pub(crate) async fn post_public<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!("[ApiClient] POST {}", path);
        let request = self.http.post(self.url(path)).json(body);
        self.execute(path, request, false).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
        bearer: bool,
    ) -> ApiResult<T> {
        let body = self.send(path, request, bearer).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|err| {
            tracing::warn!("[ApiClient] {} returned an unexpected body: {}", path, err);
            ApiError::Decode(err)
        })?;
        Ok(envelope.into_inner())
    }

    async fn execute_empty(
        &self,
        path: &str,
        request: RequestBuilder,
        bearer: bool,
    ) -> ApiResult<()> {
        self.send(path, request, bearer).await.map(|_| ())
    }

    /// A 401 only means a rejected session when the request carried the
    /// bearer token. Public endpoints report it with the backend's message.
    async fn send(&self, path: &str, request: RequestBuilder, bearer: bool) -> ApiResult<String> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!("[ApiClient] {} failed: {}", path, err);
            ApiError::Transport(err)
        })?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        tracing::warn!("[ApiClient] {} returned {}", path, status);
        if bearer {
            Err(ApiError::from_response(status.as_u16(), &body))
        } else {
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }
}

/// Percent-encodes one path segment so ids cannot escape their route.
pub(crate) fn segment(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3001/api/");
        assert_eq!(client.url("/agents"), "http://localhost:3001/api/agents");
    }

    #[test]
    fn path_segments_are_escaped() {
        assert_eq!(segment("abc-123"), "abc-123");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn envelope_accepts_both_shapes() {
        let wrapped: Envelope<Vec<u8>> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        let bare: Envelope<Vec<u8>> = serde_json::from_str("[3]").unwrap();
        assert_eq!(wrapped.into_inner(), vec![1, 2]);
        assert_eq!(bare.into_inner(), vec![3]);
    }
}
