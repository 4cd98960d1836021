//! Thin JSON client for the HavWtr REST API

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request, Response, Url};
use serde::de::DeserializeOwned;

use super::endpoint::Endpoint;
use super::ApiError;
use crate::config::Config;

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, access_token: Option<String>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::Url(e.to_string()))?;
        Ok(Self {
            http: Client::new(),
            base_url,
            access_token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let base_url = config.api_base_url.as_deref().ok_or(ApiError::NotConfigured)?;
        Self::new(base_url, config.access_token.clone())
    }

    /// Append an endpoint path (which may carry a query) to the base URL
    fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| ApiError::Url(e.to_string()))
    }

    /// Build the request for `endpoint` without sending it
    pub fn build_request(&self, endpoint: &Endpoint) -> Result<Request, ApiError> {
        let url = self.endpoint_url(&endpoint.path())?;
        let bearer = format!("Bearer {}", self.access_token.as_deref().unwrap_or(""));

        let mut builder = self
            .http
            .request(endpoint.method(), url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .header(AUTHORIZATION, bearer);

        if let Some(body) = endpoint.body() {
            builder = builder.json(&body);
        }

        builder.build().map_err(ApiError::Transport)
    }

    async fn execute(&self, endpoint: &Endpoint) -> Result<Response, ApiError> {
        let request = self.build_request(endpoint)?;
        tracing::info!(
            endpoint = endpoint.name(),
            method = %request.method(),
            url = %request.url(),
            "sending request"
        );

        let response = self.http.execute(request).await?;
        check_status(endpoint.name(), response).await
    }

    /// Send `endpoint`, ignoring any response body
    pub async fn send(&self, endpoint: &Endpoint) -> Result<(), ApiError> {
        self.execute(endpoint).await.map(|_| ())
    }

    /// Send `endpoint` and decode the JSON response
    pub async fn send_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, ApiError> {
        let response = self.execute(endpoint).await?;
        decode(response).await
    }

    /// GET `endpoint` resolved relative to the base URL and decode the
    /// JSON response. No authorization header is sent.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| ApiError::Url(e.to_string()))?;
        tracing::debug!(url = %url, "fetching");

        let response = self.http.get(url).header(ACCEPT, JSON).send().await?;
        let response = check_status(endpoint, response).await?;
        decode(response).await
    }
}

/// Map a non-2xx response to [`ApiError::Status`]
async fn check_status(name: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(endpoint = name, status = status.as_u16(), "request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(ApiError::EmptyBody);
    }
    serde_json::from_slice(&bytes).map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserInputModel, UserModel};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client() -> ApiClient {
        ApiClient::new("https://api.example.com/v1", Some("tok".to_string())).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(matches!(ApiClient::new("not a url", None), Err(ApiError::Url(_))));
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let config = Config {
            database_path: "havwtr.db".into(),
            api_base_url: None,
            access_token: None,
            measurement: Default::default(),
        };
        assert!(matches!(ApiClient::from_config(&config), Err(ApiError::NotConfigured)));
    }

    #[test]
    fn test_build_get_request() {
        let request = client().build_request(&Endpoint::GetUserProfile).unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().as_str(), "https://api.example.com/v1/users/profile");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
        assert_eq!(request.headers()[ACCEPT], JSON);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_build_request_with_query_and_body() {
        let model = UserInputModel {
            measurement: Some("met".to_string()),
            height: Some(1.8),
            weight: Some(70.0),
            ..Default::default()
        };
        let endpoint = Endpoint::UpdateFamilyMember { id: "f1".to_string(), model };
        let request = client().build_request(&endpoint).unwrap();

        assert_eq!(request.method(), reqwest::Method::PUT);
        assert_eq!(request.url().path(), "/v1/users/personal-information");
        assert_eq!(request.url().query(), Some("family_id=f1"));
        assert_eq!(request.headers()[CONTENT_TYPE], JSON);

        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        let body: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(body["height"], 1.8);
        assert_eq!(body["weight"], 70.0);
        assert_eq!(body["measurement"], "met");
    }

    #[test]
    fn test_missing_token_sends_empty_bearer() {
        let client = ApiClient::new("https://api.example.com", None).unwrap();
        let request = client.build_request(&Endpoint::GetFamilyMembers).unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer ");
        assert_eq!(request.url().as_str(), "https://api.example.com/users/family-members");
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    /// Serve one canned response on a local port and return its base URL
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            // Read the full request so closing the socket doesn't reset it
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_decodes_success() {
        let base = serve_once(http_response("200 OK", r#"{"firstName":"Ada","measurement":"met"}"#)).await;
        let client = ApiClient::new(&base, None).unwrap();
        let user: UserModel = client.fetch("users/profile").await.unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let base = serve_once(http_response("500 Internal Server Error", r#"{"error":"nope"}"#)).await;
        let client = ApiClient::new(&base, None).unwrap();
        let result: Result<serde_json::Value, _> = client.fetch("users/profile").await;
        match result {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"error":"nope"}"#);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        let base = serve_once(http_response("200 OK", "")).await;
        let client = ApiClient::new(&base, None).unwrap();
        let result: Result<serde_json::Value, _> = client.fetch("users/profile").await;
        assert!(matches!(result, Err(ApiError::EmptyBody)));
    }

    #[tokio::test]
    async fn test_send_json_bad_json() {
        let base = serve_once(http_response("200 OK", "not json")).await;
        let client = ApiClient::new(&base, Some("tok".to_string())).unwrap();
        let result: Result<UserModel, _> = client.send_json(&Endpoint::GetUserProfile).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_send_with_body_and_error_status() {
        let base = serve_once(http_response("404 Not Found", "")).await;
        let client = ApiClient::new(&base, Some("tok".to_string())).unwrap();
        let endpoint = Endpoint::IntakeForm(UserInputModel {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        });
        let result = client.send(&endpoint).await;
        assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_send_ignores_body() {
        let base = serve_once(http_response("200 OK", r#"{"ok":true}"#)).await;
        let client = ApiClient::new(&base, Some("tok".to_string())).unwrap();
        client
            .send(&Endpoint::DeleteFamilyMember { id: "f1".to_string() })
            .await
            .unwrap();
    }
}
