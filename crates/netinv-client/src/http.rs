//! HTTP client for the netinv daemon

use netinv_api::{ErrorResponse, HealthResponse, NetworkInterfaces};
use reqwest::{Client, Response};
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, Result};

/// Default path of the inventory endpoint
pub const DEFAULT_NETWORK_PATH: &str = "/network";

/// HTTP client for communicating with the netinv daemon
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    network_path: String,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    ///
    /// # Example
    /// ```no_run
    /// use netinv_client::HttpClient;
    ///
    /// let client = HttpClient::new("http://localhost:8080")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new HTTP client with custom `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            client,
            base_url,
            network_path: DEFAULT_NETWORK_PATH.to_string(),
        })
    }

    /// Serve inventory queries from `path` instead of `/network`
    #[must_use]
    pub fn with_network_path(mut self, path: impl Into<String>) -> Self {
        self.network_path = path.into();
        self
    }

    /// Build a full URL from a path
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(ClientError::Url)
    }

    /// Inventory URL, with the `interface` filter when given
    ///
    /// # Errors
    /// Returns an error if the configured path cannot be joined to the base URL.
    pub fn network_url(&self, interface: Option<&str>) -> Result<Url> {
        let mut url = self.url(&self.network_path)?;
        if let Some(interface) = interface {
            url.query_pairs_mut().append_pair("interface", interface);
        }
        Ok(url)
    }

    /// Read the body of a failed response as an API error
    async fn api_error(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(envelope) => envelope.error,
            Err(_) => body,
        };
        ClientError::Api { status, message }
    }

    /// Get daemon health status
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self.client.get(self.url("/health")?).send().await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch the interface snapshot, or a single interface by name
    ///
    /// A non-2xx status and a success body carrying a non-empty `error` field
    /// both come back as [`ClientError::Api`].
    ///
    /// # Errors
    /// Returns an error if the request fails, the body is not a
    /// `NetworkInterfaces` envelope, or the daemon reports an error.
    ///
    /// # Example
    /// ```no_run
    /// # use netinv_client::HttpClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = HttpClient::new("http://localhost:8080")?;
    /// let snapshot = client.network(Some("eth0")).await?;
    /// println!("{} interface(s)", snapshot.interfaces.len());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn network(&self, interface: Option<&str>) -> Result<NetworkInterfaces> {
        let url = self.network_url(interface)?;
        debug!(%url, "fetching interfaces");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::api_error(response).await);
        }

        let body = response.text().await?;
        let snapshot: NetworkInterfaces = serde_json::from_str(&body)?;

        if let Some(message) = snapshot.error_message() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: message.to_string(),
            });
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn eth0_body() -> serde_json::Value {
        json!({
            "network_interface": [{
                "name": "eth0",
                "ip_addresses": ["192.168.1.10"],
                "mac_address": "00:11:22:33:44:55",
                "mtu": 1500,
                "speed": "1 Gbps",
                "duplex": "Full",
                "admin_status": "enabled",
                "operational_status": "UP"
            }]
        })
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new("http://localhost:8080");
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = HttpClient::new("not a url");
        assert!(matches!(client, Err(ClientError::Url(_))));
    }

    #[test]
    fn test_network_url() {
        let client = HttpClient::new("http://localhost:8080").unwrap();

        assert_eq!(
            client.network_url(None).unwrap().as_str(),
            "http://localhost:8080/network"
        );
        assert_eq!(
            client.network_url(Some("eth0")).unwrap().as_str(),
            "http://localhost:8080/network?interface=eth0"
        );
    }

    #[test]
    fn test_custom_network_path() {
        let client = HttpClient::new("http://localhost:9000")
            .unwrap()
            .with_network_path("/v1/interfaces");

        assert_eq!(
            client.network_url(Some("wlan0")).unwrap().as_str(),
            "http://localhost:9000/v1/interfaces?interface=wlan0"
        );
    }

    #[tokio::test]
    async fn test_network_lists_interfaces() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/network"))
            .respond_with(ResponseTemplate::new(200).set_body_json(eth0_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let snapshot = client.network(None).await.unwrap();

        assert_eq!(snapshot.interfaces.len(), 1);
        let eth0 = &snapshot.interfaces[0];
        assert_eq!(eth0.name, "eth0");
        assert_eq!(eth0.mtu, 1500);
        assert_eq!(eth0.speed, "1 Gbps");
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_network_sends_interface_filter() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/network"))
            .and(query_param("interface", "eth0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(eth0_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let snapshot = client.network(Some("eth0")).await.unwrap();

        assert_eq!(snapshot.interfaces[0].mac_address, "00:11:22:33:44:55");
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/network"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": "there is no such interface"})),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client.network(Some("ghost")).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(matches!(
            err,
            ClientError::Api { ref message, .. } if message == "there is no such interface"
        ));
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client.network(None).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Api { status: 502, ref message } if message == "bad gateway"
        ));
    }

    #[tokio::test]
    async fn test_error_field_on_success_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "MTU not found"})),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client.network(None).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Api { status: 200, ref message } if message == "MTU not found"
        ));
    }

    #[tokio::test]
    async fn test_empty_error_field_is_ignored() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"network_interface": [], "error": ""})),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let snapshot = client.network(None).await.unwrap();

        assert!(snapshot.interfaces.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client.network(None).await.unwrap_err();

        assert!(matches!(err, ClientError::Json(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        assert_eq!(client.health().await.unwrap().status, "ok");
    }
}
