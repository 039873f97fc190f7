//! SecureWipe Backend Client
//!
//! HTTP client for the device status and wipe command endpoints.

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::consts::cli_consts::http;
use crate::device::{Device, parse_device_map};
use crate::environment::Environment;
use reqwest::{Client, ClientBuilder, Response};

// User-Agent string with console version
const USER_AGENT: &str = concat!("securewipe-console/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    environment: Environment,
}

impl BackendClient {
    pub fn new(environment: Environment) -> Result<Self, BackendError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            environment,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.backend_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, BackendError> {
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl Backend for BackendClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn list_devices(&self) -> Result<Vec<Device>, BackendError> {
        let url = self.build_url("api/devices");
        let response = self.client.get(&url).send().await?;

        let response = Self::handle_response_status(response).await?;
        let bytes = response.bytes().await?;
        let devices = parse_device_map(&bytes)?;
        log::debug!("Fetched {} devices from {}", devices.len(), url);
        Ok(devices)
    }

    async fn issue_wipe(&self, machine_id: &str) -> Result<(), BackendError> {
        let endpoint = format!("api/wipe/{}", urlencoding::encode(machine_id));
        let url = self.build_url(&endpoint);
        let response = self.client.post(&url).send().await?;

        Self::handle_response_status(response).await?;
        log::info!("Wipe command accepted for {}", machine_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_without_double_slashes() {
        let client = BackendClient::new(Environment::Custom {
            backend_url: "http://localhost:5000/".to_string(),
        })
        .unwrap();
        assert_eq!(
            client.build_url("/api/devices"),
            "http://localhost:5000/api/devices"
        );
    }

    fn client_for(server: &mockito::Server) -> BackendClient {
        BackendClient::new(Environment::Custom {
            backend_url: server.url(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn device_list_keeps_response_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/devices")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"zz:01": {"status": "idle", "last_seen": "2025-01-01T00:00:00Z"},
                    "aa:02": {"status": "wiping:42%", "last_seen": "2025-01-01T00:00:05Z"}}"#,
            )
            .create_async()
            .await;

        let devices = client_for(&server).list_devices().await.unwrap();
        let ids: Vec<&str> = devices.iter().map(|d| d.machine_id.as_str()).collect();
        assert_eq!(ids, ["zz:01", "aa:02"]);
        assert_eq!(devices[1].status.phase(), "wiping");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn device_list_server_error_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/devices")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        match client_for(&server).list_devices().await {
            Err(BackendError::Http { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    // MAC-style ids contain colons; they must stay a single path segment.
    async fn wipe_posts_to_percent_encoded_machine_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/wipe/a1%3Ab2")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        client_for(&server).issue_wipe("a1:b2").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn wipe_rejected_by_backend_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/wipe/a1%3Ab2")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let result = client_for(&server).issue_wipe("a1:b2").await;
        assert!(matches!(result, Err(BackendError::Http { status: 500, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    // Nothing listens on port 9 locally, so the request must fail as a transport error.
    async fn unreachable_backend_is_a_transport_error() {
        let client = BackendClient::new(Environment::Custom {
            backend_url: "http://127.0.0.1:9".to_string(),
        })
        .unwrap();
        let result = client.list_devices().await;
        assert!(matches!(result, Err(BackendError::Reqwest(_))));
    }
}

#[cfg(test)]
/// These are ignored by default since they require a live backend to run.
mod live_backend_tests {
    use crate::backend::Backend;
    use crate::environment::Environment;

    #[tokio::test]
    #[ignore] // This test requires a live backend instance.
    /// Should return the current device map.
    async fn test_list_devices() {
        let client = super::BackendClient::new(Environment::Production).unwrap();
        match client.list_devices().await {
            Ok(devices) => {
                println!("Got {} devices", devices.len());
                for device in devices {
                    println!("{}: {}", device.machine_id, device.status);
                }
            }
            Err(e) => panic!("Failed to list devices: {}", e),
        }
    }
}
