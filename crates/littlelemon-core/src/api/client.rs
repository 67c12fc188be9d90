//! HTTP client for the Little Lemon menu endpoint.

use std::time::Duration;

use reqwest::{header, Client};
use tracing::{debug, info};

use super::{FetchError, MenuSource};
use crate::models::{MenuDocument, MenuEntryNetwork};

// ============================================================================
// Constants
// ============================================================================

/// Location of the published menu document
pub const DEFAULT_MENU_URL: &str =
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/menu.json";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API client for the menu endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    menu_url: String,
}

impl ApiClient {
    /// Create a client for the default menu URL
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(DEFAULT_MENU_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client for a specific URL and request timeout
    pub fn with_options(menu_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            menu_url: menu_url.into(),
        })
    }

    pub fn menu_url(&self) -> &str {
        &self.menu_url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(FetchError::from_status(status, &body))
        }
    }

    /// Download and decode the menu document.
    pub async fn fetch_menu(&self) -> Result<Vec<MenuEntryNetwork>, FetchError> {
        debug!(url = %self.menu_url, "Fetching menu");

        let response = self
            .client
            .get(&self.menu_url)
            .header(header::ACCEPT, "application/json, text/plain")
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        // The endpoint labels its JSON as text/plain, so decode the raw body
        // rather than trusting the content type.
        let body = response.text().await?;
        let entries = decode_menu(&body)?;

        info!(count = entries.len(), "Menu fetched");
        Ok(entries)
    }
}

impl MenuSource for ApiClient {
    async fn fetch_menu(&self) -> Result<Vec<MenuEntryNetwork>, FetchError> {
        ApiClient::fetch_menu(self).await
    }
}

/// Decode a menu document body into its entries.
///
/// Fails on malformed JSON, on any missing field, and on entries with an
/// empty title.
pub fn decode_menu(body: &str) -> Result<Vec<MenuEntryNetwork>, FetchError> {
    let document: MenuDocument = serde_json::from_str(body)?;

    if let Some(entry) = document.menu.iter().find(|e| e.title.trim().is_empty()) {
        return Err(FetchError::InvalidEntry {
            id: entry.id,
            reason: "title is empty",
        });
    }

    Ok(document.menu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::{SocketAddr, TcpListener};

    use reqwest::StatusCode;

    /// Answer a single HTTP request on a local port with a canned response.
    fn serve_once(status_line: &'static str, content_type: &'static str, body: &'static str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read listener address");

        std::thread::spawn(move || {
            let (stream, _) = listener.accept().expect("Failed to accept connection");
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            // Drain the request head
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).expect("Failed to write response");
            stream.flush().expect("Failed to flush response");
        });

        addr
    }

    fn client_for(addr: SocketAddr) -> ApiClient {
        ApiClient::with_options(format!("http://{addr}/menu.json"), Duration::from_secs(5))
            .expect("Failed to build client")
    }

    const SAMPLE_MENU: &str = r#"{
        "menu": [
            {
                "id": 1,
                "title": "Greek Salad",
                "description": "The famous greek salad of crispy lettuce, peppers, olives, our Chicago.",
                "price": "10",
                "image": "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images/greekSalad.jpg?raw=true",
                "category": "starters"
            },
            {
                "id": 2,
                "title": "Lemon Desert",
                "description": "Traditional homemade Italian Lemon Ricotta Cake.",
                "price": "10",
                "image": "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images/lemonDessert%202.jpg?raw=true",
                "category": "desserts"
            },
            {
                "id": 3,
                "title": "Grilled Fish",
                "description": "Our Bruschetta is made from grilled bread that has been smeared with garlic.",
                "price": "10",
                "image": "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images/grilledFish.jpg?raw=true",
                "category": "mains"
            }
        ]
    }"#;

    #[test]
    fn test_decode_menu_keeps_document_order() {
        let entries = decode_menu(SAMPLE_MENU).expect("Failed to decode sample menu");
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(entries[2].category, "mains");
    }

    #[test]
    fn test_decode_menu_empty_list() {
        let entries = decode_menu(r#"{"menu": []}"#).expect("Failed to decode empty menu");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_decode_menu_rejects_malformed_json() {
        assert!(matches!(decode_menu("<html>oops</html>"), Err(FetchError::Decode(_))));
        assert!(matches!(decode_menu(r#"{"items": []}"#), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_decode_menu_rejects_wrong_field_type() {
        let body = r#"{"menu":[{"id":"one","title":"Greek Salad","description":"","price":"10","image":"","category":"starters"}]}"#;
        assert!(matches!(decode_menu(body), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_decode_menu_rejects_empty_title() {
        let body = r#"{"menu":[{"id":7,"title":"  ","description":"","price":"10","image":"","category":"starters"}]}"#;
        match decode_menu(body) {
            Err(FetchError::InvalidEntry { id, .. }) => assert_eq!(id, 7),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_client_uses_configured_url() {
        let client = ApiClient::with_options("http://localhost:9/menu.json", Duration::from_secs(1))
            .expect("Failed to build client");
        assert_eq!(client.menu_url(), "http://localhost:9/menu.json");
        assert_eq!(ApiClient::new().expect("Failed to build client").menu_url(), DEFAULT_MENU_URL);
    }

    #[tokio::test]
    async fn test_fetch_menu_decodes_text_plain_body() {
        let addr = serve_once("200 OK", "text/plain; charset=utf-8", SAMPLE_MENU);

        let entries = client_for(addr).fetch_menu().await.expect("Failed to fetch menu");
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Greek Salad", "Lemon Desert", "Grilled Fish"]);
    }

    #[tokio::test]
    async fn test_fetch_menu_reports_error_status() {
        let addr = serve_once("503 Service Unavailable", "text/plain", "down");

        match client_for(addr).fetch_menu().await {
            Err(FetchError::Status { status, body }) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "down");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
