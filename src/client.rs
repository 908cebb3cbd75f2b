use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ServiceConfig;
use crate::error::{CatalogError, Result};
use crate::models::{Item, ItemId};

// ---------------------------------------------------------------------------
// Service seam
// ---------------------------------------------------------------------------

/// The two read operations the browser needs from a catalog service.
///
/// Implementations are called from background fetch threads, hence the
/// `Send + Sync` bound.
pub trait CatalogService: Send + Sync {
    /// Retrieve the full catalog, in service order.
    fn list_items(&self) -> Result<Vec<Item>>;

    /// Retrieve a single item by identifier.
    fn get_item(&self, id: ItemId) -> Result<Item>;
}

// ---------------------------------------------------------------------------
// Internal response handling
// ---------------------------------------------------------------------------

/// Shared logic for building a configured [`Client`] and making requests.
struct BaseClient {
    base_url: String,
    http: Client,
}

impl BaseClient {
    fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("catalog-browser/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Build the full URL for a given endpoint.
    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Split a response into its status and JSON body.
    ///
    /// An empty body or a literal `null` becomes `Value::Null`. A body that
    /// stops arriving part way is a transport error. A complete body that is
    /// not JSON is a decode error on a success status and ignored otherwise.
    fn handle_response(&self, response: Response) -> Result<(u16, Value)> {
        let status = response.status();
        let text = response.text()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok((status.as_u16(), Value::Null));
        }
        match serde_json::from_str(trimmed) {
            Ok(body) => Ok((status.as_u16(), body)),
            Err(_) if !status.is_success() => Ok((status.as_u16(), Value::Null)),
            Err(e) => Err(CatalogError::Decode {
                details: e.to_string(),
            }),
        }
    }

    fn get(&self, endpoint: &str) -> Result<(u16, Value)> {
        let url = self.url(endpoint);
        debug!(%url, "GET");
        let resp = self.http.get(&url).send()?;
        self.handle_response(resp)
    }
}

/// Map a non-success status to a [`CatalogError::Service`], preferring the
/// service's own `message` field when it sent one.
fn status_error(status: u16, body: &Value, fallback: &str) -> CatalogError {
    let msg = body
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    CatalogError::Service {
        status,
        message: if msg.is_empty() {
            format!("{fallback} (HTTP {status})")
        } else {
            msg
        },
    }
}

fn decode_catalog(status: u16, body: Value) -> Result<Vec<Item>> {
    if !(200..300).contains(&status) {
        return Err(status_error(status, &body, "Failed to fetch products"));
    }
    serde_json::from_value(body).map_err(|e| CatalogError::Decode {
        details: e.to_string(),
    })
}

fn decode_item(id: ItemId, status: u16, body: Value) -> Result<Item> {
    if status == 404 {
        return Err(CatalogError::NotFound { id });
    }
    if !(200..300).contains(&status) {
        return Err(status_error(status, &body, "Failed to fetch product"));
    }
    // Unknown ids come back as 200 with an empty body on some services.
    if body.is_null() {
        return Err(CatalogError::NotFound { id });
    }
    serde_json::from_value(body).map_err(|e| {
        warn!(id, error = %e, "item body did not match the expected shape");
        CatalogError::NotFound { id }
    })
}

// ---------------------------------------------------------------------------
// Public client
// ---------------------------------------------------------------------------

/// HTTP implementation of [`CatalogService`].
///
/// ```no_run
/// use std::time::Duration;
/// use catalog_browser::{CatalogClient, CatalogService};
///
/// let client = CatalogClient::new("https://fakestoreapi.com", Duration::from_secs(15)).unwrap();
/// for item in client.list_items().unwrap() {
///     println!("{}: {}", item.id, item.title);
/// }
/// ```
pub struct CatalogClient {
    base: BaseClient,
}

impl CatalogClient {
    /// Create a new client.
    ///
    /// * `base_url` – service root, e.g. `https://fakestoreapi.com`
    /// * `timeout`  – per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base: BaseClient::new(base_url, timeout)?,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base.base_url
    }
}

impl CatalogService for CatalogClient {
    fn list_items(&self) -> Result<Vec<Item>> {
        let (status, body) = self.base.get("/products")?;
        decode_catalog(status, body)
    }

    fn get_item(&self, id: ItemId) -> Result<Item> {
        let (status, body) = self.base.get(&format!("/products/{id}"))?;
        decode_item(id, status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single canned HTTP response on a loopback port and return the
    /// base URL to reach it. The connection is closed after writing.
    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap_or(0) > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        });
        format!("http://{addr}")
    }

    fn reply(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn client_for(base_url: &str) -> CatalogClient {
        CatalogClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn item_json(id: u64) -> Value {
        json!({
            "id": id,
            "title": "Mens Casual Slim Fit",
            "price": 15.99,
            "description": "The color could be slightly different",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71YXzeOuslL._AC_UY879_.jpg",
            "rating": { "rate": 2.1, "count": 430 }
        })
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = CatalogClient::new("https://example.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://example.test");
        assert_eq!(client.base.url("/products/3"), "https://example.test/products/3");
    }

    #[test]
    fn catalog_decodes_array() {
        let items = decode_catalog(200, json!([item_json(1), item_json(2)])).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, 2);
    }

    #[test]
    fn catalog_non_success_is_service_error() {
        let err = decode_catalog(500, Value::Null).unwrap_err();
        match err {
            CatalogError::Service { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to fetch products (HTTP 500)");
            }
            other => panic!("expected Service, got {other:?}"),
        }
    }

    #[test]
    fn catalog_service_message_is_preferred() {
        let err = decode_catalog(429, json!({ "message": "Slow down" })).unwrap_err();
        assert_eq!(err.to_string(), "Slow down");
    }

    #[test]
    fn catalog_wrong_shape_is_decode_error() {
        let err = decode_catalog(200, json!({ "data": [] })).unwrap_err();
        assert!(matches!(err, CatalogError::Decode { .. }));
    }

    #[test]
    fn item_missing_cases_are_not_found() {
        assert!(matches!(
            decode_item(7, 404, Value::Null),
            Err(CatalogError::NotFound { id: 7 })
        ));
        assert!(matches!(
            decode_item(7, 200, Value::Null),
            Err(CatalogError::NotFound { id: 7 })
        ));
        assert!(matches!(
            decode_item(7, 200, json!({ "id": "seven" })),
            Err(CatalogError::NotFound { id: 7 })
        ));
    }

    #[test]
    fn item_decodes_object() {
        let item = decode_item(4, 200, item_json(4)).unwrap();
        assert_eq!(item.id, 4);
        assert_eq!(item.title, "Mens Casual Slim Fit");
    }

    // -- over a socket ------------------------------------------------------

    #[test]
    fn lists_catalog_over_http() {
        let body = json!([item_json(1), item_json(2)]).to_string();
        let url = serve_once(reply("200 OK", &body));
        let items = client_for(&url).list_items().unwrap();
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn server_error_maps_to_service_error() {
        let url = serve_once(reply("500 Internal Server Error", r#"{"message":"boom"}"#));
        match client_for(&url).list_items() {
            Err(CatalogError::Service { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Service, got {other:?}"),
        }
    }

    #[test]
    fn html_error_page_uses_fallback_message() {
        let url = serve_once(reply("502 Bad Gateway", "<html>bad gateway</html>"));
        let err = client_for(&url).list_items().unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch products (HTTP 502)");
    }

    #[test]
    fn non_json_success_body_is_decode_error() {
        let url = serve_once(reply("200 OK", "not json"));
        let err = client_for(&url).list_items().unwrap_err();
        assert!(matches!(err, CatalogError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn item_404_is_not_found() {
        let url = serve_once(reply("404 Not Found", ""));
        assert!(matches!(
            client_for(&url).get_item(9),
            Err(CatalogError::NotFound { id: 9 })
        ));
    }

    #[test]
    fn item_null_and_empty_bodies_are_not_found() {
        let url = serve_once(reply("200 OK", "null"));
        assert!(matches!(
            client_for(&url).get_item(9),
            Err(CatalogError::NotFound { id: 9 })
        ));

        let url = serve_once(reply("200 OK", ""));
        assert!(matches!(
            client_for(&url).get_item(9),
            Err(CatalogError::NotFound { id: 9 })
        ));
    }

    #[test]
    fn item_over_http() {
        let url = serve_once(reply("200 OK", &item_json(3).to_string()));
        let item = client_for(&url).get_item(3).unwrap();
        assert_eq!(item.id, 3);
        assert_eq!(item.rating.count, 430);
    }

    #[test]
    fn truncated_body_is_transport_error() {
        let truncated = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 5000\r\n\r\n[{\"id\":1";

        let url = serve_once(truncated.to_string());
        let err = client_for(&url).list_items().unwrap_err();
        assert!(matches!(err, CatalogError::Transport { .. }), "got {err:?}");

        let url = serve_once(truncated.to_string());
        let err = client_for(&url).get_item(1).unwrap_err();
        assert!(matches!(err, CatalogError::Transport { .. }), "got {err:?}");
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{addr}")).list_items().unwrap_err();
        assert!(matches!(err, CatalogError::Transport { .. }), "got {err:?}");
        assert!(err.to_string().starts_with("Request failed: "));
    }
}
