// src/services/store.rs

//! Processed-marker store over an Upstash-style Redis REST API.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::StoreCredentials;

/// Durable single-value get/set.
///
/// Implementations report every failure as an error; callers decide how to
/// absorb it.
pub trait StateStore {
    /// Read a key. `Ok(None)` means no value is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a key with a raw string value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// `GET /get/{key}` reply body.
#[derive(Debug, Deserialize)]
struct StoreReply {
    #[serde(default)]
    result: Option<Value>,
}

/// Parse a `{"result": ...}` reply into the stored string, if any.
///
/// Non-string JSON values are returned as their JSON text.
pub fn parse_reply(body: &str) -> Result<Option<String>> {
    let reply: StoreReply = serde_json::from_str(body)
        .map_err(|e| AppError::store(format!("malformed store reply: {e}")))?;
    Ok(match reply.result {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// [`StateStore`] speaking the REST protocol with a bearer token.
pub struct HttpStateStore<'a> {
    client: &'a Client,
    base_url: String,
    bearer_token: String,
}

impl<'a> HttpStateStore<'a> {
    pub fn new(client: &'a Client, credentials: &StoreCredentials) -> Self {
        Self {
            client,
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            bearer_token: credentials.bearer_token.clone(),
        }
    }

    fn endpoint(&self, command: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, command, key)
    }
}

impl StateStore for HttpStateStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let url = self.endpoint("get", key);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .map_err(|e| AppError::store(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::store(format!(
                "GET {url} failed with status {status}"
            )));
        }

        let body = response
            .text()
            .map_err(|e| AppError::store(format!("GET {url} body unreadable: {e}")))?;
        parse_reply(&body)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let url = self.endpoint("set", key);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .body(value.to_string())
            .send()
            .map_err(|e| AppError::store(format!("POST {url} failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::store(format!(
                "POST {url} failed with status {status}"
            )));
        }

        log::debug!("Stored {} = {}", key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use super::*;

    const MARKER: &str = "https://www.parlamento.pt/Paginas/DetalheDiplomaAprovado.aspx?BID=42";

    /// Answer a single request with `status_line` and `body`.
    ///
    /// Returns the server base URL and a handle yielding the raw request
    /// (request line, headers and body).
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                head.push_str(&line);
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let reply = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();

            format!("{head}\r\n{}", String::from_utf8(request_body).unwrap())
        });

        (base_url, handle)
    }

    fn store_at(client: &Client, base_url: String) -> HttpStateStore<'_> {
        let creds = StoreCredentials {
            base_url,
            bearer_token: "secret-token".into(),
        };
        HttpStateStore::new(client, &creds)
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_get_sends_bearer_and_reads_result() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"result":"https://www.parlamento.pt/Paginas/DetalheDiplomaAprovado.aspx?BID=42"}"#,
        );
        let client = local_client();
        let store = store_at(&client, base_url);

        assert_eq!(
            store.get("latest_diploma").unwrap(),
            Some(MARKER.to_string())
        );

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /get/latest_diploma HTTP/1.1\r\n"));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("authorization: bearer secret-token\r\n")
        );
    }

    #[test]
    fn test_get_null_result_is_unset() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", r#"{"result":null}"#);
        let client = local_client();
        let store = store_at(&client, base_url);

        assert_eq!(store.get("latest_diploma").unwrap(), None);
        server.join().unwrap();
    }

    #[test]
    fn test_get_server_error_is_store_error() {
        let (base_url, server) =
            serve_once("HTTP/1.1 500 Internal Server Error", r#"{"error":"boom"}"#);
        let client = local_client();
        let store = store_at(&client, base_url);

        assert!(matches!(store.get("latest_diploma"), Err(AppError::Store(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_get_other_success_status_is_store_error() {
        let (base_url, server) = serve_once("HTTP/1.1 204 No Content", "");
        let client = local_client();
        let store = store_at(&client, base_url);

        assert!(matches!(store.get("latest_diploma"), Err(AppError::Store(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_set_posts_raw_value_with_bearer() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", r#"{"result":"OK"}"#);
        let client = local_client();
        let store = store_at(&client, base_url);

        store.set("latest_diploma", MARKER).unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /set/latest_diploma HTTP/1.1\r\n"));
        let lowered = request.to_ascii_lowercase();
        assert!(lowered.contains("authorization: bearer secret-token\r\n"));
        assert!(!lowered.contains("application/json"));
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        assert_eq!(body, MARKER);
    }

    #[test]
    fn test_set_non_ok_status_is_store_error() {
        for status_line in ["HTTP/1.1 204 No Content", "HTTP/1.1 500 Internal Server Error"] {
            let (base_url, server) = serve_once(status_line, "");
            let client = local_client();
            let store = store_at(&client, base_url);

            assert!(matches!(
                store.set("latest_diploma", MARKER),
                Err(AppError::Store(_))
            ));
            server.join().unwrap();
        }
    }

    #[test]
    fn test_unreachable_store_is_store_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let client = local_client();
        let store = store_at(&client, base_url);

        assert!(matches!(store.get("latest_diploma"), Err(AppError::Store(_))));
    }

    #[test]
    fn test_parse_reply_string() {
        let body = r#"{"result":"https://www.parlamento.pt/x?BID=1"}"#;
        assert_eq!(
            parse_reply(body).unwrap(),
            Some("https://www.parlamento.pt/x?BID=1".to_string())
        );
    }

    #[test]
    fn test_parse_reply_null_or_absent() {
        assert_eq!(parse_reply(r#"{"result":null}"#).unwrap(), None);
        assert_eq!(parse_reply("{}").unwrap(), None);
    }

    #[test]
    fn test_parse_reply_non_string() {
        assert_eq!(parse_reply(r#"{"result":42}"#).unwrap(), Some("42".to_string()));
    }

    #[test]
    fn test_parse_reply_malformed() {
        assert!(matches!(parse_reply("<html>"), Err(AppError::Store(_))));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = Client::new();
        let creds = StoreCredentials {
            base_url: "https://kv.example.com/".into(),
            bearer_token: "t".into(),
        };
        let store = HttpStateStore::new(&client, &creds);
        assert_eq!(
            store.endpoint("get", "latest_diploma"),
            "https://kv.example.com/get/latest_diploma"
        );
    }
}
