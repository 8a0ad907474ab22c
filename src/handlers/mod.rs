// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components and shared response helpers

pub mod admin;
pub mod api;
pub mod auth;
pub mod health;
pub mod site;

pub use admin::config as admin_config;
pub use api::config as api_config;
pub use auth::config as auth_config;
pub use health::config as health_config;
pub use site::config as site_config;

use actix_web::{http::header, HttpRequest, HttpResponse};

/// 200 with an HTML body
pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// 302 to `location`
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn read_cookie(req: &HttpRequest, name: &str) -> Option<String> {
    req.cookie(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Backend client whose address refuses connections
#[cfg(test)]
pub(crate) fn test_backend() -> crate::services::BackendClient {
    crate::services::BackendClient::new(
        reqwest::Client::new(),
        "http://127.0.0.1:9".to_string(),
        "anon".to_string(),
        String::new(),
    )
}

/// Backend client pointed at a local listener that answers `[]` to every
/// request and records each request head, lowercased
#[cfg(test)]
pub(crate) async fn recording_backend() -> (
    crate::services::BackendClient,
    std::sync::Arc<std::sync::Mutex<Vec<String>>>,
) {
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&chunk[..n]),
                }
            }
            seen.lock()
                .unwrap()
                .push(String::from_utf8_lossy(&head).to_lowercase());
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n[]",
                )
                .await;
        }
    });

    let backend = crate::services::BackendClient::new(
        reqwest::Client::new(),
        format!("http://{}", addr),
        "anon".to_string(),
        "service-key".to_string(),
    );
    (backend, requests)
}
