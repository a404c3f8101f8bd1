//! A tiny HTTP responder for exercising the Wallhaven client offline.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Enough of a PNG for `image::guess_format` to recognise it.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0";

#[derive(Clone)]
pub struct Route {
    path: String,
    status: u16,
    content_type: String,
    body: Vec<u8>,
}

impl Route {
    pub fn ok(path: &str, content_type: &str, body: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            content_type: content_type.to_string(),
            body: body.to_vec(),
        }
    }

    pub fn status(path: &str, status: u16) -> Self {
        Self {
            path: path.to_string(),
            status,
            content_type: String::from("text/plain"),
            body: b"error".to_vec(),
        }
    }
}

pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("test client")
}

/// Serves `routes` on a random local port and returns the base URL.
///
/// Unknown paths answer 404. Query strings are ignored when routing.
pub async fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let routes: Arc<HashMap<String, Route>> =
        Arc::new(routes.into_iter().map(|r| (r.path.clone(), r)).collect());

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();

            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let request = String::from_utf8_lossy(&buf);
                let target = request.split_whitespace().nth(1).unwrap_or("/");
                let path = target.split('?').next().unwrap_or("/");

                let route = routes
                    .get(path)
                    .cloned()
                    .unwrap_or_else(|| Route::status(path, 404));

                let head = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    route.status,
                    route.content_type,
                    route.body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&route.body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}
