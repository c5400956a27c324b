//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use contract_gateway::config::GatewayConfig;
use contract_gateway::lifecycle::Shutdown;
use contract_gateway::HttpServer;

/// One request captured by the mock webhook.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub head: String,
    pub body: String,
}

/// A programmable mock webhook target.
pub struct MockWebhook {
    pub addr: SocketAddr,
    status: Arc<AtomicU16>,
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl MockWebhook {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock webhook that records requests and answers with a
/// configurable status.
pub async fn start_mock_webhook(status: u16) -> MockWebhook {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let status = Arc::new(AtomicU16::new(status));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let task_status = status.clone();
    let task_requests = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let status = task_status.clone();
            let requests = task_requests.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];

                // Read the full head, then the declared body length.
                let header_end = loop {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => {
                            buf.extend_from_slice(&chunk[..n]);
                            if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
                                break pos + 4;
                            }
                        }
                    }
                };
                let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
                let content_length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                while buf.len() < header_end + content_length {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
                requests.lock().unwrap().push(ReceivedRequest { head, body });

                let status = status.load(Ordering::SeqCst);
                let reason = match status {
                    200 => "OK",
                    400 => "Bad Request",
                    500 => "Internal Server Error",
                    503 => "Service Unavailable",
                    _ => "Status",
                };
                let payload = "{}";
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
                    payload.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockWebhook {
        addr,
        status,
        requests,
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Gateway configuration pointed at the mock webhook.
pub fn test_config(webhook_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.webhook.url = webhook_url.to_string();
    config.webhook.secret = "test-secret".to_string();
    config.cors.allowed_origins = vec!["https://forms.example.com".to_string()];
    config.observability.metrics_enabled = false;
    config
}

/// Start the gateway on an ephemeral port; returns its address and the
/// shutdown handle keeping it alive.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config).expect("server should build");
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (addr, shutdown)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

/// A payload that passes contract validation.
pub fn valid_contract_payload() -> Value {
    json!({
        "personal": {
            "nombre": "Ana", "apellido": "Rojas", "rut": "12.345.678-5",
            "email": "ana@example.com", "telefono": "+56 9 1234 5678",
            "direccion": "Av. Siempre Viva 742", "ciudad": "Santiago", "region": "RM"
        },
        "company": {
            "razonSocial": "Acme SpA", "rutEmpresa": "76.543.210-K",
            "giro": "Servicios de software", "direccionEmpresa": "Av. Apoquindo 1234",
            "ciudadEmpresa": "Santiago", "representanteLegal": "Ana Rojas",
            "cargoRepresentante": "Gerente General"
        },
        "contract": {
            "tipoContrato": "servicios",
            "terminosEspeciales": "Facturación a 30 días"
        },
        "terms": {
            "aceptaTerminos": true,
            "aceptaPoliticaPrivacidad": true,
            "aceptaTratamientoDatos": true
        }
    })
}
