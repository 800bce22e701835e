#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use adamus_contact::AppState;
use adamus_notification::{EmailService, RelayConfig};
use axum::{
    Router,
    body::Body,
    http::{Request, header},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};

#[derive(Clone, Copy)]
pub enum Relay {
    Accept,
    RejectAuth,
    /// Accepts the connection and never answers
    Silent,
}

/// SMTP relay stand-in listening on localhost
pub struct FakeRelay {
    pub addr: SocketAddr,
    pub auth_attempts: Arc<AtomicUsize>,
    pub messages: Arc<Mutex<Vec<String>>>,
}

impl FakeRelay {
    pub async fn start(behavior: Relay) -> FakeRelay {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let relay = FakeRelay {
            addr: listener.local_addr().unwrap(),
            auth_attempts: Arc::default(),
            messages: Arc::default(),
        };

        let auth_attempts = relay.auth_attempts.clone();
        let messages = relay.messages.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(session(
                    stream,
                    behavior,
                    auth_attempts.clone(),
                    messages.clone(),
                ));
            }
        });

        relay
    }

    pub fn relay_config(&self, timeout_secs: u64) -> RelayConfig {
        RelayConfig {
            username: "sender@example.com".to_string(),
            password: "app-password".to_string(),
            destination: "inbox@example.com".to_string(),
            smtp_host: self.addr.ip().to_string(),
            smtp_port: self.addr.port(),
            smtp_tls: false,
            timeout_secs,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Poll until `check` holds, giving up after a few seconds
    pub async fn wait_for(&self, check: impl Fn(&FakeRelay) -> bool) -> bool {
        for _ in 0..100 {
            if check(self) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }
}

async fn session(
    stream: TcpStream,
    behavior: Relay,
    auth_attempts: Arc<AtomicUsize>,
    messages: Arc<Mutex<Vec<String>>>,
) -> std::io::Result<()> {
    let (mut reader, mut writer) = stream.into_split();

    if let Relay::Silent = behavior {
        let mut buf = [0u8; 256];
        while reader.read(&mut buf).await? > 0 {}
        return Ok(());
    }

    writer.write_all(b"220 fake.relay ESMTP ready\r\n").await?;
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let upper = line.to_ascii_uppercase();

        if upper.starts_with("EHLO") || upper.starts_with("HELO") {
            writer
                .write_all(b"250-fake.relay\r\n250 AUTH PLAIN LOGIN\r\n")
                .await?;
        } else if upper.starts_with("AUTH") {
            auth_attempts.fetch_add(1, Ordering::SeqCst);
            let reply: &[u8] = match behavior {
                Relay::RejectAuth => b"535 5.7.8 Username and Password not accepted\r\n",
                _ => b"235 2.7.0 Accepted\r\n",
            };
            writer.write_all(reply).await?;
        } else if upper == "DATA" {
            writer.write_all(b"354 Go ahead\r\n").await?;
            let mut data = String::new();
            while let Some(data_line) = lines.next_line().await? {
                if data_line == "." {
                    break;
                }
                data.push_str(&data_line);
                data.push('\n');
            }
            messages.lock().unwrap().push(data);
            writer.write_all(b"250 2.0.0 OK queued\r\n").await?;
        } else if upper.starts_with("QUIT") {
            writer.write_all(b"221 2.0.0 Bye\r\n").await?;
            break;
        } else {
            writer.write_all(b"250 OK\r\n").await?;
        }
    }

    Ok(())
}

pub fn create_test_app(relay_config: &RelayConfig) -> Router {
    let mailer = EmailService::new(relay_config).unwrap();

    adamus_contact::server::app(AppState { mailer })
}

pub fn form_request(fields: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/send")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(serde_urlencoded::to_string(fields).unwrap()))
        .unwrap()
}
