//! Local SMTP relay stand-in for delivery tests

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use adamus_notification::RelayConfig;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};

#[derive(Clone, Copy)]
pub enum Behavior {
    Accept,
    RejectAuth,
    /// Accept the TCP connection and never answer
    Silent,
}

#[derive(Debug, Default, Clone)]
pub struct Received {
    pub mail_from: String,
    pub rcpt_to: Vec<String>,
    pub data: String,
}

pub struct FakeRelay {
    pub addr: SocketAddr,
    pub received: Arc<Mutex<Vec<Received>>>,
}

impl FakeRelay {
    pub async fn start(behavior: Behavior) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));

        tokio::spawn({
            let received = received.clone();
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    tokio::spawn(handle(stream, behavior, received.clone()));
                }
            }
        });

        Ok(Self { addr, received })
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

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

fn address(arg: &str) -> String {
    arg.split_once('<')
        .and_then(|(_, rest)| rest.split_once('>'))
        .map(|(addr, _)| addr.to_owned())
        .unwrap_or_default()
}

async fn handle(
    stream: TcpStream,
    behavior: Behavior,
    received: Arc<Mutex<Vec<Received>>>,
) -> std::io::Result<()> {
    let (mut reader, mut writer) = stream.into_split();

    if let Behavior::Silent = behavior {
        let mut buf = [0u8; 256];
        while reader.read(&mut buf).await? > 0 {}
        return Ok(());
    }

    writer.write_all(b"220 fake.relay ESMTP ready\r\n").await?;

    let mut lines = BufReader::new(reader).lines();
    let mut current = Received::default();

    while let Some(line) = lines.next_line().await? {
        let upper = line.to_ascii_uppercase();

        if upper.starts_with("EHLO") || upper.starts_with("HELO") {
            writer
                .write_all(b"250-fake.relay\r\n250 AUTH PLAIN LOGIN\r\n")
                .await?;
        } else if upper.starts_with("AUTH") {
            let reply: &[u8] = match behavior {
                Behavior::RejectAuth => b"535 5.7.8 Username and Password not accepted\r\n",
                _ => b"235 2.7.0 Accepted\r\n",
            };
            writer.write_all(reply).await?;
        } else if upper.starts_with("MAIL FROM:") {
            current.mail_from = address(&line);
            writer.write_all(b"250 2.1.0 OK\r\n").await?;
        } else if upper.starts_with("RCPT TO:") {
            current.rcpt_to.push(address(&line));
            writer.write_all(b"250 2.1.5 OK\r\n").await?;
        } else if upper == "DATA" {
            writer.write_all(b"354 Go ahead\r\n").await?;
            while let Some(data_line) = lines.next_line().await? {
                if data_line == "." {
                    break;
                }
                current.data.push_str(&data_line);
                current.data.push('\n');
            }
            received.lock().unwrap().push(std::mem::take(&mut current));
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
