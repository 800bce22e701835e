//! Email delivery through an SMTP relay using lettre

use std::{fmt, sync::Arc, time::Duration};

use lettre::{
    Message,
    address::AddressError,
    message::{Mailbox, header},
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{SmtpConnection, TlsParameters},
        extension::ClientId,
    },
};
use serde::Deserialize;

use crate::DeliveryError;

#[derive(Deserialize, Clone)]
pub struct RelayConfig {
    /// Relay account, also used as the sender address
    pub username: String,
    pub password: String,
    /// Where every inquiry is delivered
    pub destination: String,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Require a STARTTLS upgrade before authenticating
    #[serde(default = "default_smtp_tls")]
    pub smtp_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("destination", &self.destination)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_tls", &self.smtp_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

pub fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

pub fn default_smtp_port() -> u16 {
    587
}

pub fn default_smtp_tls() -> bool {
    true
}

pub fn default_timeout_secs() -> u64 {
    5
}

struct Inner {
    relay: RelayConfig,
    from: Mailbox,
    to: Mailbox,
}

/// Email service for relaying inquiries
///
/// Cheap to clone; every delivery opens its own relay session.
#[derive(Clone)]
pub struct EmailService {
    inner: Arc<Inner>,
}

impl EmailService {
    /// Create a new email service from configuration
    ///
    /// Fails when the sender or destination is not a valid mailbox.
    pub fn new(config: &RelayConfig) -> Result<Self, AddressError> {
        let from: Mailbox = config.username.parse()?;
        let to: Mailbox = config.destination.parse()?;

        tracing::info!(
            smtp_host = %config.smtp_host,
            smtp_port = config.smtp_port,
            smtp_tls = config.smtp_tls,
            from = %from,
            "Email service initialized"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                relay: config.clone(),
                from,
                to,
            }),
        })
    }

    pub fn destination(&self) -> &Mailbox {
        &self.inner.to
    }

    /// Build a plain text message addressed to the destination
    pub fn message(
        &self,
        subject: impl Into<String>,
        plain: impl Into<String>,
    ) -> Result<Message, DeliveryError> {
        Ok(Message::builder()
            .from(self.inner.from.clone())
            .to(self.inner.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(plain.into())?)
    }

    /// Deliver a plain text email to the destination
    ///
    /// Performs blocking network I/O; run it off the async executor.
    pub fn send_plain(
        &self,
        subject: impl Into<String>,
        plain: impl Into<String>,
    ) -> Result<(), DeliveryError> {
        let message = self.message(subject, plain)?;
        let relay = &self.inner.relay;

        tracing::debug!(
            smtp_host = %relay.smtp_host,
            smtp_port = relay.smtp_port,
            "Opening relay session"
        );

        let mut session = RelaySession::open(relay)?;
        session.authenticate(relay)?;
        session.submit(&message)?;
        session.close();

        Ok(())
    }
}

/// One SMTP connection, closed on every exit path
struct RelaySession {
    conn: SmtpConnection,
    closed: bool,
}

impl RelaySession {
    fn open(relay: &RelayConfig) -> Result<Self, DeliveryError> {
        let timeout = Some(Duration::from_secs(relay.timeout_secs));
        let hello_name = ClientId::default();

        let conn = SmtpConnection::connect(
            (relay.smtp_host.as_str(), relay.smtp_port),
            timeout,
            &hello_name,
            None,
            None,
        )
        .map_err(DeliveryError::connect)?;

        let mut session = Self {
            conn,
            closed: false,
        };

        if relay.smtp_tls {
            let tls = TlsParameters::new(relay.smtp_host.clone()).map_err(DeliveryError::Tls)?;
            session
                .conn
                .starttls(&tls, &hello_name)
                .map_err(DeliveryError::Tls)?;
        }

        Ok(session)
    }

    fn authenticate(&mut self, relay: &RelayConfig) -> Result<(), DeliveryError> {
        let credentials = Credentials::new(relay.username.clone(), relay.password.clone());

        self.conn
            .auth(&[Mechanism::Plain, Mechanism::Login], &credentials)
            .map_err(DeliveryError::AuthRejected)?;

        Ok(())
    }

    fn submit(&mut self, message: &Message) -> Result<(), DeliveryError> {
        self.conn
            .send(message.envelope(), &message.formatted())
            .map_err(DeliveryError::Protocol)?;

        Ok(())
    }

    fn close(mut self) {
        if let Err(err) = self.conn.quit() {
            tracing::debug!(error = %err, "Relay did not acknowledge QUIT");
        }
        self.closed = true;
    }
}

impl Drop for RelaySession {
    fn drop(&mut self) {
        if !self.closed {
            self.conn.abort();
        }
    }
}
