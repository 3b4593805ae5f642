use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration knobs for [`probe_mailbox`](super::probe_mailbox).
///
/// The identity values are fixed, non-secret placeholders; nothing here is
/// per-request state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOptions {
    /// Name announced in the EHLO greeting.
    pub helo_name: String,
    /// Envelope sender for `MAIL FROM`.
    pub mail_from: String,
    /// SMTP port on the exchange host.
    pub port: u16,
    /// Hard deadline for the whole session, connect included.
    pub timeout_ms: u64,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            helo_name: "localhost".to_string(),
            mail_from: "postmaster@localhost".to_string(),
            port: 25,
            timeout_ms: 1_000,
        }
    }
}

impl ProbeOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
