//! SMTP mailbox probing, third and most expensive stage of the pipeline.
//!
//! [`probe_mailbox`] re-resolves the MX records for the address's domain,
//! opens a plain SMTP session to the lowest-preference exchange, and runs a
//! scripted EHLO / MAIL FROM / RCPT TO handshake to observe whether the
//! server would accept the mailbox. No message is ever sent.
//!
//! A single hard deadline covers the entire session, connect included; a
//! timed-out session future is dropped, which closes the socket on every
//! exit path.

mod error;
mod options;
mod session;

pub use error::ProbeError;
pub use options::ProbeOptions;

use tracing::{debug, warn};
use trust_dns_resolver::TokioAsyncResolver;

use crate::mx::{self, LookupMx};
use crate::probe::session::SmtpSession;
use crate::syntax::split_address;

#[cfg(test)]
pub(crate) mod tests;

/// Probes whether the mail exchange for `address`'s domain accepts the
/// mailbox. `Ok(true)` means the `RCPT TO` command was accepted with a 2xx
/// reply, `Ok(false)` means the server answered it with anything else. All
/// transport and protocol failures surface as [`ProbeError`].
///
/// Runs standalone: MX resolution happens here even if the caller already
/// checked the domain's mail route.
pub async fn probe_mailbox(address: &str, options: &ProbeOptions) -> Result<bool, ProbeError> {
    let resolver =
        TokioAsyncResolver::tokio_from_system_conf().map_err(mx::Error::resolver_init)?;
    probe_with_resolver(address, options, &resolver).await
}

pub(crate) async fn probe_with_resolver<R>(
    address: &str,
    options: &ProbeOptions,
    resolver: &R,
) -> Result<bool, ProbeError>
where
    R: LookupMx,
{
    let (_, domain) = split_address(address).ok_or(ProbeError::MissingDomain)?;
    let ascii_domain = mx::normalize_domain(domain)?;

    let status = mx::resolve_with(resolver, &ascii_domain).await?;
    let Some(record) = status.preferred() else {
        return Err(ProbeError::NoMailHosts);
    };
    debug!(
        domain = %ascii_domain,
        exchange = %record.exchange,
        preference = record.preference,
        "probing preferred mail exchange"
    );

    match tokio::time::timeout(options.timeout(), handshake(&record.exchange, address, options))
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(
                exchange = %record.exchange,
                budget_ms = options.timeout_ms,
                "mailbox probe hit the session deadline"
            );
            Err(ProbeError::Timeout {
                budget_ms: options.timeout_ms,
            })
        }
    }
}

/// Runs the full scripted dialogue against one exchange host. The session is
/// owned by this future, so cancellation at the deadline releases it.
async fn handshake(
    exchange: &str,
    address: &str,
    options: &ProbeOptions,
) -> Result<bool, ProbeError> {
    let mut session = SmtpSession::connect(exchange, options.port).await?;

    let banner = session.read_reply().await?;
    if !banner.is_positive_completion() {
        session.quit().await;
        return Err(ProbeError::protocol(format!(
            "unexpected greeting: {}",
            banner.code
        )));
    }

    let ehlo = session
        .send_command(&format!("EHLO {}", options.helo_name))
        .await?;
    if !ehlo.is_positive_completion() {
        session.quit().await;
        return Err(ProbeError::protocol(format!(
            "EHLO rejected with {}",
            ehlo.code
        )));
    }

    let mail = session
        .send_command(&format!("MAIL FROM:<{}>", options.mail_from))
        .await?;
    if !mail.is_positive_completion() {
        session.quit().await;
        return Err(ProbeError::protocol(format!(
            "MAIL FROM rejected with {}",
            mail.code
        )));
    }

    let rcpt = session
        .send_command(&format!("RCPT TO:<{address}>"))
        .await?;
    let accepted = rcpt.is_positive_completion();
    debug!(exchange, code = rcpt.code, accepted, "RCPT TO answered");

    session.quit().await;
    Ok(accepted)
}
