//! Pipeline orchestration: syntax, then mail route, then mailbox probe.
//!
//! Each stage gates the next; the first failure determines the verdict. The
//! collapse of stage errors into the four public outcomes happens here and
//! only here, as an explicit mapping:
//!
//! | stage outcome                               | result                |
//! |---------------------------------------------|-----------------------|
//! | syntax check fails                          | `InvalidSyntax`       |
//! | MX lookup empty, NXDOMAIN, or any DNS error | `NoMailRoute`         |
//! | `RCPT TO` accepted (2xx)                    | `MailboxExists`       |
//! | `RCPT TO` refused, or any probe error       | `MailboxDoesNotExist` |

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use trust_dns_resolver::TokioAsyncResolver;

use crate::mx::{self, LookupMx, MxStatus};
use crate::probe::{self, ProbeOptions};
use crate::syntax::{split_address, validate_syntax};


/// Verdict for one verification request. Owns no resources and carries no
/// state beyond the tag; created once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationResult {
    InvalidSyntax,
    NoMailRoute,
    MailboxExists,
    MailboxDoesNotExist,
}

impl VerificationResult {
    /// Message the rendering collaborator shows for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidSyntax => "Invalid email syntax",
            Self::NoMailRoute => "No MX records found for domain",
            Self::MailboxExists => "Email exists",
            Self::MailboxDoesNotExist => "Email does not exist",
        }
    }

    pub fn is_deliverable(&self) -> bool {
        matches!(self, Self::MailboxExists)
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Verifies `email` with default probe settings. See [`verify_with_options`].
pub async fn verify(email: &str) -> VerificationResult {
    verify_with_options(email, &ProbeOptions::default()).await
}

/// Runs the full pipeline. Infallible by design: every internal failure is
/// already mapped to one of the four outcomes, so the caller never sees a
/// transport or protocol error.
pub async fn verify_with_options(email: &str, options: &ProbeOptions) -> VerificationResult {
    if !validate_syntax(email) {
        return VerificationResult::InvalidSyntax;
    }
    let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(err) => {
            warn!("resolver initialization failed: {err}");
            return VerificationResult::NoMailRoute;
        }
    };
    verify_with(email, options, &resolver).await
}

pub(crate) async fn verify_with<R>(
    email: &str,
    options: &ProbeOptions,
    resolver: &R,
) -> VerificationResult
where
    R: LookupMx,
{
    if !validate_syntax(email) {
        debug!(email, "rejected by syntax check");
        return VerificationResult::InvalidSyntax;
    }

    // Syntax guarantees exactly one '@'.
    let Some((_, domain)) = split_address(email) else {
        return VerificationResult::InvalidSyntax;
    };

    let status = match mx::normalize_domain(domain) {
        Ok(ascii) => mx::resolve_with(resolver, &ascii).await,
        Err(err) => Err(err),
    };
    match status {
        Ok(MxStatus::Records(_)) => {}
        Ok(MxStatus::NoRecords) => {
            debug!(domain, "domain has no mail route");
            return VerificationResult::NoMailRoute;
        }
        Err(err) => {
            warn!(domain, "mail-route check failed, treating as no route: {err}");
            return VerificationResult::NoMailRoute;
        }
    }

    match probe::probe_with_resolver(email, options, resolver).await {
        Ok(true) => VerificationResult::MailboxExists,
        Ok(false) => VerificationResult::MailboxDoesNotExist,
        Err(err) => {
            warn!(email, "mailbox probe failed, treating as nonexistent: {err}");
            VerificationResult::MailboxDoesNotExist
        }
    }
}
