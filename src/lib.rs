#![forbid(unsafe_code)]
//! mailprobe — layered email deliverability checks.
//!
//! Three stages of increasing cost and decreasing certainty, composed as a
//! short-circuit pipeline by [`verify()`]:
//!
//! 1. [`syntax::validate_syntax`] — pure shape check, no I/O;
//! 2. [`mx::check_mx`] — async DNS MX lookup for the domain;
//! 3. [`probe::probe_mailbox`] — scripted SMTP handshake against the
//!    preferred mail exchange, under a hard session deadline.
//!
//! Every third-party failure is caught at its stage and collapsed into one
//! of the four [`VerificationResult`] outcomes; the core never surfaces an
//! internal error to its caller.

pub mod mx;
pub mod probe;
pub mod syntax;
pub mod verify;

pub use mx::{Error as MxError, MxRecord, MxStatus, check_mx};
pub use probe::{ProbeError, ProbeOptions, probe_mailbox};
pub use syntax::validate_syntax;
pub use verify::{VerificationResult, verify, verify_with_options};
