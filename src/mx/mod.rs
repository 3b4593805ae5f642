//! DNS MX resolution, second stage of the pipeline.
//!
//! The public entry point is [`check_mx`], which performs an asynchronous
//! lookup using the system resolver and returns a [`MxStatus`] describing
//! whether the domain has a mail route. "No such domain" and "no MX records"
//! are both [`MxStatus::NoRecords`], not errors; everything else surfaces as
//! [`Error`] and is collapsed to a no-route verdict by the orchestrator.

mod error;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use resolver::check_mx;
pub use types::{MxRecord, MxStatus};

pub(crate) use resolver::{LookupMx, normalize_domain, resolve_with};
