use tracing::{debug, warn};
use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

use super::{Error, MxRecord, MxStatus};

/// Lookup MX records for `domain` using the system resolver.
///
/// The domain is normalized via IDNA before querying DNS. The resulting
/// [`MxStatus`] contains the sorted list of records (ascending preference).
pub async fn check_mx(domain: &str) -> Result<MxStatus, Error> {
    let ascii = normalize_domain(domain)?;
    let resolver = TokioAsyncResolver::tokio_from_system_conf().map_err(Error::resolver_init)?;
    resolve_with(&resolver, &ascii).await
}

pub(crate) async fn resolve_with<R>(resolver: &R, ascii_domain: &str) -> Result<MxStatus, Error>
where
    R: LookupMx,
{
    let mut records = match resolver.lookup_mx(ascii_domain).await {
        Ok(records) => records,
        // NXDOMAIN and empty answers both mean "no mail route", not failure.
        Err(err) if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
            debug!(domain = ascii_domain, "no MX records: {err}");
            Vec::new()
        }
        Err(err) => {
            warn!(domain = ascii_domain, "MX lookup failed: {err}");
            return Err(Error::lookup(err));
        }
    };

    records.sort();
    records.dedup();

    if records.is_empty() {
        Ok(MxStatus::NoRecords)
    } else {
        debug!(
            domain = ascii_domain,
            count = records.len(),
            preferred = %records[0].exchange,
            "MX records resolved"
        );
        Ok(MxStatus::Records(records))
    }
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(Error::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

/// Seam between the pipeline and DNS so tests can stub lookups.
pub(crate) trait LookupMx {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError>;
}

impl LookupMx for TokioAsyncResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = TokioAsyncResolver::mx_lookup(self, domain).await?;
        let mut records = Vec::new();
        for mx in lookup.iter() {
            let exchange = normalize_exchange(mx.exchange().to_utf8());
            records.push(MxRecord::new(mx.preference(), exchange));
        }
        Ok(records)
    }
}
