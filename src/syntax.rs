//! Email-shape syntax check, first stage of the pipeline.
//!
//! Accepts the grammar `local @ domain . tld` where the local part is one or
//! more of `[A-Za-z0-9._%+-]`, the domain body is `[A-Za-z0-9.-]`, and the
//! final label is at least two ASCII letters. This is a liveness filter, not
//! full RFC 5322 validation: exotic but legal addresses (quoted locals,
//! domain literals, IDN) are rejected on purpose, and anything that slips
//! through fails safely in the DNS and SMTP stages.

/// Returns `true` when `address` matches the accepted email shape.
///
/// Pure and infallible. No trimming, no case folding: the input must
/// already be well-formed.
pub fn validate_syntax(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => is_local(local) && is_domain(domain),
        None => false,
    }
}

/// Splits `address` into (local, domain) on the first `@`.
pub(crate) fn split_address(address: &str) -> Option<(&str, &str)> {
    address.split_once('@')
}

fn is_local(local: &str) -> bool {
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
}

fn is_domain(domain: &str) -> bool {
    // Split on the last dot: the tail must be a pure-ASCII-letter label of
    // at least two characters, the head at least one `[A-Za-z0-9.-]` char.
    let Some((head, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if head.is_empty() || tld.len() < 2 {
        return false;
    }
    tld.chars().all(|c| c.is_ascii_alphabetic())
        && head
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_shapes() {
        assert!(validate_syntax("user@example.com"));
        assert!(validate_syntax("first.last+tag@mail.example.org"));
        assert!(validate_syntax("u_%-x@sub.domain-name.co"));
    }

    #[test]
    fn rejects_missing_or_extra_at() {
        assert!(!validate_syntax("not-an-email"));
        assert!(!validate_syntax("a@b@example.com"));
        assert!(!validate_syntax("@example.com"));
        assert!(!validate_syntax("user@"));
    }

    #[test]
    fn rejects_bad_tld() {
        assert!(!validate_syntax("user@example"));
        assert!(!validate_syntax("user@example.c"));
        assert!(!validate_syntax("user@example.c0m"));
        assert!(!validate_syntax("user@.com"));
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(!validate_syntax("us er@example.com"));
        assert!(!validate_syntax("user@exa_mple.com"));
        assert!(!validate_syntax(" user@example.com"));
        assert!(!validate_syntax("user@example.com "));
        assert!(!validate_syntax("usér@example.com"));
    }

    #[test]
    fn split_on_first_at() {
        assert_eq!(split_address("a@b.com"), Some(("a", "b.com")));
        assert_eq!(split_address("a@b@c"), Some(("a", "b@c")));
        assert_eq!(split_address("nope"), None);
    }
}
