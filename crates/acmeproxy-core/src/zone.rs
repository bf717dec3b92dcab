//! Zone name helpers.
//!
//! Zones and FQDNs are compared as plain strings with the trailing root dot
//! removed. A name is inside a zone if it equals the zone or ends with
//! `.` followed by the zone, so `badexample.com` is not inside `example.com`.

/// Strip a single trailing dot.
///
/// Returns the normalized name and whether a dot was removed.
#[must_use]
pub fn normalize(name: &str) -> (&str, bool) {
    match name.strip_suffix('.') {
        Some(stripped) => (stripped, true),
        None => (name, false),
    }
}

/// Returns true if `name` equals `zone` or is a subdomain of it
#[must_use]
pub fn is_within(name: &str, zone: &str) -> bool {
    if name == zone {
        return true;
    }
    name.len() > zone.len()
        && name.ends_with(zone)
        && name.as_bytes()[name.len() - zone.len() - 1] == b'.'
}

/// Record names a backend may use for `fqdn` inside `zone`, most specific first.
///
/// Some backends report fully qualified names, others names relative to the
/// zone. The first candidate is always `fqdn` itself.
#[must_use]
pub fn name_candidates(fqdn: &str, zone: &str) -> Vec<String> {
    let mut names = vec![fqdn.to_string()];
    if fqdn == zone {
        // Apex: "@" by convention, "" when the zone suffix is stripped.
        names.push(String::from("@"));
        names.push(String::new());
    } else if is_within(fqdn, zone) {
        // `relative` keeps its trailing dot here: `_acme-challenge.foo.`
        let relative = &fqdn[..fqdn.len() - zone.len()];
        names.push(relative[..relative.len() - 1].to_string());
        names.push(relative.to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("example.com."), ("example.com", true));
        assert_eq!(normalize("example.com"), ("example.com", false));
        assert_eq!(normalize("example.com.."), ("example.com.", true));
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("example.com", "example.com"));
        assert!(is_within("sub.example.com", "example.com"));
        assert!(is_within("a.b.example.com", "example.com"));
        assert!(!is_within("other.com", "example.com"));
        assert!(!is_within("badexample.com", "example.com"));
        assert!(!is_within("com", "example.com"));
    }

    #[test]
    fn test_name_candidates() {
        assert_eq!(
            name_candidates("_acme-challenge.foo.example.com", "example.com"),
            vec![
                "_acme-challenge.foo.example.com",
                "_acme-challenge.foo",
                "_acme-challenge.foo.",
            ]
        );
        assert_eq!(
            name_candidates("example.com", "example.com"),
            vec!["example.com", "@", ""]
        );
        assert_eq!(name_candidates("badexample.com", "example.com"), vec!["badexample.com"]);
    }
}
