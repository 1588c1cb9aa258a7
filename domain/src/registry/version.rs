//! Compatibility-version matching by `major.minor` prefix.

/// The `major.minor` prefix of a version string, if both parts are numeric.
///
/// `"1.6.0"` gives `Some("1.6")`; `"1"` and `"v1.6"` give `None`.
pub fn major_minor(version: &str) -> Option<&str> {
    let mut parts = version.splitn(3, '.');
    let major = parts.next()?;
    let minor = parts.next()?;
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !numeric(major) || !numeric(minor) {
        return None;
    }
    Some(&version[..major.len() + 1 + minor.len()])
}

/// Whether a declared version belongs to the target's `major.minor` line.
///
/// The declared version must continue with a `.` after the prefix, so
/// `1.6.1` matches target `1.6.0` but `1.60.0` and a bare `1.6` do not.
pub fn version_matches(declared: &str, target: &str) -> bool {
    match major_minor(target) {
        Some(prefix) => declared
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.')),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_minor() {
        assert_eq!(major_minor("1.6.0"), Some("1.6"));
        assert_eq!(major_minor("1.5"), Some("1.5"));
        assert_eq!(major_minor("10.12.3"), Some("10.12"));
        assert_eq!(major_minor("1"), None);
        assert_eq!(major_minor("v1.6"), None);
    }

    #[test]
    fn test_version_matches() {
        assert!(version_matches("1.6.0", "1.6.0"));
        assert!(version_matches("1.6.2-beta", "1.6.0"));
        assert!(!version_matches("1.5.0", "1.6.0"));
        assert!(!version_matches("1.60.0", "1.6.0"));
        assert!(!version_matches("1.6", "1.6.0"));
    }

    #[test]
    fn test_version_matches_malformed_target() {
        assert!(!version_matches("1.6.0", "latest"));
    }
}
