//! Identifier and text helpers.

/// Prefix carried by every canonical resource identifier.
pub const INFORES_PREFIX: &str = "infores:";

/// Agent id used as the key in dispatch records: the infores without its prefix.
///
/// `"infores:aragorn"` becomes `"aragorn"`; ids without the prefix pass through.
pub fn agent_id(infores: &str) -> &str {
    infores.strip_prefix(INFORES_PREFIX).unwrap_or(infores)
}

/// Cut a string down to `max_len` bytes, appending `...` when shortened.
///
/// Never splits a UTF-8 character.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_strips_prefix() {
        assert_eq!(agent_id("infores:aragorn"), "aragorn");
        assert_eq!(agent_id("infores:ars"), "ars");
    }

    #[test]
    fn test_agent_id_without_prefix() {
        assert_eq!(agent_id("arax"), "arax");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a rather long body", 9), "a rath...");
        assert_eq!(truncate("ééééé", 6), "é...");
    }
}
