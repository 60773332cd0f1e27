//! Shared helper functions for CLI commands

use crate::core::identity::EntityId;

/// Format an EntityId for display, truncating if too long
///
/// IDs are 30 characters; lists show the prefix and the first 9 ULID
/// characters, which is enough to load the record again.
pub fn format_short_id(id: &EntityId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Display an optional value, or "-" when absent
pub fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Parse a `FIELD=VALUE` pair
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected FIELD=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Missing field name in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;

    #[test]
    fn test_format_short_id() {
        let id = EntityId::new(EntityPrefix::Eng);
        let formatted = format_short_id(&id);
        assert_eq!(formatted.len(), 16);
        assert!(formatted.starts_with("ENG-"));
        assert!(formatted.ends_with("..."));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("Driveline 3°", 20), "Driveline 3°");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(430)), "430");
        assert_eq!(or_dash(None::<u32>), "-");
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("bore_mm = 103.25").unwrap(),
            ("bore_mm".to_string(), "103.25".to_string())
        );
        assert!(parse_key_value("bore_mm").is_err());
        assert!(parse_key_value("=1").is_err());
    }
}
