//! Text processing utilities.
//!
//! Helpers for matching user input against names and for fitting values into
//! table cells.

use log::*;
use regex::Regex;

/// Lowercase a label and join its words with underscores, so that
/// "To Be Tested" becomes "to_be_tested".
///
pub fn normalize_key(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    match Regex::new(r"[\s\-]+") {
        Ok(re) => re.replace_all(&lowered, "_").into_owned(),
        Err(e) => {
            warn!("Failed to compile key pattern: {}", e);
            lowered.replace(' ', "_")
        }
    }
}

/// Case-insensitive substring match.
///
pub fn fuzzy_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Cut `value` to at most `max` characters, marking the cut with `...`.
///
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return value.chars().take(max).collect();
    }
    let kept: String = value.chars().take(max - 3).collect();
    format!("{}...", kept)
}

/// Extract the number from a sprint name such as "Sprint 70".
///
pub fn sprint_number(name: &str) -> Option<u32> {
    let re = match Regex::new(r"(?i)^\s*sprint\s+(\d+)\s*$") {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to compile sprint pattern: {}", e);
            return None;
        }
    };
    re.captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("To Be Tested"), "to_be_tested");
        assert_eq!(normalize_key("  In   Progress "), "in_progress");
        assert_eq!(normalize_key("not-started"), "not_started");
        assert_eq!(normalize_key("Done"), "done");
    }

    #[test]
    fn test_fuzzy_contains() {
        assert!(fuzzy_contains("Ada Lovelace", "love"));
        assert!(fuzzy_contains("Ada Lovelace", "ADA"));
        assert!(fuzzy_contains("Ada", ""));
        assert!(!fuzzy_contains("Ada", "Alan"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a rather long task name", 10), "a rathe...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("città più bella", 8), "città...");
    }

    #[test]
    fn test_sprint_number() {
        assert_eq!(sprint_number("Sprint 70"), Some(70));
        assert_eq!(sprint_number("sprint  7"), Some(7));
        assert_eq!(sprint_number("Sprint 70 (hotfix)"), None);
        assert_eq!(sprint_number("Backlog"), None);
    }
}
