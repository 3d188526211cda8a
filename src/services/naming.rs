//! Collision-free naming for archive entries and archive files.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Suffix for archive entry names.
pub const ENTRY_SUFFIX: &str = ".xml";

/// Suffix for archive file names.
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Stem used when sanitizing leaves nothing behind.
const FALLBACK_STEM: &str = "untitled";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\\\p{Cc}]").expect("static pattern"));

/// Return `base + suffix`, or the first `base_{i} + suffix` (i = 1, 2, ...)
/// that is not in `existing`.
pub fn uniquify(base: &str, suffix: &str, existing: &HashSet<String>) -> String {
    let candidate = format!("{base}{suffix}");
    if !existing.contains(&candidate) {
        return candidate;
    }

    (1usize..)
        .map(|i| format!("{base}_{i}{suffix}"))
        .find(|name| !existing.contains(name))
        .unwrap_or(candidate)
}

/// Turn an author name into a flat, visible file stem.
///
/// Path separators and control characters become `_`; surrounding
/// whitespace and dots are stripped.
pub fn sanitize_stem(raw: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(raw, "_");
    let stem = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_set_returns_base_unprobed() {
        assert_eq!(uniquify("A", ENTRY_SUFFIX, &HashSet::new()), "A.xml");
    }

    #[test]
    fn test_non_colliding_name_unchanged() {
        let existing = names(&["B.xml", "A_1.xml"]);
        assert_eq!(uniquify("A", ENTRY_SUFFIX, &existing), "A.xml");
    }

    #[test]
    fn test_first_collision_gets_suffix_one() {
        let existing = names(&["A.xml"]);
        assert_eq!(uniquify("A", ENTRY_SUFFIX, &existing), "A_1.xml");
    }

    #[test]
    fn test_archive_probe_skips_taken_indices() {
        let existing = names(&["xml_archive.zip", "xml_archive_1.zip"]);
        assert_eq!(
            uniquify("xml_archive", ARCHIVE_SUFFIX, &existing),
            "xml_archive_2.zip"
        );
    }

    #[test]
    fn test_probe_takes_lowest_free_index() {
        let existing = names(&["xml_archive.zip", "xml_archive_1.zip", "xml_archive_3.zip"]);
        assert_eq!(
            uniquify("xml_archive", ARCHIVE_SUFFIX, &existing),
            "xml_archive_2.zip"
        );
    }

    #[test]
    fn test_namespaces_do_not_interfere() {
        let existing = names(&["xml_archive.xml"]);
        assert_eq!(
            uniquify("xml_archive", ARCHIVE_SUFFIX, &existing),
            "xml_archive.zip"
        );
    }

    #[test]
    fn test_repeated_assignment_never_collides() {
        let mut existing = HashSet::new();
        let mut assigned = Vec::new();
        for _ in 0..25 {
            let name = uniquify("A", ENTRY_SUFFIX, &existing);
            assert!(!existing.contains(&name));
            existing.insert(name.clone());
            assigned.push(name);
        }
        assert_eq!(assigned[0], "A.xml");
        assert_eq!(assigned[1], "A_1.xml");
        assert_eq!(assigned[24], "A_24.xml");
    }

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_stem("A"), "A");
        assert_eq!(sanitize_stem("Hélène Carrère d'Encausse"), "Hélène Carrère d'Encausse");
    }

    #[test]
    fn test_sanitize_flattens_paths() {
        assert_eq!(sanitize_stem("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_stem("a\\b"), "a_b");
        assert_eq!(sanitize_stem("line\nbreak"), "line_break");
    }

    #[test]
    fn test_sanitize_trims_and_falls_back() {
        assert_eq!(sanitize_stem("  Name  "), "Name");
        assert_eq!(sanitize_stem(" .. "), "untitled");
        assert_eq!(sanitize_stem(""), "untitled");
    }
}
