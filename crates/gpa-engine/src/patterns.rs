//! Regex patterns and text normalization shared by scale detection and
//! course parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Explicit point-value pair: "A 4.0", "A- 3.7", "B+: 3.5", "A = 4.00".
    /// The decimal point is mandatory so integer credits and years in
    /// surrounding text never read as scale points.
    pub static ref SCALE_POINT_PATTERN: Regex =
        Regex::new(r"([A-F][+-]?)\s*[-=:–]?\s*(\d{1,3}\.\d{1,2})").unwrap();

    /// Percentage-range pair: "A(100~80)", "B (79-70)". Separators vary by
    /// registrar: tilde, colon, comma, dash.
    pub static ref SCALE_RANGE_PATTERN: Regex =
        Regex::new(r"([A-F][+-]?)\s*\(\s*\d{1,3}\s*[~:,-]\s*\d{1,3}\s*\)").unwrap();

    /// Grade token candidates. Boundaries are validated by the caller:
    /// the regex crate has no lookaround, and a trailing `\b` would
    /// backtrack the +/- modifier away ("B+" would match as "B").
    pub static ref GRADE_TOKEN_PATTERN: Regex = Regex::new(r"[A-F][+-]?").unwrap();

    /// Credit token candidates, bounds-checked by the caller.
    pub static ref CREDIT_TOKEN_PATTERN: Regex = Regex::new(r"\d{1,2}(\.\d+)?").unwrap();
}

/// Lines containing these fragments are grading-table furniture, never
/// course rows (matched case-insensitively).
pub const SCALE_HEADER_KEYWORDS: &[&str] = &[
    "grading scale",
    "grading system",
    "legend",
    "grades prior to",
    "grades effective",
];

/// Whole-token scanner-typo fixes: "At" is a classic misread of "A+".
const TOKEN_TYPO_FIXES: &[(&str, &str)] = &[
    ("At", "A+"),
    ("Bt", "B+"),
    ("Ct", "C+"),
    ("Dt", "D+"),
];

pub fn is_scale_furniture(line: &str) -> bool {
    let lower = line.to_lowercase();
    SCALE_HEADER_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Produce the matching copy of a line: table borders stripped and known
/// scanner typos fixed token-wise, so "Athletics" stays intact. The
/// original line text is kept separately for provenance.
pub fn normalize_line(line: &str) -> String {
    let without_pipes = line.replace('|', " ");
    without_pipes
        .split_whitespace()
        .map(|token| {
            TOKEN_TYPO_FIXES
                .iter()
                .find(|(from, _)| *from == token)
                .map(|(_, to)| *to)
                .unwrap_or(token)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the match at `start..end` does not butt up against
/// alphanumeric text ("A" inside "GPA" is not a grade).
pub fn is_isolated_grade(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !matches!(before, Some(c) if c.is_ascii_alphanumeric())
        && !matches!(after, Some(c) if c.is_ascii_alphanumeric())
}

/// Like [`is_isolated_grade`], but also rejects neighboring dots so a
/// version-like "2.5.1" never yields a credit.
pub fn is_isolated_number(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !matches!(before, Some(c) if c.is_ascii_alphanumeric() || c == '.')
        && !matches!(after, Some(c) if c.is_ascii_alphanumeric() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_fixes_typos_token_wise() {
        assert_eq!(normalize_line("Chemistry At 3.0"), "Chemistry A+ 3.0");
        assert_eq!(normalize_line("Athletics Bt 2.0"), "Athletics B+ 2.0");
    }

    #[test]
    fn normalize_strips_table_borders() {
        assert_eq!(normalize_line("| Calculus I | A | 3 |"), "Calculus I A 3");
    }

    #[test]
    fn furniture_lines_are_recognized() {
        assert!(is_scale_furniture("GRADING SYSTEM"));
        assert!(is_scale_furniture("Grades prior to Fall 2019"));
        assert!(!is_scale_furniture("Calculus I  A  3"));
    }

    #[test]
    fn grade_isolation_rejects_embedded_letters() {
        let text = "GPA 4.0";
        let m = GRADE_TOKEN_PATTERN.find(text).unwrap();
        assert!(!is_isolated_grade(text, m.start(), m.end()));

        let text = "Physics B 4";
        let m = GRADE_TOKEN_PATTERN.find(text).unwrap();
        assert!(is_isolated_grade(text, m.start(), m.end()));
    }

    #[test]
    fn grade_pattern_keeps_plus_modifier() {
        let m = GRADE_TOKEN_PATTERN.find("B+ 3.5").unwrap();
        assert_eq!(m.as_str(), "B+");
    }

    #[test]
    fn number_isolation_rejects_version_fragments() {
        let text = "rev 2.5.1";
        let m = CREDIT_TOKEN_PATTERN.find(text).unwrap();
        assert!(!is_isolated_number(text, m.start(), m.end()));
    }
}
