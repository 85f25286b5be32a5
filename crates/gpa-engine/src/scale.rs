//! Grading-scale table detection.
//!
//! Detection is an ordered list of matcher strategies tried in sequence;
//! the first strategy producing an accepted candidate wins. Explicit
//! point-value tables outrank percentage-range tables because ranges carry
//! no point values. Absence of a scale is a normal, representable outcome,
//! never an error.

use std::collections::BTreeSet;

use tracing::debug;
use transcript_types::{GradingScale, TextLine};

use crate::config::standard_reference_scale;
use crate::patterns;

/// Minimum distinct symbol/point pairs before a candidate region is
/// accepted as the document's grading scale. Stray grade-and-number noise
/// in other tables rarely clusters this much.
pub const MIN_SCALE_PAIRS: usize = 3;

/// Entries may sit on the same or an adjacent line; one non-matching line
/// between entries does not split a region.
const MAX_REGION_GAP: usize = 1;

/// Point values above this are score noise, not grade points.
const MAX_POINT_VALUE: f64 = 200.0;

/// Outcome of scale detection.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleDetection {
    Found {
        scale: GradingScale,
        strategy: &'static str,
        /// Document-order ordinals (indices into the scanned line slice)
        /// of the lines that produced scale entries. The orchestrator
        /// removes them from course parsing so a scale row is never also
        /// read as a course row.
        claimed_lines: BTreeSet<usize>,
    },
    NotFound {
        reason: NoScaleReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoScaleReason {
    /// No line matched any symbol/point shape at all.
    NoSymbolPointPairs,
    /// Matches existed, but no region reached [`MIN_SCALE_PAIRS`] distinct
    /// symbols.
    BelowMinimumPairs { found: usize },
}

/// A scale candidate produced by one strategy.
pub struct ScaleCandidate {
    pub scale: GradingScale,
    /// Distinct symbol/point pairs backing the candidate.
    pub match_count: usize,
    pub claimed_lines: BTreeSet<usize>,
}

/// One way of recognizing a grading table. Strategies report either an
/// accepted candidate or the distinct pair count they saw below the
/// acceptance minimum, so the detector can explain a miss.
pub trait ScaleStrategy {
    fn name(&self) -> &'static str;
    fn detect(&self, lines: &[TextLine]) -> Result<ScaleCandidate, usize>;
}

/// Recognizes explicit point tables: "A 4.0" / "A- = 3.7" rows clustered
/// into a contiguous region.
pub struct PointValueStrategy;

/// Recognizes percentage-range tables: "A(100~80)" rows. The ranges name
/// grade bands but carry no point values, so detection substitutes the
/// standard reference table.
pub struct PercentRangeStrategy;

struct LineMatches {
    ordinal: usize,
    pairs: Vec<(String, f64)>,
}

impl ScaleStrategy for PointValueStrategy {
    fn name(&self) -> &'static str {
        "point-value"
    }

    fn detect(&self, lines: &[TextLine]) -> Result<ScaleCandidate, usize> {
        let mut matched: Vec<LineMatches> = Vec::new();
        for (ordinal, line) in lines.iter().enumerate() {
            let normalized = patterns::normalize_line(&line.content);
            let mut pairs = Vec::new();
            for caps in patterns::SCALE_POINT_PATTERN.captures_iter(&normalized) {
                let symbol = match caps.get(1) {
                    Some(m) => m,
                    None => continue,
                };
                if !patterns::is_isolated_grade(&normalized, symbol.start(), symbol.end()) {
                    continue;
                }
                let points: f64 = match caps[2].parse() {
                    Ok(v) => v,
                    Err(_) => continue,
                };
                if points > MAX_POINT_VALUE {
                    continue;
                }
                pairs.push((symbol.as_str().to_string(), points));
            }
            if !pairs.is_empty() {
                matched.push(LineMatches { ordinal, pairs });
            }
        }

        // Split matched lines into regions wherever the gap grows past
        // MAX_REGION_GAP intervening lines.
        let mut regions: Vec<Vec<&LineMatches>> = Vec::new();
        for line_matches in &matched {
            match regions.last_mut() {
                Some(region)
                    if line_matches.ordinal
                        - region.last().map(|m| m.ordinal).unwrap_or(0)
                        <= MAX_REGION_GAP + 1 =>
                {
                    region.push(line_matches);
                }
                _ => regions.push(vec![line_matches]),
            }
        }

        // Highest distinct-symbol count wins; ties break by document order.
        let mut best: Option<ScaleCandidate> = None;
        for region in &regions {
            let mut scale = GradingScale::new();
            let mut claimed_lines = BTreeSet::new();
            for line_matches in region {
                for (symbol, points) in &line_matches.pairs {
                    scale.insert(symbol.clone(), *points);
                }
                claimed_lines.insert(line_matches.ordinal);
            }
            let match_count = scale.len();
            if best.as_ref().map(|b| b.match_count).unwrap_or(0) < match_count {
                best = Some(ScaleCandidate {
                    scale,
                    match_count,
                    claimed_lines,
                });
            }
        }

        match best {
            Some(candidate) if candidate.match_count >= MIN_SCALE_PAIRS => Ok(candidate),
            Some(candidate) => Err(candidate.match_count),
            None => Err(0),
        }
    }
}

impl ScaleStrategy for PercentRangeStrategy {
    fn name(&self) -> &'static str {
        "percent-range"
    }

    fn detect(&self, lines: &[TextLine]) -> Result<ScaleCandidate, usize> {
        let mut symbols = BTreeSet::new();
        let mut claimed_lines = BTreeSet::new();
        for (ordinal, line) in lines.iter().enumerate() {
            let normalized = patterns::normalize_line(&line.content);
            let mut hit = false;
            for caps in patterns::SCALE_RANGE_PATTERN.captures_iter(&normalized) {
                let symbol = match caps.get(1) {
                    Some(m) => m,
                    None => continue,
                };
                if !patterns::is_isolated_grade(&normalized, symbol.start(), symbol.end()) {
                    continue;
                }
                symbols.insert(symbol.as_str().to_string());
                hit = true;
            }
            if hit {
                claimed_lines.insert(ordinal);
            }
        }

        if symbols.len() >= MIN_SCALE_PAIRS {
            Ok(ScaleCandidate {
                scale: standard_reference_scale(),
                match_count: symbols.len(),
                claimed_lines,
            })
        } else {
            Err(symbols.len())
        }
    }
}

/// Run the strategy list over the extracted lines.
pub fn detect_scale(lines: &[TextLine]) -> ScaleDetection {
    let strategies: [&dyn ScaleStrategy; 2] = [&PointValueStrategy, &PercentRangeStrategy];

    let mut best_below = 0;
    for strategy in strategies {
        match strategy.detect(lines) {
            Ok(candidate) => {
                debug!(
                    strategy = strategy.name(),
                    pairs = candidate.match_count,
                    "grading scale detected"
                );
                return ScaleDetection::Found {
                    scale: candidate.scale,
                    strategy: strategy.name(),
                    claimed_lines: candidate.claimed_lines,
                };
            }
            Err(found) => best_below = best_below.max(found),
        }
    }

    let reason = if best_below == 0 {
        NoScaleReason::NoSymbolPointPairs
    } else {
        NoScaleReason::BelowMinimumPairs { found: best_below }
    };
    ScaleDetection::NotFound { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(contents: &[&str]) -> Vec<TextLine> {
        contents
            .iter()
            .enumerate()
            .map(|(i, content)| TextLine {
                page: 1,
                index: i as u32,
                content: content.to_string(),
            })
            .collect()
    }

    #[test]
    fn detects_point_value_table() {
        let lines = lines(&["Grading Scale", "A 5.0", "B 4.0", "C 3.0", "Calculus I  A  3"]);

        match detect_scale(&lines) {
            ScaleDetection::Found {
                scale,
                strategy,
                claimed_lines,
            } => {
                assert_eq!(strategy, "point-value");
                assert_eq!(scale.resolve("A"), Some(5.0));
                assert_eq!(scale.resolve("B"), Some(4.0));
                assert_eq!(scale.resolve("C"), Some(3.0));
                assert_eq!(scale.source_max(), 5.0);
                assert_eq!(claimed_lines, BTreeSet::from([1, 2, 3]));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn two_pairs_are_below_minimum() {
        let lines = lines(&["A 4.0", "B 3.0", "Intro to Logic  A  3"]);

        assert_eq!(
            detect_scale(&lines),
            ScaleDetection::NotFound {
                reason: NoScaleReason::BelowMinimumPairs { found: 2 }
            }
        );
    }

    #[test]
    fn no_pairs_at_all() {
        let lines = lines(&["Transcript of Records", "Student: Jane Roe"]);

        assert_eq!(
            detect_scale(&lines),
            ScaleDetection::NotFound {
                reason: NoScaleReason::NoSymbolPointPairs
            }
        );
    }

    #[test]
    fn embedded_letters_are_not_scale_symbols() {
        // "GPA 4.0" and "CGPA 3.75" must not seed a region.
        let lines = lines(&["GPA 4.0", "CGPA 3.75", "SGPA 3.50"]);

        assert!(matches!(detect_scale(&lines), ScaleDetection::NotFound { .. }));
    }

    #[test]
    fn largest_region_wins_over_earlier_smaller_one() {
        let lines = lines(&[
            "A 4.0",
            "B 3.0",
            "C 2.0",
            "unrelated text",
            "unrelated text",
            "A+ 5.0",
            "A 4.5",
            "B+ 4.0",
            "B 3.5",
        ]);

        match detect_scale(&lines) {
            ScaleDetection::Found { scale, .. } => {
                assert_eq!(scale.len(), 4);
                assert_eq!(scale.resolve("A"), Some(4.5));
                assert_eq!(scale.source_max(), 5.0);
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn earliest_region_wins_ties() {
        let lines = lines(&[
            "A 4.0",
            "B 3.0",
            "C 2.0",
            "unrelated text",
            "unrelated text",
            "D 1.0",
            "F 0.0",
            "E 0.5",
        ]);

        match detect_scale(&lines) {
            ScaleDetection::Found { scale, .. } => {
                assert_eq!(scale.resolve("A"), Some(4.0));
                assert_eq!(scale.resolve("D"), None);
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn first_occurrence_of_a_symbol_wins_within_a_region() {
        let lines = lines(&["A 4.0", "A 9.9", "B 3.0", "C 2.0"]);

        match detect_scale(&lines) {
            ScaleDetection::Found { scale, .. } => {
                assert_eq!(scale.resolve("A"), Some(4.0));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn gap_of_one_line_does_not_split_a_region() {
        let lines = lines(&["A 4.0", "B 3.0", "(see note 2)", "C 2.0"]);

        match detect_scale(&lines) {
            ScaleDetection::Found { scale, claimed_lines, .. } => {
                assert_eq!(scale.len(), 3);
                assert_eq!(claimed_lines, BTreeSet::from([0, 1, 3]));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn range_table_substitutes_standard_scale() {
        let lines = lines(&["A(100~80)", "B(79~70)", "C(69~60)"]);

        match detect_scale(&lines) {
            ScaleDetection::Found {
                scale,
                strategy,
                claimed_lines,
            } => {
                assert_eq!(strategy, "percent-range");
                assert_eq!(scale.resolve("A+"), Some(5.0));
                assert_eq!(scale.resolve("A"), Some(4.0));
                assert_eq!(scale.source_max(), 5.0);
                assert_eq!(claimed_lines, BTreeSet::from([0, 1, 2]));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn point_table_outranks_range_table() {
        let lines = lines(&[
            "A(100~80)",
            "B(79~70)",
            "C(69~60)",
            "A 4.0",
            "B 3.0",
            "C 2.0",
        ]);

        match detect_scale(&lines) {
            ScaleDetection::Found { strategy, scale, .. } => {
                assert_eq!(strategy, "point-value");
                assert_eq!(scale.resolve("A"), Some(4.0));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn separator_variants_parse() {
        let lines = lines(&["A = 4.0", "B+: 3.5", "C - 2.0"]);

        match detect_scale(&lines) {
            ScaleDetection::Found { scale, .. } => {
                assert_eq!(scale.resolve("A"), Some(4.0));
                assert_eq!(scale.resolve("B+"), Some(3.5));
                assert_eq!(scale.resolve("C"), Some(2.0));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn minus_grades_keep_their_modifier() {
        let lines = lines(&["A 4.0", "A- 3.7", "B+ 3.3", "B 3.0"]);

        match detect_scale(&lines) {
            ScaleDetection::Found { scale, .. } => {
                assert_eq!(scale.resolve("A-"), Some(3.7));
                assert_eq!(scale.resolve("B+"), Some(3.3));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }
}
