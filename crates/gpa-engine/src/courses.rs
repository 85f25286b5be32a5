//! Course-record extraction from transcript text lines.
//!
//! A line becomes a course candidate when it carries a grade token and a
//! credit value close enough together to plausibly describe one completed
//! course. Lines that match only partially are omitted, never errors, and
//! parsing is a pure function of its input.

use transcript_types::{CourseCandidate, TextLine};

use crate::patterns;

/// Grade and credit must sit within this many whitespace-delimited tokens
/// of each other; anything farther apart is formatting noise.
pub const MAX_PAIR_TOKEN_DISTANCE: usize = 8;

/// Credit-hour sanity bounds, exclusive on both ends. Values outside are
/// scores or years, not credits.
const CREDIT_MIN: f64 = 0.0;
const CREDIT_MAX: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
struct GradeToken {
    text: String,
    token_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct CreditToken {
    value: f64,
    token_index: usize,
}

/// Scan lines in document order for course candidates.
pub fn parse_courses(lines: &[TextLine]) -> Vec<CourseCandidate> {
    let mut candidates = Vec::new();
    for line in lines {
        parse_line(&line.content, &mut candidates);
    }
    candidates
}

fn parse_line(content: &str, out: &mut Vec<CourseCandidate>) {
    if patterns::is_scale_furniture(content) {
        return;
    }

    let normalized = patterns::normalize_line(content);
    let grades = find_grades(&normalized);
    let credits = find_credits(&normalized);
    if grades.is_empty() || credits.is_empty() {
        return;
    }

    let raw = content.trim();

    if grades.len() == credits.len() {
        // Column-aligned layouts pair positionally:
        // "Algebra II  2.0 A   Geometry  3.0 B" is two records.
        let pairs: Vec<(&GradeToken, &CreditToken)> = grades
            .iter()
            .zip(credits.iter())
            .filter(|(g, c)| g.token_index.abs_diff(c.token_index) <= MAX_PAIR_TOKEN_DISTANCE)
            .collect();
        let multi = pairs.len() > 1;
        for (i, (grade, credit)) in pairs.iter().enumerate() {
            let raw_line = if multi {
                format!("{} [part {}]", raw, i + 1)
            } else {
                raw.to_string()
            };
            out.push(CourseCandidate {
                raw_line,
                grade: grade.text.clone(),
                credit: credit.value,
            });
        }
    } else if let Some((grade, credit)) = first_valid_pairing(&grades, &credits) {
        out.push(CourseCandidate {
            raw_line: raw.to_string(),
            grade: grade.text.clone(),
            credit: credit.value,
        });
    }
}

/// The deterministic tie-break for lines where grade and credit counts
/// disagree: grades in order of appearance, each tried against credits in
/// order of appearance, first pairing within the token-distance bound wins.
fn first_valid_pairing<'a>(
    grades: &'a [GradeToken],
    credits: &'a [CreditToken],
) -> Option<(&'a GradeToken, &'a CreditToken)> {
    for grade in grades {
        for credit in credits {
            if grade.token_index.abs_diff(credit.token_index) <= MAX_PAIR_TOKEN_DISTANCE {
                return Some((grade, credit));
            }
        }
    }
    None
}

fn find_grades(text: &str) -> Vec<GradeToken> {
    patterns::GRADE_TOKEN_PATTERN
        .find_iter(text)
        .filter(|m| patterns::is_isolated_grade(text, m.start(), m.end()))
        .map(|m| GradeToken {
            text: m.as_str().to_string(),
            token_index: token_index_at(text, m.start()),
        })
        .collect()
}

fn find_credits(text: &str) -> Vec<CreditToken> {
    patterns::CREDIT_TOKEN_PATTERN
        .find_iter(text)
        .filter(|m| patterns::is_isolated_number(text, m.start(), m.end()))
        .filter_map(|m| {
            let value: f64 = m.as_str().parse().ok()?;
            if value > CREDIT_MIN && value < CREDIT_MAX {
                Some(CreditToken {
                    value,
                    token_index: token_index_at(text, m.start()),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Number of whitespace-delimited tokens starting before `byte_pos`.
fn token_index_at(text: &str, byte_pos: usize) -> usize {
    text[..byte_pos].split_whitespace().count()
}
