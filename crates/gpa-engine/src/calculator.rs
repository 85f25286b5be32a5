//! Credit-weighted GPA computation and reference-scale normalization.

use transcript_types::{Course, CourseCandidate, GradingScale};

/// Fixed ceiling every result is normalized onto.
pub const REFERENCE_MAX: f64 = 5.0;

/// Resolved courses plus the raw GPA on the source scale.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedCourses {
    pub courses: Vec<Course>,
    pub raw_gpa: f64,
}

/// Resolve candidates against the active scale and compute the raw GPA.
///
/// A course whose grade resolves and whose credit is positive contributes
/// `credit * points` and `credit` to the sums. Unresolved grades and
/// zero-credit rows are still reported, with zero contribution to either
/// sum, so a noisy or empty transcript can never divide by zero.
pub fn grade_courses(candidates: &[CourseCandidate], scale: &GradingScale) -> GradedCourses {
    let mut total_points = 0.0;
    let mut total_credits = 0.0;
    let mut courses = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let resolved = scale.resolve(&candidate.grade);
        let points = match resolved {
            Some(scale_points) => candidate.credit * scale_points,
            None => 0.0,
        };
        if resolved.is_some() && candidate.credit > 0.0 {
            total_points += points;
            total_credits += candidate.credit;
        }
        courses.push(Course {
            raw_line: candidate.raw_line.clone(),
            grade: candidate.grade.clone(),
            credit: candidate.credit,
            points,
        });
    }

    let raw_gpa = if total_credits > 0.0 {
        total_points / total_credits
    } else {
        0.0
    };

    GradedCourses { courses, raw_gpa }
}

/// Linear rescale onto the [`REFERENCE_MAX`] ceiling.
///
/// Assumes the source scale is linear in point value; that assumption is
/// the one modeling commitment of the whole pipeline and is pinned down by
/// the scale-invariance property test.
pub fn normalize_to_reference(raw_gpa: f64, source_max: f64) -> f64 {
    if source_max > 0.0 {
        raw_gpa * (REFERENCE_MAX / source_max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(grade: &str, credit: f64) -> CourseCandidate {
        CourseCandidate {
            raw_line: format!("Course  {}  {}", grade, credit),
            grade: grade.to_string(),
            credit,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn weighted_average_on_native_five_scale() {
        let scale = GradingScale::from_pairs([("A", 5.0), ("B", 4.0), ("C", 3.0)]);
        let graded = grade_courses(&[candidate("A", 3.0), candidate("B", 4.0)], &scale);

        assert!(approx(graded.courses[0].points, 15.0));
        assert!(approx(graded.courses[1].points, 16.0));
        assert!(approx(graded.raw_gpa, 31.0 / 7.0));

        let final_gpa = normalize_to_reference(graded.raw_gpa, scale.source_max());
        // Already on a 5.0 ceiling, rescale factor is 1.0.
        assert!(approx(final_gpa, 31.0 / 7.0));
    }

    #[test]
    fn hundred_max_scale_rescales_linearly() {
        let scale = GradingScale::from_pairs([("A", 95.0), ("B", 85.0)]);
        let graded = grade_courses(&[candidate("A", 3.0), candidate("B", 4.0)], &scale);

        assert!(approx(graded.raw_gpa, 625.0 / 7.0));

        // The transcript declares a 100-max marking system.
        let final_gpa = normalize_to_reference(graded.raw_gpa, 100.0);
        assert!(approx(final_gpa, 625.0 / 7.0 * 5.0 / 100.0));
        assert!((final_gpa - 4.46).abs() < 0.01);
    }

    #[test]
    fn unresolved_grades_are_reported_but_unweighted() {
        let scale = GradingScale::from_pairs([("A", 4.0)]);
        let graded = grade_courses(&[candidate("A", 3.0), candidate("P", 4.0)], &scale);

        assert_eq!(graded.courses.len(), 2);
        assert!(approx(graded.courses[1].points, 0.0));
        // Only the resolved course weighs in: 12.0 / 3.0.
        assert!(approx(graded.raw_gpa, 4.0));
    }

    #[test]
    fn zero_credit_rows_do_not_dilute_the_average() {
        let scale = GradingScale::from_pairs([("A", 4.0), ("F", 0.0)]);
        let graded = grade_courses(&[candidate("A", 3.0), candidate("F", 0.0)], &scale);

        assert!(approx(graded.raw_gpa, 4.0));
    }

    #[test]
    fn failed_courses_with_credit_do_dilute_the_average() {
        let scale = GradingScale::from_pairs([("A", 4.0), ("F", 0.0)]);
        let graded = grade_courses(&[candidate("A", 3.0), candidate("F", 3.0)], &scale);

        // F carries weight: (12 + 0) / 6.
        assert!(approx(graded.raw_gpa, 2.0));
    }

    #[test]
    fn empty_course_set_yields_zero_without_error() {
        let scale = GradingScale::from_pairs([("A", 4.0)]);
        let graded = grade_courses(&[], &scale);

        assert!(graded.courses.is_empty());
        assert!(approx(graded.raw_gpa, 0.0));
        assert!(approx(normalize_to_reference(graded.raw_gpa, scale.source_max()), 0.0));
    }

    #[test]
    fn zero_source_max_normalizes_to_zero() {
        assert!(approx(normalize_to_reference(3.5, 0.0), 0.0));
    }
}
