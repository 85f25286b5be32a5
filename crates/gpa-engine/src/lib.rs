//! Transcript GPA analysis engine.
//!
//! Wires the pipeline: bytes → lines → {scale, courses} → raw GPA →
//! normalized GPA. Extraction failure aborts a request; every later stage
//! degrades gracefully (empty scale, zero courses) and is reported as
//! data, never as an error. The engine is stateless per request.

pub mod calculator;
pub mod config;
pub mod courses;
pub mod error;
pub mod patterns;
pub mod scale;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};
use transcript_types::{AnalysisResult, ExtractedText, TextLine};

pub use config::EngineConfig;
pub use error::EngineError;
pub use scale::{NoScaleReason, ScaleDetection};

/// Characters of extracted text echoed back for operator inspection.
const PREVIEW_CHARS: usize = 500;

/// GpaEngine entry point. A single instance serves concurrent requests:
/// every call works purely on the bytes it is given.
pub struct GpaEngine {
    config: EngineConfig,
}

impl GpaEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over one uploaded document.
    pub fn analyze(&self, filename: &str, bytes: &[u8]) -> Result<AnalysisResult, EngineError> {
        if bytes.len() > self.config.max_upload_bytes {
            return Err(EngineError::OversizedInput {
                size: bytes.len(),
                limit: self.config.max_upload_bytes,
            });
        }

        let extracted = transcript_pdf::extract_lines(bytes, self.config.max_pages)?;
        if extracted.truncated {
            warn!(
                filename,
                page_count = extracted.page_count,
                max_pages = self.config.max_pages,
                "transcript truncated at page limit"
            );
        }

        Ok(self.analyze_lines(filename, &extracted))
    }

    /// Scale detection, course parsing, and GPA calculation over
    /// already-extracted lines. Extraction-independent seam, also driven
    /// directly by tests.
    pub fn analyze_lines(&self, filename: &str, extracted: &ExtractedText) -> AnalysisResult {
        let detection = scale::detect_scale(&extracted.lines);
        let (active_scale, extracted_scale, claimed_lines) = match detection {
            ScaleDetection::Found {
                scale,
                strategy,
                claimed_lines,
            } => {
                info!(
                    filename,
                    strategy,
                    entries = scale.len(),
                    source_max = scale.source_max(),
                    "grading scale detected"
                );
                let point_map = scale.to_point_map();
                (scale, point_map, claimed_lines)
            }
            ScaleDetection::NotFound { reason } => {
                info!(filename, ?reason, "no grading scale detected, substituting default");
                (
                    self.config.default_scale.clone(),
                    BTreeMap::new(),
                    BTreeSet::new(),
                )
            }
        };

        // Lines claimed by the scale table are not course rows.
        let course_lines: Vec<TextLine> = extracted
            .lines
            .iter()
            .enumerate()
            .filter(|(ordinal, _)| !claimed_lines.contains(ordinal))
            .map(|(_, line)| line.clone())
            .collect();
        let candidates = courses::parse_courses(&course_lines);

        let graded = calculator::grade_courses(&candidates, &active_scale);
        let final_gpa_5_scale =
            calculator::normalize_to_reference(graded.raw_gpa, active_scale.source_max());

        info!(
            filename,
            courses = graded.courses.len(),
            raw_gpa = graded.raw_gpa,
            final_gpa_5_scale,
            "analysis complete"
        );

        AnalysisResult {
            filename: filename.to_string(),
            extracted_scale,
            scale_source_max_detected: active_scale.source_max(),
            courses_found: graded.courses.len(),
            courses: graded.courses,
            raw_gpa: graded.raw_gpa,
            final_gpa_5_scale,
            preview_text: preview(&extracted.lines),
        }
    }
}

impl Default for GpaEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn preview(lines: &[TextLine]) -> String {
    let joined = lines
        .iter()
        .map(|line| line.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    joined.chars().take(PREVIEW_CHARS).collect()
}
