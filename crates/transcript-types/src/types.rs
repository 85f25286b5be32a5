use std::collections::BTreeMap;

/// One line of text extracted from a transcript PDF.
///
/// Ordering by `(page, index)` is document order. Lines are immutable once
/// extracted.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextLine {
    /// 1-based page number.
    pub page: u32,
    /// 0-based position within the page.
    pub index: u32,
    pub content: String,
}

/// Extraction output for one document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtractedText {
    pub lines: Vec<TextLine>,
    pub page_count: usize,
    /// True when the document had more pages than the extraction limit.
    pub truncated: bool,
}

/// A single grade-symbol/point-value pair from a grading scale table.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleEntry {
    pub symbol: String,
    pub points: f64,
}

/// Mapping from grade symbol to point value on a transcript's native scale.
///
/// `source_max` always equals the highest point value over all entries
/// (0.0 while empty); `insert` maintains the invariant. Entries live in a
/// `BTreeMap` so iteration and serialization order are deterministic.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradingScale {
    entries: BTreeMap<String, ScaleEntry>,
    source_max: f64,
}

impl GradingScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut scale = Self::new();
        for (symbol, points) in pairs {
            scale.insert(symbol, points);
        }
        scale
    }

    /// Insert a symbol/point pair. The first value seen for a symbol wins;
    /// later duplicates are ignored.
    pub fn insert(&mut self, symbol: impl Into<String>, points: f64) {
        let symbol = symbol.into();
        if self.entries.contains_key(&symbol) {
            return;
        }
        if points > self.source_max {
            self.source_max = points;
        }
        self.entries.insert(
            symbol.clone(),
            ScaleEntry { symbol, points },
        );
    }

    /// Point value for a grade symbol, if the symbol exists in this scale.
    pub fn resolve(&self, symbol: &str) -> Option<f64> {
        self.entries.get(symbol).map(|entry| entry.points)
    }

    /// Highest point value over all entries; 0.0 for an empty scale.
    pub fn source_max(&self) -> f64 {
        self.source_max
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat symbol-to-points map, the wire shape of `extracted_scale`.
    pub fn to_point_map(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|(symbol, entry)| (symbol.clone(), entry.points))
            .collect()
    }

    /// A copy with every point value (and therefore `source_max`)
    /// multiplied by `factor`. Only meaningful for positive factors.
    pub fn scaled_by(&self, factor: f64) -> GradingScale {
        GradingScale::from_pairs(
            self.entries
                .iter()
                .map(|(symbol, entry)| (symbol.clone(), entry.points * factor)),
        )
    }
}

/// A text line tentatively identified as one completed course, pending
/// scale resolution.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CourseCandidate {
    pub raw_line: String,
    pub grade: String,
    pub credit: f64,
}

/// A fully resolved course record as reported to the client.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Course {
    /// Original line text the record was parsed from.
    pub raw_line: String,
    pub grade: String,
    pub credit: f64,
    /// `credit * scale_points` when the grade resolves in the active
    /// scale, 0.0 otherwise.
    pub points: f64,
}

/// Terminal artifact of one analysis request. Never mutated after
/// construction and discarded once the response is sent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    pub filename: String,
    /// Scale table found in the document; empty when the default scale was
    /// substituted downstream.
    pub extracted_scale: BTreeMap<String, f64>,
    pub scale_source_max_detected: f64,
    pub courses_found: usize,
    pub courses: Vec<Course>,
    /// Credit-weighted average on the transcript's native scale.
    pub raw_gpa: f64,
    /// `raw_gpa` linearly rescaled onto the 5.0 reference ceiling.
    pub final_gpa_5_scale: f64,
    /// First characters of the extracted text, for operator inspection.
    pub preview_text: String,
}
