pub mod types;

pub use types::{
    AnalysisResult, Course, CourseCandidate, ExtractedText, GradingScale, ScaleEntry, TextLine,
};
