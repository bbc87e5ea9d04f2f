// Practice module
// Hit grading, the stats reducer and session state

pub mod analyzer;
pub mod session;
pub mod stats;

pub use analyzer::{AnalyzerSettings, HitAnalyzer, HitResult};
pub use session::PracticeSession;
pub use stats::{Grade, GradeThresholds, PracticeStats};
