//! Stage evaluators.
//!
//! Each stage consumes the query and/or the produced answer and timing and
//! returns its verdict. Judge failures never escape a stage.

pub mod execution;
pub mod input;
pub mod output;
pub mod validation;

pub use execution::monitor_execution;
pub use input::evaluate_input;
pub use output::evaluate_output;
pub use validation::{efficiency_score, extract_quality_score, is_format_valid, validate_final};
