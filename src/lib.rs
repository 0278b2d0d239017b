// Manifesto: how much each party talks about each political topic.
//
// This is the library root. Text normalization and topic counting are pure
// and independent of the presentation modules, so they can be tested without
// touching the chart code.

pub mod config;
pub mod error;
pub mod output;
pub mod text;
pub mod topics;

pub use error::{AnalysisError, Result};
