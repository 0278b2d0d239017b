// Text normalization: raw manifesto text to comparable tokens.

pub mod normalize;

pub use normalize::{normalize, read_document};
