pub mod candidate;
pub mod stats;

pub use candidate::{Candidate, Provenance, Resolution};
pub use stats::{PaginationOutcome, RenderStats};
