pub mod engine;
pub mod manifest;

pub use engine::{clean, clean_with, CleanMode, CleanReport, CleanStatus, EntryOutcome};
pub use manifest::Manifest;
