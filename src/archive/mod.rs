// file: src/archive/mod.rs
// description: Archive extraction, building and cleaning module exports
// reference: Internal module structure

pub mod builder;
pub mod cleaner;
pub mod extractor;
pub mod filter;

pub use builder::{ArchiveBuilder, BuildReport};
pub use cleaner::{clean_archive, default_cleaned_path};
pub use extractor::{ExtractionReport, SelectiveExtractor, strip_top_level};
pub use filter::SuffixFilter;
