// file: src/analysis/mod.rs
// description: documentation review through a hosted file-search service
// reference: Internal module structure

pub mod client;
pub mod credentials;
pub mod knowledge_base;

pub use client::{FileSearchClient, ReviewResponse, StoreFile};
pub use credentials::AnalysisCredentials;
pub use knowledge_base::{DocumentReviewer, IndexedStore, KnowledgeBase};
