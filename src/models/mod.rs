// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod artifact;
pub mod remote;

pub use artifact::Artifact;
pub use remote::RemoteArchiveRef;
