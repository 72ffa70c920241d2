// file: src/models/artifact.rs
// description: file produced by a pipeline stage with its size and content hash
// reference: internal data structures

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub size: u64,
    pub sha256: String,
}

impl Artifact {
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| PipelineError::file_op(path, e))?;
        let mut hasher = Sha256::new();
        let size = io::copy(&mut file, &mut hasher).map_err(|e| PipelineError::file_op(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            size,
            sha256: format!("{:x}", hasher.finalize()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_hash() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blob.bin");
        fs::write(&path, b"abc").unwrap();

        let artifact = Artifact::from_path(&path).unwrap();
        assert_eq!(artifact.size, 3);
        assert_eq!(
            artifact.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = Artifact::from_path(&temp.path().join("nope"));
        assert!(matches!(result, Err(PipelineError::FileOperation { .. })));
    }
}
