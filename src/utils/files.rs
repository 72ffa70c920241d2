// file: src/utils/files.rs
// description: permissions for files published from temporary staging
// reference: https://docs.rs/tempfile

use std::fs::File;
use std::io;

/// Mode given to archives once they are moved into place.
pub const PUBLISHED_MODE: u32 = 0o644;

/// Staging files are created owner-only; widen them to the usual `rw-r--r--`.
#[cfg(unix)]
pub fn set_published_permissions(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(PUBLISHED_MODE))
}

#[cfg(not(unix))]
pub fn set_published_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_staging_file_becomes_world_readable() {
        let staging = tempfile::NamedTempFile::new().unwrap();
        set_published_permissions(staging.as_file()).unwrap();

        let mode = staging.as_file().metadata().unwrap().permissions().mode();
        assert_eq!(mode & 0o777, PUBLISHED_MODE);
    }
}
