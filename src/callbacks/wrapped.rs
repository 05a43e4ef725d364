//! Names from before the override API was introduced.
#![allow(deprecated)]

use super::file::{override_file, FileCallbacks, FileOverride};
use super::fs::{override_fs, FsCallbacks, FsOverride};
use crate::fs::{File, Fs};

#[deprecated(note = "use FsCallbacks instead")]
pub type WrappedFs = FsCallbacks;

#[deprecated(note = "use FileCallbacks instead")]
pub type WrappedFile = FileCallbacks;

#[deprecated(note = "use override_fs instead")]
pub fn wrap_fs(fs: impl Fs + 'static, callbacks: WrappedFs) -> FsOverride {
    override_fs(fs, callbacks)
}

#[deprecated(note = "use override_file instead")]
pub fn wrap_file(file: impl File + 'static, callbacks: WrappedFile) -> FileOverride {
    override_file(file, callbacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsError;
    use crate::mock::{mock_file, NOP_FS};
    use std::path::Path;

    #[test]
    fn test_wrap_fs_matches_override_fs() {
        let fs = wrap_fs(
            NOP_FS.build(),
            WrappedFs::new().on_mkdir(|_, _| Err(FsError::other("mkdir"))),
        );

        assert_eq!(
            fs.mkdir(Path::new("dir"), 0o755u32.into()),
            Err(FsError::other("mkdir"))
        );
        assert_eq!(fs.name(), crate::config::fs_name());
    }

    #[test]
    fn test_wrap_file_forwards_unset_slots() {
        let file = wrap_file(
            mock_file(|f| {
                f.expect_truncate().times(1).returning(|_| Ok(()));
            })
            .build(),
            WrappedFile::default(),
        );

        assert_eq!(file.truncate(0), Ok(()));
    }
}
