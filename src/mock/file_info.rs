use super::mocker::{MockDefaults, Mocker};
use crate::fs::{FileInfo, FileMode, Sys};
use mockall::mock;
use std::time::SystemTime;

mock! {
    /// Expectation-recording [`FileInfo`].
    ///
    /// `size` and `mode` accept any value convertible into their return type,
    /// so `return_const(10u32)` and `return_const(0o644u32)` work as well as
    /// `10u64` and a `FileMode`.
    pub FileInfo {}

    impl FileInfo for FileInfo {
        fn name(&self) -> String;
        fn size(&self) -> u64;
        fn mode(&self) -> FileMode;
        fn mod_time(&self) -> SystemTime;
        fn is_dir(&self) -> bool;
        fn sys(&self) -> Sys;
    }
}

impl MockDefaults for MockFileInfo {}

/// Builds [`MockFileInfo`] instances from a list of configurations.
pub type FileInfoMocker = Mocker<MockFileInfo>;

/// Mocker with no expectations; every call on its mocks panics.
pub static NOP_FILE_INFO: FileInfoMocker = Mocker::new();

#[deprecated(note = "use NOP_FILE_INFO instead")]
pub static NO_MOCK_FILE_INFO: FileInfoMocker = Mocker::new();

/// Shorthand for `FileInfoMocker::new().mock(configure)`.
pub fn mock_file_info(configure: impl Fn(&mut MockFileInfo) + Send + Sync + 'static) -> FileInfoMocker {
    FileInfoMocker::new().mock(configure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_accepts_narrow_integer() {
        let info = mock_file_info(|fi| {
            fi.expect_size().return_const(10u32);
        })
        .build();

        assert_eq!(info.size(), 10u64);
    }

    #[test]
    fn test_mode_accepts_plain_bits() {
        let info = mock_file_info(|fi| {
            fi.expect_mode().return_const(0o755u32);
        })
        .build();

        assert_eq!(info.mode(), FileMode::from(0o755u32));
    }

    #[test]
    #[should_panic]
    fn test_is_dir_without_return_value_panics() {
        let info = mock_file_info(|fi| {
            let _ = fi.expect_is_dir();
        })
        .build();

        info.is_dir();
    }
}
