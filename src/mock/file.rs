use super::mocker::{MockDefaults, Mocker};
use crate::error::Result;
use crate::fs::{File, FileInfo};
use mockall::mock;
use std::io::SeekFrom;

mock! {
    /// Expectation-recording [`File`].
    pub File {}

    impl File for File {
        fn close(&self) -> Result<()>;
        fn name(&self) -> String;
        fn read(&self, buf: &mut [u8]) -> Result<usize>;
        fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize>;
        fn readdir(&self, count: i32) -> Result<Vec<Box<dyn FileInfo>>>;
        fn readdir_names(&self, count: i32) -> Result<Vec<String>>;
        fn seek(&self, pos: SeekFrom) -> Result<u64>;
        fn stat(&self) -> Result<Box<dyn FileInfo>>;
        fn sync(&self) -> Result<()>;
        fn truncate(&self, size: u64) -> Result<()>;
        fn write(&self, buf: &[u8]) -> Result<usize>;
        fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize>;
        fn write_string(&self, s: &str) -> Result<usize>;
    }
}

impl MockDefaults for MockFile {}

/// Builds [`MockFile`] instances from a list of configurations.
pub type FileMocker = Mocker<MockFile>;

/// Mocker with no expectations; every call on its mocks panics.
pub static NOP_FILE: FileMocker = Mocker::new();

/// Shorthand for `FileMocker::new().mock(configure)`.
pub fn mock_file(configure: impl Fn(&mut MockFile) + Send + Sync + 'static) -> FileMocker {
    FileMocker::new().mock(configure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsError;
    use mockall::predicate::eq;

    #[test]
    fn test_read_callback_fills_buffer() {
        let file = mock_file(|f| {
            f.expect_read().returning(|buf: &mut [u8]| {
                buf[..5].copy_from_slice(b"hello");
                Ok(5)
            });
        })
        .build();

        let mut buf = [0u8; 8];
        assert_eq!(file.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"hello");
    }

    #[test]
    fn test_write_string_literal() {
        let file = mock_file(|f| {
            f.expect_write_string()
                .with(eq("hello"))
                .times(1)
                .return_const(Ok::<_, FsError>(5usize));
        })
        .build();

        assert_eq!(file.write_string("hello").unwrap(), 5);
    }

    #[test]
    fn test_seek_error_passes_through() {
        let file = mock_file(|f| {
            f.expect_seek()
                .with(eq(SeekFrom::Start(3)))
                .return_const(Err::<u64, _>(FsError::other("seek error")));
        })
        .build();

        assert_eq!(
            file.seek(SeekFrom::Start(3)).unwrap_err(),
            FsError::other("seek error")
        );
    }

    #[test]
    #[should_panic]
    fn test_nop_file_panics_on_any_call() {
        let _ = NOP_FILE.build().close();
    }
}
