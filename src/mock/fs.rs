use super::mocker::{MockDefaults, Mocker};
use crate::config;
use crate::error::Result;
use crate::fs::{File, FileInfo, FileMode, Fs, OpenFlags};
use mockall::mock;
use std::path::Path;
use std::time::SystemTime;

mock! {
    /// Expectation-recording [`Fs`].
    pub Fs {}

    impl Fs for Fs {
        fn create(&self, name: &Path) -> Result<Box<dyn File>>;
        fn mkdir(&self, name: &Path, perm: FileMode) -> Result<()>;
        fn mkdir_all(&self, path: &Path, perm: FileMode) -> Result<()>;
        fn open(&self, name: &Path) -> Result<Box<dyn File>>;
        fn open_file(&self, name: &Path, flags: OpenFlags, perm: FileMode) -> Result<Box<dyn File>>;
        fn remove(&self, name: &Path) -> Result<()>;
        fn remove_all(&self, path: &Path) -> Result<()>;
        fn rename(&self, old: &Path, new: &Path) -> Result<()>;
        fn stat(&self, name: &Path) -> Result<Box<dyn FileInfo>>;
        fn name(&self) -> String;
        fn chmod(&self, name: &Path, mode: FileMode) -> Result<()>;
        fn chown(&self, name: &Path, uid: u32, gid: u32) -> Result<()>;
        fn chtimes(&self, name: &Path, atime: SystemTime, mtime: SystemTime) -> Result<()>;
    }
}

impl MockDefaults for MockFs {
    /// `name()` is answered any number of times, after whatever `name`
    /// expectations the configurations registered.
    fn apply_defaults(&mut self) {
        self.expect_name().return_const(config::fs_name());
    }
}

/// Builds [`MockFs`] instances from a list of configurations.
pub type FsMocker = Mocker<MockFs>;

/// Mocker with no expectations besides `name()`.
pub static NOP_FS: FsMocker = Mocker::new();

#[deprecated(note = "use NOP_FS instead")]
pub static NO_MOCK_FS: FsMocker = Mocker::new();

/// Shorthand for `FsMocker::new().mock(configure)`.
pub fn mock_fs(configure: impl Fn(&mut MockFs) + Send + Sync + 'static) -> FsMocker {
    FsMocker::new().mock(configure)
}
