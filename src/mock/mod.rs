//! Expectation-recording mocks
//!
//! The mocks are generated by `mockall`; register expectations with
//! `expect_<method>()` and verify them by letting the mock go out of scope.

mod file;
mod file_info;
mod fs;
mod mocker;

pub use file::{mock_file, FileMocker, MockFile, NOP_FILE};
#[allow(deprecated)]
pub use file_info::NO_MOCK_FILE_INFO;
pub use file_info::{mock_file_info, FileInfoMocker, MockFileInfo, NOP_FILE_INFO};
#[allow(deprecated)]
pub use fs::NO_MOCK_FS;
pub use fs::{mock_fs, FsMocker, MockFs, NOP_FS};
pub use mocker::{MockDefaults, Mocker};
