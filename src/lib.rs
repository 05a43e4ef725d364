//! fsmock - test doubles for filesystem code
//!
//! Code that touches the filesystem through the [`Fs`], [`File`] and
//! [`FileInfo`] traits can be tested against three kinds of doubles:
//!
//! - **Mocks**: [`MockFs`], [`MockFile`] and [`MockFileInfo`] record
//!   expectations (arguments, call counts, return values) and verify them
//!   when dropped. [`Mocker`] bundles configurations so a mock can be
//!   described once in a table of test cases and built per case.
//! - **Overrides**: [`override_fs`], [`override_file`] and
//!   [`override_file_info`] wrap any implementation and replace only the
//!   methods a test cares about; everything else goes to the wrapped value.
//! - **The real thing**: [`OsFs`] forwards to `std::fs`, for tests that want
//!   a temp directory with a single failing call injected.
//!
//! # Example Usage
//!
//! ```
//! use fsmock::mockall::predicate::eq;
//! use fsmock::{mock_fs, override_fs, Fs, FsCallbacks, FsError};
//! use std::path::Path;
//!
//! let upstream = mock_fs(|fs| {
//!     fs.expect_remove()
//!         .with(eq(Path::new("keep.txt")))
//!         .times(1)
//!         .returning(|_| Ok(()));
//! })
//! .build();
//!
//! let fs = override_fs(
//!     upstream,
//!     FsCallbacks::new().on_rename(|_, _| Err(FsError::other("rename failed"))),
//! );
//!
//! assert_eq!(fs.remove(Path::new("keep.txt")), Ok(()));
//! assert!(fs.rename(Path::new("a"), Path::new("b")).is_err());
//! ```
//!
//! # Project Structure
//!
//! - [`fs`]: capability traits, mode bits and the `std::fs` adapter
//! - [`mock`]: `mockall` mocks and the [`Mocker`] builder
//! - [`callbacks`]: override-with-fallback wrappers
//! - [`config`]: `FSMOCK_*` environment settings
//! - [`util`]: logging setup

// Public modules
pub mod callbacks;
pub mod config;
pub mod error;
pub mod fs;
pub mod mock;
pub mod util;

pub use mockall;

// Re-export key types for convenient access
pub use callbacks::{
    override_file, override_file_info, override_fs, FileCallbacks, FileInfoCallbacks, FileInfoOverride,
    FileOverride, FsCallbacks, FsOverride,
};
#[allow(deprecated)]
pub use callbacks::{wrap_file, wrap_fs, WrappedFile, WrappedFs};
pub use config::{ConfigError, FsMockConfig};
pub use error::{FsError, Result};
pub use fs::{File, FileInfo, FileMode, Fs, OpenFlags, OsFile, OsFileInfo, OsFs, Sys};
pub use mock::{
    mock_file, mock_file_info, mock_fs, FileInfoMocker, FileMocker, FsMocker, MockDefaults, MockFile,
    MockFileInfo, MockFs, Mocker, NOP_FILE, NOP_FILE_INFO, NOP_FS,
};
#[allow(deprecated)]
pub use mock::{NO_MOCK_FILE_INFO, NO_MOCK_FS};
pub use util::{init_default, init_from_env, init_logging, init_test_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
