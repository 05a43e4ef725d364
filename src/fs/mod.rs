//! Filesystem capability traits and the std::fs adapter

mod mode;
mod real;
mod r#trait;

pub use mode::{FileMode, OpenFlags};
pub use r#trait::{File, FileInfo, Fs, Sys};
pub use real::{OsFile, OsFileInfo, OsFs};
