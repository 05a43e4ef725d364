//! Filesystem, file handle and file metadata traits

use super::{FileMode, OpenFlags};
use crate::error::Result;
use std::any::Any;
use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

/// Opaque, implementation-specific metadata payload.
pub type Sys = Option<Arc<dyn Any + Send + Sync>>;

/// Abstraction over a filesystem.
pub trait Fs: Send + Sync {
    /// Creates a file, truncating it if it exists.
    fn create(&self, name: &Path) -> Result<Box<dyn File>>;

    fn mkdir(&self, name: &Path, perm: FileMode) -> Result<()>;

    /// Creates a directory and every missing parent.
    fn mkdir_all(&self, path: &Path, perm: FileMode) -> Result<()>;

    /// Opens a file for reading.
    fn open(&self, name: &Path) -> Result<Box<dyn File>>;

    fn open_file(&self, name: &Path, flags: OpenFlags, perm: FileMode) -> Result<Box<dyn File>>;

    /// Removes a file or an empty directory.
    fn remove(&self, name: &Path) -> Result<()>;

    /// Removes a path and everything under it. A missing path is not an error.
    fn remove_all(&self, path: &Path) -> Result<()>;

    fn rename(&self, old: &Path, new: &Path) -> Result<()>;

    fn stat(&self, name: &Path) -> Result<Box<dyn FileInfo>>;

    /// Name of this filesystem implementation.
    fn name(&self) -> String;

    fn chmod(&self, name: &Path, mode: FileMode) -> Result<()>;

    fn chown(&self, name: &Path, uid: u32, gid: u32) -> Result<()>;

    /// Changes the access and modification times of a file.
    fn chtimes(&self, name: &Path, atime: SystemTime, mtime: SystemTime) -> Result<()>;
}

/// An open file or directory handle.
pub trait File: Send + Sync {
    fn close(&self) -> Result<()>;

    fn name(&self) -> String;

    fn read(&self, buf: &mut [u8]) -> Result<usize>;

    /// Reads at `offset` without moving the cursor.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize>;

    /// Lists directory entries.
    ///
    /// `count <= 0` returns every remaining entry. `count > 0` returns at most
    /// `count` entries and fails with `FsError::Eof` once nothing is left.
    fn readdir(&self, count: i32) -> Result<Vec<Box<dyn FileInfo>>>;

    /// Same paging rules as [`File::readdir`], names only.
    fn readdir_names(&self, count: i32) -> Result<Vec<String>>;

    fn seek(&self, pos: SeekFrom) -> Result<u64>;

    fn stat(&self) -> Result<Box<dyn FileInfo>>;

    fn sync(&self) -> Result<()>;

    fn truncate(&self, size: u64) -> Result<()>;

    fn write(&self, buf: &[u8]) -> Result<usize>;

    /// Writes at `offset` without moving the cursor.
    fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize>;

    fn write_string(&self, s: &str) -> Result<usize>;
}

/// Metadata describing a file.
pub trait FileInfo: Send + Sync {
    /// Base name of the file.
    fn name(&self) -> String;

    /// Length in bytes.
    fn size(&self) -> u64;

    fn mode(&self) -> FileMode;

    fn mod_time(&self) -> SystemTime;

    fn is_dir(&self) -> bool;

    /// Underlying data source, if any.
    fn sys(&self) -> Sys;
}

macro_rules! forward_fs {
    ($($ptr:ident),*) => {$(
        impl<T: Fs + ?Sized> Fs for $ptr<T> {
            fn create(&self, name: &Path) -> Result<Box<dyn File>> {
                (**self).create(name)
            }

            fn mkdir(&self, name: &Path, perm: FileMode) -> Result<()> {
                (**self).mkdir(name, perm)
            }

            fn mkdir_all(&self, path: &Path, perm: FileMode) -> Result<()> {
                (**self).mkdir_all(path, perm)
            }

            fn open(&self, name: &Path) -> Result<Box<dyn File>> {
                (**self).open(name)
            }

            fn open_file(&self, name: &Path, flags: OpenFlags, perm: FileMode) -> Result<Box<dyn File>> {
                (**self).open_file(name, flags, perm)
            }

            fn remove(&self, name: &Path) -> Result<()> {
                (**self).remove(name)
            }

            fn remove_all(&self, path: &Path) -> Result<()> {
                (**self).remove_all(path)
            }

            fn rename(&self, old: &Path, new: &Path) -> Result<()> {
                (**self).rename(old, new)
            }

            fn stat(&self, name: &Path) -> Result<Box<dyn FileInfo>> {
                (**self).stat(name)
            }

            fn name(&self) -> String {
                (**self).name()
            }

            fn chmod(&self, name: &Path, mode: FileMode) -> Result<()> {
                (**self).chmod(name, mode)
            }

            fn chown(&self, name: &Path, uid: u32, gid: u32) -> Result<()> {
                (**self).chown(name, uid, gid)
            }

            fn chtimes(&self, name: &Path, atime: SystemTime, mtime: SystemTime) -> Result<()> {
                (**self).chtimes(name, atime, mtime)
            }
        }
    )*};
}

macro_rules! forward_file {
    ($($ptr:ident),*) => {$(
        impl<T: File + ?Sized> File for $ptr<T> {
            fn close(&self) -> Result<()> {
                (**self).close()
            }

            fn name(&self) -> String {
                (**self).name()
            }

            fn read(&self, buf: &mut [u8]) -> Result<usize> {
                (**self).read(buf)
            }

            fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
                (**self).read_at(buf, offset)
            }

            fn readdir(&self, count: i32) -> Result<Vec<Box<dyn FileInfo>>> {
                (**self).readdir(count)
            }

            fn readdir_names(&self, count: i32) -> Result<Vec<String>> {
                (**self).readdir_names(count)
            }

            fn seek(&self, pos: SeekFrom) -> Result<u64> {
                (**self).seek(pos)
            }

            fn stat(&self) -> Result<Box<dyn FileInfo>> {
                (**self).stat()
            }

            fn sync(&self) -> Result<()> {
                (**self).sync()
            }

            fn truncate(&self, size: u64) -> Result<()> {
                (**self).truncate(size)
            }

            fn write(&self, buf: &[u8]) -> Result<usize> {
                (**self).write(buf)
            }

            fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize> {
                (**self).write_at(buf, offset)
            }

            fn write_string(&self, s: &str) -> Result<usize> {
                (**self).write_string(s)
            }
        }
    )*};
}

macro_rules! forward_file_info {
    ($($ptr:ident),*) => {$(
        impl<T: FileInfo + ?Sized> FileInfo for $ptr<T> {
            fn name(&self) -> String {
                (**self).name()
            }

            fn size(&self) -> u64 {
                (**self).size()
            }

            fn mode(&self) -> FileMode {
                (**self).mode()
            }

            fn mod_time(&self) -> SystemTime {
                (**self).mod_time()
            }

            fn is_dir(&self) -> bool {
                (**self).is_dir()
            }

            fn sys(&self) -> Sys {
                (**self).sys()
            }
        }
    )*};
}

forward_fs!(Box, Arc);
forward_file!(Box, Arc);
forward_file_info!(Box, Arc);

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    struct StaticInfo;

    impl FileInfo for StaticInfo {
        fn name(&self) -> String {
            "static.txt".to_string()
        }

        fn size(&self) -> u64 {
            42
        }

        fn mode(&self) -> FileMode {
            FileMode::from(0o100644_u32)
        }

        fn mod_time(&self) -> SystemTime {
            UNIX_EPOCH
        }

        fn is_dir(&self) -> bool {
            false
        }

        fn sys(&self) -> Sys {
            None
        }
    }

    #[test]
    fn test_box_forwards_file_info() {
        let info: Box<dyn FileInfo> = Box::new(StaticInfo);

        assert_eq!(info.name(), "static.txt");
        assert_eq!(info.size(), 42);
        assert!(info.mode().is_regular());
        assert_eq!(info.mod_time(), UNIX_EPOCH);
        assert!(!info.is_dir());
        assert!(info.sys().is_none());
    }

    #[test]
    fn test_arc_forwards_file_info() {
        let info: Arc<dyn FileInfo> = Arc::new(StaticInfo);
        let shared = Arc::clone(&info);

        assert_eq!(shared.size(), info.size());
        assert_eq!(shared.mode().perm(), FileMode::from(0o644_u32));
    }
}
