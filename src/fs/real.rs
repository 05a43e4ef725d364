use super::{File, FileInfo, FileMode, Fs, OpenFlags, Sys};
use crate::error::{FsError, Result};
use std::any::Any;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

/// `Fs` backed by the host filesystem through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl OsFs {
    pub fn new() -> Self {
        Self
    }

    fn open_with(&self, name: &Path, options: &fs::OpenOptions) -> Result<Box<dyn File>> {
        let file = options.open(name).map_err(|e| FsError::from_io(e, name))?;
        Ok(Box::new(OsFile::new(name, file)))
    }
}

impl Fs for OsFs {
    fn create(&self, name: &Path) -> Result<Box<dyn File>> {
        trace!(path = %name.display(), "create");
        self.open_with(name, &OpenFlags::create().to_open_options())
    }

    fn mkdir(&self, name: &Path, perm: FileMode) -> Result<()> {
        trace!(path = %name.display(), mode = %perm, "mkdir");
        dir_builder(perm, false)
            .create(name)
            .map_err(|e| FsError::from_io(e, name))
    }

    fn mkdir_all(&self, path: &Path, perm: FileMode) -> Result<()> {
        trace!(path = %path.display(), mode = %perm, "mkdir_all");
        dir_builder(perm, true)
            .create(path)
            .map_err(|e| FsError::from_io(e, path))
    }

    fn open(&self, name: &Path) -> Result<Box<dyn File>> {
        trace!(path = %name.display(), "open");
        self.open_with(name, &OpenFlags::READ.to_open_options())
    }

    fn open_file(&self, name: &Path, flags: OpenFlags, perm: FileMode) -> Result<Box<dyn File>> {
        trace!(path = %name.display(), ?flags, mode = %perm, "open_file");
        #[allow(unused_mut)]
        let mut options = flags.to_open_options();
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(perm.perm().bits());
        }
        self.open_with(name, &options)
    }

    fn remove(&self, name: &Path) -> Result<()> {
        trace!(path = %name.display(), "remove");
        let meta = fs::symlink_metadata(name).map_err(|e| FsError::from_io(e, name))?;
        let result = if meta.is_dir() {
            fs::remove_dir(name)
        } else {
            fs::remove_file(name)
        };
        result.map_err(|e| FsError::from_io(e, name))
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        trace!(path = %path.display(), "remove_all");
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(FsError::from_io(e, path)),
        };
        let result = if meta.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        result.map_err(|e| FsError::from_io(e, path))
    }

    fn rename(&self, old: &Path, new: &Path) -> Result<()> {
        trace!(old = %old.display(), new = %new.display(), "rename");
        fs::rename(old, new).map_err(|e| {
            // Blame the destination when the source is still there.
            let culprit = if fs::symlink_metadata(old).is_ok() { new } else { old };
            FsError::from_io(e, culprit)
        })
    }

    fn stat(&self, name: &Path) -> Result<Box<dyn FileInfo>> {
        trace!(path = %name.display(), "stat");
        let meta = fs::metadata(name).map_err(|e| FsError::from_io(e, name))?;
        Ok(Box::new(OsFileInfo::new(base_name(name), meta)))
    }

    fn name(&self) -> String {
        "OsFs".to_string()
    }

    #[cfg(unix)]
    fn chmod(&self, name: &Path, mode: FileMode) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        trace!(path = %name.display(), mode = %mode, "chmod");
        fs::set_permissions(name, fs::Permissions::from_mode(mode.perm().bits()))
            .map_err(|e| FsError::from_io(e, name))
    }

    #[cfg(not(unix))]
    fn chmod(&self, _name: &Path, _mode: FileMode) -> Result<()> {
        Err(FsError::Unsupported("chmod"))
    }

    #[cfg(unix)]
    fn chown(&self, name: &Path, uid: u32, gid: u32) -> Result<()> {
        trace!(path = %name.display(), uid, gid, "chown");
        std::os::unix::fs::chown(name, Some(uid), Some(gid)).map_err(|e| FsError::from_io(e, name))
    }

    #[cfg(not(unix))]
    fn chown(&self, _name: &Path, _uid: u32, _gid: u32) -> Result<()> {
        Err(FsError::Unsupported("chown"))
    }

    fn chtimes(&self, name: &Path, atime: SystemTime, mtime: SystemTime) -> Result<()> {
        trace!(path = %name.display(), "chtimes");
        filetime::set_file_times(
            name,
            filetime::FileTime::from_system_time(atime),
            filetime::FileTime::from_system_time(mtime),
        )
        .map_err(|e| FsError::from_io(e, name))
    }
}

fn dir_builder(perm: FileMode, recursive: bool) -> fs::DirBuilder {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(recursive);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(perm.perm().bits());
    }
    #[cfg(not(unix))]
    let _ = perm;
    builder
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// `File` wrapping a `std::fs::File`.
///
/// The directory listing is read once, on the first `readdir*` call, and
/// later pages are served from that snapshot.
#[derive(Debug)]
pub struct OsFile {
    path: PathBuf,
    handle: RwLock<Option<fs::File>>,
    listing: Mutex<Option<DirListing>>,
}

/// Sorted entry names of a directory and how many were already returned.
#[derive(Debug)]
struct DirListing {
    names: Vec<OsString>,
    cursor: usize,
}

impl DirListing {
    fn read(path: &Path) -> Result<Self> {
        let mut names = fs::read_dir(path)
            .and_then(|iter| {
                iter.map(|entry| entry.map(|e| e.file_name()))
                    .collect::<std::io::Result<Vec<_>>>()
            })
            .map_err(|e| FsError::from_io(e, path))?;
        names.sort();
        Ok(Self { names, cursor: 0 })
    }
}

impl OsFile {
    pub fn new(path: impl Into<PathBuf>, file: fs::File) -> Self {
        Self {
            path: path.into(),
            handle: RwLock::new(Some(file)),
            listing: Mutex::new(None),
        }
    }

    fn with_handle<T>(&self, op: impl FnOnce(&fs::File) -> std::io::Result<T>) -> Result<T> {
        let guard = self.handle.read().unwrap_or_else(PoisonError::into_inner);
        let file = guard.as_ref().ok_or(FsError::Closed)?;
        op(file).map_err(|e| FsError::from_io(e, &self.path))
    }

    /// Next page of the directory snapshot.
    ///
    /// `load` turns a name into an item, or `None` to leave it out. The
    /// cursor only moves once the whole page was loaded.
    fn next_page<T>(&self, count: i32, mut load: impl FnMut(&OsStr) -> Result<Option<T>>) -> Result<Vec<T>> {
        self.with_handle(|_| Ok(()))?;

        let mut guard = self.listing.lock().unwrap_or_else(PoisonError::into_inner);
        let listing = match guard.take() {
            Some(listing) => listing,
            None => DirListing::read(&self.path)?,
        };
        let listing = guard.insert(listing);

        let remaining = &listing.names[listing.cursor..];
        if count > 0 && remaining.is_empty() {
            return Err(FsError::Eof);
        }
        let take = if count <= 0 {
            remaining.len()
        } else {
            remaining.len().min(count as usize)
        };

        let mut page = Vec::with_capacity(take);
        for name in &remaining[..take] {
            if let Some(item) = load(name.as_os_str())? {
                page.push(item);
            }
        }
        listing.cursor += take;
        Ok(page)
    }
}

impl File for OsFile {
    fn close(&self) -> Result<()> {
        trace!(path = %self.path.display(), "close");
        let mut guard = self.handle.write().unwrap_or_else(PoisonError::into_inner);
        match guard.take() {
            Some(file) => {
                drop(file);
                Ok(())
            }
            None => Err(FsError::Closed),
        }
    }

    fn name(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let n = self.with_handle(|mut file| file.read(buf))?;
        if n == 0 && !buf.is_empty() {
            return Err(FsError::Eof);
        }
        Ok(n)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        self.with_handle(|file| read_at(file, buf, offset))
    }

    fn readdir(&self, count: i32) -> Result<Vec<Box<dyn FileInfo>>> {
        trace!(path = %self.path.display(), count, "readdir");
        self.next_page(count, |name| {
            let path = self.path.join(name);
            match fs::symlink_metadata(&path) {
                Ok(meta) => {
                    let info: Box<dyn FileInfo> =
                        Box::new(OsFileInfo::new(name.to_string_lossy().into_owned(), meta));
                    Ok(Some(info))
                }
                // Removed since the listing was taken.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(FsError::from_io(e, &path)),
            }
        })
    }

    fn readdir_names(&self, count: i32) -> Result<Vec<String>> {
        trace!(path = %self.path.display(), count, "readdir_names");
        self.next_page(count, |name| Ok(Some(name.to_string_lossy().into_owned())))
    }

    fn seek(&self, pos: SeekFrom) -> Result<u64> {
        self.with_handle(|mut file| file.seek(pos))
    }

    fn stat(&self) -> Result<Box<dyn FileInfo>> {
        let meta = self.with_handle(|file| file.metadata())?;
        Ok(Box::new(OsFileInfo::new(base_name(&self.path), meta)))
    }

    fn sync(&self) -> Result<()> {
        self.with_handle(|file| file.sync_all())
    }

    fn truncate(&self, size: u64) -> Result<()> {
        self.with_handle(|file| file.set_len(size))
    }

    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.with_handle(|mut file| file.write(buf))
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize> {
        self.with_handle(|file| write_at(file, buf, offset))
    }

    fn write_string(&self, s: &str) -> Result<usize> {
        self.write(s.as_bytes())
    }
}

#[cfg(unix)]
fn read_at(file: &fs::File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
    std::os::unix::fs::FileExt::read_at(file, buf, offset)
}

#[cfg(windows)]
fn read_at(file: &fs::File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
    std::os::windows::fs::FileExt::seek_read(file, buf, offset)
}

#[cfg(unix)]
fn write_at(file: &fs::File, buf: &[u8], offset: u64) -> std::io::Result<usize> {
    std::os::unix::fs::FileExt::write_at(file, buf, offset)
}

#[cfg(windows)]
fn write_at(file: &fs::File, buf: &[u8], offset: u64) -> std::io::Result<usize> {
    std::os::windows::fs::FileExt::seek_write(file, buf, offset)
}

/// `FileInfo` captured from `std::fs::Metadata`.
#[derive(Debug, Clone)]
pub struct OsFileInfo {
    name: String,
    metadata: Arc<fs::Metadata>,
}

impl OsFileInfo {
    pub fn new(name: impl Into<String>, metadata: fs::Metadata) -> Self {
        Self {
            name: name.into(),
            metadata: Arc::new(metadata),
        }
    }

    pub fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }
}

impl FileInfo for OsFileInfo {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> u64 {
        self.metadata.len()
    }

    #[cfg(unix)]
    fn mode(&self) -> FileMode {
        use std::os::unix::fs::MetadataExt;
        FileMode::from(self.metadata.mode())
    }

    #[cfg(not(unix))]
    fn mode(&self) -> FileMode {
        let kind = if self.metadata.is_dir() {
            FileMode::S_IFDIR
        } else {
            FileMode::S_IFREG
        };
        let perm = if self.metadata.permissions().readonly() {
            FileMode::from(0o444_u32)
        } else {
            FileMode::from(0o666_u32)
        };
        kind | perm
    }

    fn mod_time(&self) -> SystemTime {
        self.metadata.modified().unwrap_or(UNIX_EPOCH)
    }

    fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }

    fn sys(&self) -> Sys {
        let metadata: Arc<dyn Any + Send + Sync> = self.metadata.clone();
        Some(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir(base.join("subdir")).unwrap();
        fs::File::create(base.join("test.txt"))
            .unwrap()
            .write_all(b"hello world")
            .unwrap();
        fs::File::create(base.join("subdir/nested.txt"))
            .unwrap()
            .write_all(b"nested content")
            .unwrap();

        dir
    }

    #[test]
    fn test_stat() {
        let temp = create_test_dir();
        let fs = OsFs::new();

        let info = fs.stat(&temp.path().join("test.txt")).unwrap();
        assert_eq!(info.name(), "test.txt");
        assert_eq!(info.size(), 11);
        assert!(!info.is_dir());

        let info = fs.stat(&temp.path().join("subdir")).unwrap();
        assert!(info.is_dir());
        assert!(info.mode().is_dir() || cfg!(not(unix)));
    }

    #[test]
    fn test_stat_missing() {
        let temp = create_test_dir();
        let path = temp.path().join("nonexistent");

        let err = OsFs::new().stat(&path).err().unwrap();
        assert_eq!(err, FsError::NotFound(path));
    }

    #[test]
    fn test_sys_exposes_metadata() {
        let temp = create_test_dir();
        let info = OsFs::new().stat(&temp.path().join("test.txt")).unwrap();

        let sys = info.sys().unwrap();
        let meta = sys.downcast_ref::<fs::Metadata>().unwrap();
        assert_eq!(meta.len(), 11);
    }

    #[test]
    fn test_create_write_read() {
        let temp = create_test_dir();
        let fs = OsFs::new();
        let path = temp.path().join("new.txt");

        let file = fs.create(&path).unwrap();
        assert_eq!(file.write_string("hello").unwrap(), 5);
        assert_eq!(file.write_at(b"J", 0).unwrap(), 1);
        file.close().unwrap();

        let file = fs.open(&path).unwrap();
        let mut buf = [0u8; 16];
        let n = file.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"Jello");
        assert_eq!(file.read(&mut buf).unwrap_err(), FsError::Eof);

        let mut buf = [0u8; 3];
        assert_eq!(file.read_at(&mut buf, 2).unwrap(), 3);
        assert_eq!(&buf, b"llo");
    }

    #[test]
    fn test_seek_and_truncate() {
        let temp = create_test_dir();
        let fs = OsFs::new();
        let path = temp.path().join("test.txt");

        let file = fs
            .open_file(&path, OpenFlags::READ | OpenFlags::WRITE, FileMode::from(0o644_u32))
            .unwrap();
        assert_eq!(file.seek(SeekFrom::End(-5)).unwrap(), 6);
        file.truncate(5).unwrap();
        file.sync().unwrap();

        assert_eq!(file.stat().unwrap().size(), 5);
    }

    #[test]
    fn test_open_file_create_new_conflict() {
        let temp = create_test_dir();
        let path = temp.path().join("test.txt");

        let err = OsFs::new()
            .open_file(
                &path,
                OpenFlags::WRITE | OpenFlags::CREATE_NEW,
                FileMode::from(0o644_u32),
            )
            .err()
            .unwrap();
        assert_eq!(err, FsError::AlreadyExists(path));
    }

    #[test]
    fn test_closed_file_rejects_calls() {
        let temp = create_test_dir();
        let file = OsFs::new().open(&temp.path().join("test.txt")).unwrap();

        file.close().unwrap();

        assert_eq!(file.close().unwrap_err(), FsError::Closed);
        assert_eq!(file.sync().unwrap_err(), FsError::Closed);
        assert_eq!(file.readdir_names(0).unwrap_err(), FsError::Closed);
    }

    #[test]
    fn test_readdir_all() {
        let temp = create_test_dir();
        let dir = OsFs::new().open(temp.path()).unwrap();

        let names: Vec<String> = dir.readdir(0).unwrap().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["subdir".to_string(), "test.txt".to_string()]);

        // The cursor is exhausted; listing everything again yields nothing.
        assert!(dir.readdir(-1).unwrap().is_empty());
    }

    #[test]
    fn test_readdir_names_paged() {
        let temp = create_test_dir();
        let dir = OsFs::new().open(temp.path()).unwrap();

        assert_eq!(dir.readdir_names(1).unwrap(), vec!["subdir".to_string()]);
        assert_eq!(dir.readdir_names(5).unwrap(), vec!["test.txt".to_string()]);
        assert_eq!(dir.readdir_names(1).unwrap_err(), FsError::Eof);
    }

    #[test]
    fn test_mkdir_rename_remove() {
        let temp = create_test_dir();
        let fs = OsFs::new();
        let nested = temp.path().join("a/b/c");

        assert!(fs.mkdir(&nested, FileMode::from(0o755_u32)).is_err());
        fs.mkdir_all(&nested, FileMode::from(0o755_u32)).unwrap();
        assert!(fs.stat(&nested).unwrap().is_dir());

        let moved = temp.path().join("moved.txt");
        fs.rename(&temp.path().join("test.txt"), &moved).unwrap();
        fs.remove(&moved).unwrap();
        fs.remove(&nested).unwrap();
        assert!(matches!(fs.stat(&moved), Err(FsError::NotFound(_))));

        fs.remove_all(&temp.path().join("a")).unwrap();
        fs.remove_all(&temp.path().join("a")).unwrap();
        assert!(matches!(fs.stat(&temp.path().join("a")), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_chtimes() {
        let temp = create_test_dir();
        let fs = OsFs::new();
        let path = temp.path().join("test.txt");
        let when = UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);

        fs.chtimes(&path, when, when).unwrap();

        assert_eq!(fs.stat(&path).unwrap().mod_time(), when);
    }

    #[cfg(unix)]
    #[test]
    fn test_chmod() {
        let temp = create_test_dir();
        let fs = OsFs::new();
        let path = temp.path().join("test.txt");

        fs.chmod(&path, FileMode::from(0o600_u32)).unwrap();

        let mode = fs.stat(&path).unwrap().mode();
        assert_eq!(mode.perm(), FileMode::from(0o600_u32));
        assert!(mode.is_regular());
    }

    #[test]
    fn test_readdir_names_pages_survive_removal() {
        let temp = TempDir::new().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(temp.path().join(name), name).unwrap();
        }
        let dir = OsFs::new().open(temp.path()).unwrap();

        assert_eq!(dir.readdir_names(1).unwrap(), vec!["a".to_string()]);
        fs::remove_file(temp.path().join("a")).unwrap();

        assert_eq!(dir.readdir_names(1).unwrap(), vec!["b".to_string()]);
        assert_eq!(dir.readdir_names(1).unwrap(), vec!["c".to_string()]);
        assert_eq!(dir.readdir_names(1).unwrap_err(), FsError::Eof);
    }

    #[test]
    fn test_readdir_skips_entries_removed_after_listing() {
        let temp = TempDir::new().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(temp.path().join(name), name).unwrap();
        }
        let dir = OsFs::new().open(temp.path()).unwrap();

        let first: Vec<String> = dir.readdir(1).unwrap().iter().map(|i| i.name()).collect();
        assert_eq!(first, vec!["a".to_string()]);
        fs::remove_file(temp.path().join("b")).unwrap();
        fs::write(temp.path().join("d"), "d").unwrap();

        let rest: Vec<String> = dir.readdir(0).unwrap().iter().map(|i| i.name()).collect();
        assert_eq!(rest, vec!["c".to_string()]);
    }

    #[test]
    fn test_rename_missing_destination_dir_names_destination() {
        let temp = create_test_dir();
        let old = temp.path().join("test.txt");
        let new = temp.path().join("missing/moved.txt");

        let err = OsFs::new().rename(&old, &new).unwrap_err();

        assert_eq!(err, FsError::NotFound(new));
    }

    #[test]
    fn test_rename_missing_source_names_source() {
        let temp = create_test_dir();
        let old = temp.path().join("gone.txt");

        let err = OsFs::new().rename(&old, &temp.path().join("moved.txt")).unwrap_err();

        assert_eq!(err, FsError::NotFound(old));
    }

    #[test]
    fn test_name() {
        assert_eq!(OsFs::new().name(), "OsFs");
    }
}
