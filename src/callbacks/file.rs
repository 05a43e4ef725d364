use crate::error::Result;
use crate::fs::{File, FileInfo};
use std::fmt;
use std::io::SeekFrom;
use std::sync::Arc;
use tracing::debug;

pub type CloseFn = Box<dyn Fn() -> Result<()> + Send + Sync>;
pub type NameFn = Box<dyn Fn() -> String + Send + Sync>;
pub type ReadFn = Box<dyn Fn(&mut [u8]) -> Result<usize> + Send + Sync>;
pub type ReadAtFn = Box<dyn Fn(&mut [u8], u64) -> Result<usize> + Send + Sync>;
pub type ReaddirFn = Box<dyn Fn(i32) -> Result<Vec<Box<dyn FileInfo>>> + Send + Sync>;
pub type ReaddirNamesFn = Box<dyn Fn(i32) -> Result<Vec<String>> + Send + Sync>;
pub type SeekFn = Box<dyn Fn(SeekFrom) -> Result<u64> + Send + Sync>;
pub type StatFn = Box<dyn Fn() -> Result<Box<dyn FileInfo>> + Send + Sync>;
pub type SyncFn = Box<dyn Fn() -> Result<()> + Send + Sync>;
pub type TruncateFn = Box<dyn Fn(u64) -> Result<()> + Send + Sync>;
pub type WriteFn = Box<dyn Fn(&[u8]) -> Result<usize> + Send + Sync>;
pub type WriteAtFn = Box<dyn Fn(&[u8], u64) -> Result<usize> + Send + Sync>;
pub type WriteStringFn = Box<dyn Fn(&str) -> Result<usize> + Send + Sync>;

/// Replacements for [`File`] methods.
#[derive(Default)]
pub struct FileCallbacks {
    pub close: Option<CloseFn>,
    pub name: Option<NameFn>,
    pub read: Option<ReadFn>,
    pub read_at: Option<ReadAtFn>,
    pub readdir: Option<ReaddirFn>,
    pub readdir_names: Option<ReaddirNamesFn>,
    pub seek: Option<SeekFn>,
    pub stat: Option<StatFn>,
    pub sync: Option<SyncFn>,
    pub truncate: Option<TruncateFn>,
    pub write: Option<WriteFn>,
    pub write_at: Option<WriteAtFn>,
    pub write_string: Option<WriteStringFn>,
}

impl FileCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_close(mut self, f: impl Fn() -> Result<()> + Send + Sync + 'static) -> Self {
        self.close = Some(Box::new(f));
        self
    }

    pub fn on_name(mut self, f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.name = Some(Box::new(f));
        self
    }

    pub fn on_read(mut self, f: impl Fn(&mut [u8]) -> Result<usize> + Send + Sync + 'static) -> Self {
        self.read = Some(Box::new(f));
        self
    }

    pub fn on_read_at(mut self, f: impl Fn(&mut [u8], u64) -> Result<usize> + Send + Sync + 'static) -> Self {
        self.read_at = Some(Box::new(f));
        self
    }

    pub fn on_readdir(
        mut self,
        f: impl Fn(i32) -> Result<Vec<Box<dyn FileInfo>>> + Send + Sync + 'static,
    ) -> Self {
        self.readdir = Some(Box::new(f));
        self
    }

    pub fn on_readdir_names(mut self, f: impl Fn(i32) -> Result<Vec<String>> + Send + Sync + 'static) -> Self {
        self.readdir_names = Some(Box::new(f));
        self
    }

    pub fn on_seek(mut self, f: impl Fn(SeekFrom) -> Result<u64> + Send + Sync + 'static) -> Self {
        self.seek = Some(Box::new(f));
        self
    }

    pub fn on_stat(mut self, f: impl Fn() -> Result<Box<dyn FileInfo>> + Send + Sync + 'static) -> Self {
        self.stat = Some(Box::new(f));
        self
    }

    pub fn on_sync(mut self, f: impl Fn() -> Result<()> + Send + Sync + 'static) -> Self {
        self.sync = Some(Box::new(f));
        self
    }

    pub fn on_truncate(mut self, f: impl Fn(u64) -> Result<()> + Send + Sync + 'static) -> Self {
        self.truncate = Some(Box::new(f));
        self
    }

    pub fn on_write(mut self, f: impl Fn(&[u8]) -> Result<usize> + Send + Sync + 'static) -> Self {
        self.write = Some(Box::new(f));
        self
    }

    pub fn on_write_at(mut self, f: impl Fn(&[u8], u64) -> Result<usize> + Send + Sync + 'static) -> Self {
        self.write_at = Some(Box::new(f));
        self
    }

    pub fn on_write_string(mut self, f: impl Fn(&str) -> Result<usize> + Send + Sync + 'static) -> Self {
        self.write_string = Some(Box::new(f));
        self
    }

    pub fn overridden(&self) -> Vec<&'static str> {
        [
            ("close", self.close.is_some()),
            ("name", self.name.is_some()),
            ("read", self.read.is_some()),
            ("read_at", self.read_at.is_some()),
            ("readdir", self.readdir.is_some()),
            ("readdir_names", self.readdir_names.is_some()),
            ("seek", self.seek.is_some()),
            ("stat", self.stat.is_some()),
            ("sync", self.sync.is_some()),
            ("truncate", self.truncate.is_some()),
            ("write", self.write.is_some()),
            ("write_at", self.write_at.is_some()),
            ("write_string", self.write_string.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

impl fmt::Debug for FileCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCallbacks")
            .field("overridden", &self.overridden())
            .finish()
    }
}

/// [`File`] assembled by [`override_file`].
pub struct FileOverride {
    close: CloseFn,
    name: NameFn,
    read: ReadFn,
    read_at: ReadAtFn,
    readdir: ReaddirFn,
    readdir_names: ReaddirNamesFn,
    seek: SeekFn,
    stat: StatFn,
    sync: SyncFn,
    truncate: TruncateFn,
    write: WriteFn,
    write_at: WriteAtFn,
    write_string: WriteStringFn,
}

/// Wraps `file`, replacing the methods set in `callbacks`.
///
/// The wrapper never closes `file` by itself; `close` is forwarded like any
/// other method unless it is replaced.
pub fn override_file(file: impl File + 'static, callbacks: FileCallbacks) -> FileOverride {
    let fallback: Arc<dyn File> = Arc::new(file);
    debug!(overridden = ?callbacks.overridden(), "overriding File");

    let FileCallbacks {
        close,
        name,
        read,
        read_at,
        readdir,
        readdir_names,
        seek,
        stat,
        sync,
        truncate,
        write,
        write_at,
        write_string,
    } = callbacks;

    FileOverride {
        close: or_fallback!(close, fallback, close()),
        name: or_fallback!(name, fallback, name()),
        read: or_fallback!(read, fallback, read(buf: &mut [u8])),
        read_at: or_fallback!(read_at, fallback, read_at(buf: &mut [u8], offset: u64)),
        readdir: or_fallback!(readdir, fallback, readdir(count: i32)),
        readdir_names: or_fallback!(readdir_names, fallback, readdir_names(count: i32)),
        seek: or_fallback!(seek, fallback, seek(pos: SeekFrom)),
        stat: or_fallback!(stat, fallback, stat()),
        sync: or_fallback!(sync, fallback, sync()),
        truncate: or_fallback!(truncate, fallback, truncate(size: u64)),
        write: or_fallback!(write, fallback, write(buf: &[u8])),
        write_at: or_fallback!(write_at, fallback, write_at(buf: &[u8], offset: u64)),
        write_string: or_fallback!(write_string, fallback, write_string(s: &str)),
    }
}

impl File for FileOverride {
    fn close(&self) -> Result<()> {
        (self.close)()
    }

    fn name(&self) -> String {
        (self.name)()
    }

    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        (self.read)(buf)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        (self.read_at)(buf, offset)
    }

    fn readdir(&self, count: i32) -> Result<Vec<Box<dyn FileInfo>>> {
        (self.readdir)(count)
    }

    fn readdir_names(&self, count: i32) -> Result<Vec<String>> {
        (self.readdir_names)(count)
    }

    fn seek(&self, pos: SeekFrom) -> Result<u64> {
        (self.seek)(pos)
    }

    fn stat(&self) -> Result<Box<dyn FileInfo>> {
        (self.stat)()
    }

    fn sync(&self) -> Result<()> {
        (self.sync)()
    }

    fn truncate(&self, size: u64) -> Result<()> {
        (self.truncate)(size)
    }

    fn write(&self, buf: &[u8]) -> Result<usize> {
        (self.write)(buf)
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize> {
        (self.write_at)(buf, offset)
    }

    fn write_string(&self, s: &str) -> Result<usize> {
        (self.write_string)(s)
    }
}

impl fmt::Debug for FileOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileOverride").finish_non_exhaustive()
    }
}
