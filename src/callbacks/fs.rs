use crate::error::Result;
use crate::fs::{File, FileInfo, FileMode, Fs, OpenFlags};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

pub type ChmodFn = Box<dyn Fn(&Path, FileMode) -> Result<()> + Send + Sync>;
pub type ChownFn = Box<dyn Fn(&Path, u32, u32) -> Result<()> + Send + Sync>;
pub type ChtimesFn = Box<dyn Fn(&Path, SystemTime, SystemTime) -> Result<()> + Send + Sync>;
pub type CreateFn = Box<dyn Fn(&Path) -> Result<Box<dyn File>> + Send + Sync>;
pub type MkdirFn = Box<dyn Fn(&Path, FileMode) -> Result<()> + Send + Sync>;
pub type NameFn = Box<dyn Fn() -> String + Send + Sync>;
pub type OpenFn = Box<dyn Fn(&Path) -> Result<Box<dyn File>> + Send + Sync>;
pub type OpenFileFn = Box<dyn Fn(&Path, OpenFlags, FileMode) -> Result<Box<dyn File>> + Send + Sync>;
pub type RemoveFn = Box<dyn Fn(&Path) -> Result<()> + Send + Sync>;
pub type RenameFn = Box<dyn Fn(&Path, &Path) -> Result<()> + Send + Sync>;
pub type StatFn = Box<dyn Fn(&Path) -> Result<Box<dyn FileInfo>> + Send + Sync>;

/// Replacements for [`Fs`] methods. Empty slots are taken from the fallback
/// passed to [`override_fs`].
#[derive(Default)]
pub struct FsCallbacks {
    pub chmod: Option<ChmodFn>,
    pub chown: Option<ChownFn>,
    pub chtimes: Option<ChtimesFn>,
    pub create: Option<CreateFn>,
    pub mkdir: Option<MkdirFn>,
    pub mkdir_all: Option<MkdirFn>,
    pub name: Option<NameFn>,
    pub open: Option<OpenFn>,
    pub open_file: Option<OpenFileFn>,
    pub remove: Option<RemoveFn>,
    pub remove_all: Option<RemoveFn>,
    pub rename: Option<RenameFn>,
    pub stat: Option<StatFn>,
}

impl FsCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_chmod(mut self, f: impl Fn(&Path, FileMode) -> Result<()> + Send + Sync + 'static) -> Self {
        self.chmod = Some(Box::new(f));
        self
    }

    pub fn on_chown(mut self, f: impl Fn(&Path, u32, u32) -> Result<()> + Send + Sync + 'static) -> Self {
        self.chown = Some(Box::new(f));
        self
    }

    pub fn on_chtimes(
        mut self,
        f: impl Fn(&Path, SystemTime, SystemTime) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.chtimes = Some(Box::new(f));
        self
    }

    pub fn on_create(mut self, f: impl Fn(&Path) -> Result<Box<dyn File>> + Send + Sync + 'static) -> Self {
        self.create = Some(Box::new(f));
        self
    }

    pub fn on_mkdir(mut self, f: impl Fn(&Path, FileMode) -> Result<()> + Send + Sync + 'static) -> Self {
        self.mkdir = Some(Box::new(f));
        self
    }

    pub fn on_mkdir_all(mut self, f: impl Fn(&Path, FileMode) -> Result<()> + Send + Sync + 'static) -> Self {
        self.mkdir_all = Some(Box::new(f));
        self
    }

    pub fn on_name(mut self, f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.name = Some(Box::new(f));
        self
    }

    pub fn on_open(mut self, f: impl Fn(&Path) -> Result<Box<dyn File>> + Send + Sync + 'static) -> Self {
        self.open = Some(Box::new(f));
        self
    }

    pub fn on_open_file(
        mut self,
        f: impl Fn(&Path, OpenFlags, FileMode) -> Result<Box<dyn File>> + Send + Sync + 'static,
    ) -> Self {
        self.open_file = Some(Box::new(f));
        self
    }

    pub fn on_remove(mut self, f: impl Fn(&Path) -> Result<()> + Send + Sync + 'static) -> Self {
        self.remove = Some(Box::new(f));
        self
    }

    pub fn on_remove_all(mut self, f: impl Fn(&Path) -> Result<()> + Send + Sync + 'static) -> Self {
        self.remove_all = Some(Box::new(f));
        self
    }

    pub fn on_rename(mut self, f: impl Fn(&Path, &Path) -> Result<()> + Send + Sync + 'static) -> Self {
        self.rename = Some(Box::new(f));
        self
    }

    pub fn on_stat(mut self, f: impl Fn(&Path) -> Result<Box<dyn FileInfo>> + Send + Sync + 'static) -> Self {
        self.stat = Some(Box::new(f));
        self
    }

    /// Names of the methods that have a replacement.
    pub fn overridden(&self) -> Vec<&'static str> {
        [
            ("chmod", self.chmod.is_some()),
            ("chown", self.chown.is_some()),
            ("chtimes", self.chtimes.is_some()),
            ("create", self.create.is_some()),
            ("mkdir", self.mkdir.is_some()),
            ("mkdir_all", self.mkdir_all.is_some()),
            ("name", self.name.is_some()),
            ("open", self.open.is_some()),
            ("open_file", self.open_file.is_some()),
            ("remove", self.remove.is_some()),
            ("remove_all", self.remove_all.is_some()),
            ("rename", self.rename.is_some()),
            ("stat", self.stat.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

impl fmt::Debug for FsCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsCallbacks")
            .field("overridden", &self.overridden())
            .finish()
    }
}

/// [`Fs`] whose every method is either a caller's replacement or the
/// fallback's own method.
pub struct FsOverride {
    chmod: ChmodFn,
    chown: ChownFn,
    chtimes: ChtimesFn,
    create: CreateFn,
    mkdir: MkdirFn,
    mkdir_all: MkdirFn,
    name: NameFn,
    open: OpenFn,
    open_file: OpenFileFn,
    remove: RemoveFn,
    remove_all: RemoveFn,
    rename: RenameFn,
    stat: StatFn,
}

/// Wraps `fs`, replacing the methods set in `callbacks`.
///
/// ```
/// use fsmock::{override_fs, Fs, FsCallbacks, FsError, OsFs};
/// use std::path::Path;
///
/// let fs = override_fs(
///     OsFs::new(),
///     FsCallbacks::new().on_remove(|_| Err(FsError::other("read-only"))),
/// );
///
/// assert_eq!(fs.remove(Path::new("/tmp/x")), Err(FsError::other("read-only")));
/// assert_eq!(fs.name(), "OsFs");
/// ```
pub fn override_fs(fs: impl Fs + 'static, callbacks: FsCallbacks) -> FsOverride {
    let fallback: Arc<dyn Fs> = Arc::new(fs);
    debug!(overridden = ?callbacks.overridden(), "overriding Fs");

    let FsCallbacks {
        chmod,
        chown,
        chtimes,
        create,
        mkdir,
        mkdir_all,
        name,
        open,
        open_file,
        remove,
        remove_all,
        rename,
        stat,
    } = callbacks;

    FsOverride {
        chmod: or_fallback!(chmod, fallback, chmod(name: &Path, mode: FileMode)),
        chown: or_fallback!(chown, fallback, chown(name: &Path, uid: u32, gid: u32)),
        chtimes: or_fallback!(
            chtimes,
            fallback,
            chtimes(name: &Path, atime: SystemTime, mtime: SystemTime)
        ),
        create: or_fallback!(create, fallback, create(name: &Path)),
        mkdir: or_fallback!(mkdir, fallback, mkdir(name: &Path, perm: FileMode)),
        mkdir_all: or_fallback!(mkdir_all, fallback, mkdir_all(path: &Path, perm: FileMode)),
        name: or_fallback!(name, fallback, name()),
        open: or_fallback!(open, fallback, open(name: &Path)),
        open_file: or_fallback!(
            open_file,
            fallback,
            open_file(name: &Path, flags: OpenFlags, perm: FileMode)
        ),
        remove: or_fallback!(remove, fallback, remove(name: &Path)),
        remove_all: or_fallback!(remove_all, fallback, remove_all(path: &Path)),
        rename: or_fallback!(rename, fallback, rename(old: &Path, new: &Path)),
        stat: or_fallback!(stat, fallback, stat(name: &Path)),
    }
}

impl Fs for FsOverride {
    fn create(&self, name: &Path) -> Result<Box<dyn File>> {
        (self.create)(name)
    }

    fn mkdir(&self, name: &Path, perm: FileMode) -> Result<()> {
        (self.mkdir)(name, perm)
    }

    fn mkdir_all(&self, path: &Path, perm: FileMode) -> Result<()> {
        (self.mkdir_all)(path, perm)
    }

    fn open(&self, name: &Path) -> Result<Box<dyn File>> {
        (self.open)(name)
    }

    fn open_file(&self, name: &Path, flags: OpenFlags, perm: FileMode) -> Result<Box<dyn File>> {
        (self.open_file)(name, flags, perm)
    }

    fn remove(&self, name: &Path) -> Result<()> {
        (self.remove)(name)
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        (self.remove_all)(path)
    }

    fn rename(&self, old: &Path, new: &Path) -> Result<()> {
        (self.rename)(old, new)
    }

    fn stat(&self, name: &Path) -> Result<Box<dyn FileInfo>> {
        (self.stat)(name)
    }

    fn name(&self) -> String {
        (self.name)()
    }

    fn chmod(&self, name: &Path, mode: FileMode) -> Result<()> {
        (self.chmod)(name, mode)
    }

    fn chown(&self, name: &Path, uid: u32, gid: u32) -> Result<()> {
        (self.chown)(name, uid, gid)
    }

    fn chtimes(&self, name: &Path, atime: SystemTime, mtime: SystemTime) -> Result<()> {
        (self.chtimes)(name, atime, mtime)
    }
}

impl fmt::Debug for FsOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsOverride").finish_non_exhaustive()
    }
}
