use crate::fs::{FileInfo, FileMode, Sys};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

pub type NameFn = Box<dyn Fn() -> String + Send + Sync>;
pub type SizeFn = Box<dyn Fn() -> u64 + Send + Sync>;
pub type ModeFn = Box<dyn Fn() -> FileMode + Send + Sync>;
pub type ModTimeFn = Box<dyn Fn() -> SystemTime + Send + Sync>;
pub type IsDirFn = Box<dyn Fn() -> bool + Send + Sync>;
pub type SysFn = Box<dyn Fn() -> Sys + Send + Sync>;

/// Replacements for [`FileInfo`] methods.
#[derive(Default)]
pub struct FileInfoCallbacks {
    pub name: Option<NameFn>,
    pub size: Option<SizeFn>,
    pub mode: Option<ModeFn>,
    pub mod_time: Option<ModTimeFn>,
    pub is_dir: Option<IsDirFn>,
    pub sys: Option<SysFn>,
}

impl FileInfoCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_name(mut self, f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.name = Some(Box::new(f));
        self
    }

    pub fn on_size(mut self, f: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.size = Some(Box::new(f));
        self
    }

    pub fn on_mode(mut self, f: impl Fn() -> FileMode + Send + Sync + 'static) -> Self {
        self.mode = Some(Box::new(f));
        self
    }

    pub fn on_mod_time(mut self, f: impl Fn() -> SystemTime + Send + Sync + 'static) -> Self {
        self.mod_time = Some(Box::new(f));
        self
    }

    pub fn on_is_dir(mut self, f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.is_dir = Some(Box::new(f));
        self
    }

    pub fn on_sys(mut self, f: impl Fn() -> Sys + Send + Sync + 'static) -> Self {
        self.sys = Some(Box::new(f));
        self
    }

    pub fn overridden(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("size", self.size.is_some()),
            ("mode", self.mode.is_some()),
            ("mod_time", self.mod_time.is_some()),
            ("is_dir", self.is_dir.is_some()),
            ("sys", self.sys.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

impl fmt::Debug for FileInfoCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInfoCallbacks")
            .field("overridden", &self.overridden())
            .finish()
    }
}

/// [`FileInfo`] assembled by [`override_file_info`].
pub struct FileInfoOverride {
    name: NameFn,
    size: SizeFn,
    mode: ModeFn,
    mod_time: ModTimeFn,
    is_dir: IsDirFn,
    sys: SysFn,
}

/// Wraps `info`, replacing the methods set in `callbacks`.
///
/// Answers are not cross-checked: overriding `is_dir` alone leaves `mode`
/// reporting whatever the fallback says.
pub fn override_file_info(info: impl FileInfo + 'static, callbacks: FileInfoCallbacks) -> FileInfoOverride {
    let fallback: Arc<dyn FileInfo> = Arc::new(info);
    debug!(overridden = ?callbacks.overridden(), "overriding FileInfo");

    let FileInfoCallbacks {
        name,
        size,
        mode,
        mod_time,
        is_dir,
        sys,
    } = callbacks;

    FileInfoOverride {
        name: or_fallback!(name, fallback, name()),
        size: or_fallback!(size, fallback, size()),
        mode: or_fallback!(mode, fallback, mode()),
        mod_time: or_fallback!(mod_time, fallback, mod_time()),
        is_dir: or_fallback!(is_dir, fallback, is_dir()),
        sys: or_fallback!(sys, fallback, sys()),
    }
}

impl FileInfo for FileInfoOverride {
    fn name(&self) -> String {
        (self.name)()
    }

    fn size(&self) -> u64 {
        (self.size)()
    }

    fn mode(&self) -> FileMode {
        (self.mode)()
    }

    fn mod_time(&self) -> SystemTime {
        (self.mod_time)()
    }

    fn is_dir(&self) -> bool {
        (self.is_dir)()
    }

    fn sys(&self) -> Sys {
        (self.sys)()
    }
}

impl fmt::Debug for FileInfoOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInfoOverride").finish_non_exhaustive()
    }
}
