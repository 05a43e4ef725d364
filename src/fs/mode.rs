use std::fmt;

bitflags::bitflags! {
    /// File type and permission bits (POSIX `st_mode` layout).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileMode: u32 {
        /// File type mask
        const S_IFMT   = 0o170000;
        const S_IFSOCK = 0o140000;
        const S_IFLNK  = 0o120000;
        const S_IFREG  = 0o100000;
        const S_IFBLK  = 0o060000;
        const S_IFDIR  = 0o040000;
        const S_IFCHR  = 0o020000;
        const S_IFIFO  = 0o010000;

        const S_ISUID  = 0o4000;
        const S_ISGID  = 0o2000;
        const S_ISVTX  = 0o1000;

        const S_IRUSR  = 0o400;
        const S_IWUSR  = 0o200;
        const S_IXUSR  = 0o100;
        const S_IRGRP  = 0o040;
        const S_IWGRP  = 0o020;
        const S_IXGRP  = 0o010;
        const S_IROTH  = 0o004;
        const S_IWOTH  = 0o002;
        const S_IXOTH  = 0o001;

        /// Permission mask
        const PERM     = 0o777;
    }
}

impl FileMode {
    fn file_type(&self) -> u32 {
        self.bits() & Self::S_IFMT.bits()
    }

    pub fn is_dir(&self) -> bool {
        self.file_type() == Self::S_IFDIR.bits()
    }

    pub fn is_regular(&self) -> bool {
        self.file_type() == Self::S_IFREG.bits()
    }

    pub fn is_symlink(&self) -> bool {
        self.file_type() == Self::S_IFLNK.bits()
    }

    /// Permission bits only.
    pub fn perm(&self) -> FileMode {
        *self & Self::PERM
    }
}

impl From<u32> for FileMode {
    fn from(bits: u32) -> Self {
        FileMode::from_bits_retain(bits)
    }
}

impl From<FileMode> for u32 {
    fn from(mode: FileMode) -> Self {
        mode.bits()
    }
}

impl fmt::Display for FileMode {
    /// Renders the mode the way `ls -l` does, e.g. `drwxr-xr-x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.file_type() {
            t if t == Self::S_IFDIR.bits() => 'd',
            t if t == Self::S_IFLNK.bits() => 'l',
            t if t == Self::S_IFSOCK.bits() => 's',
            t if t == Self::S_IFIFO.bits() => 'p',
            t if t == Self::S_IFCHR.bits() => 'c',
            t if t == Self::S_IFBLK.bits() => 'b',
            _ => '-',
        };

        let bits = self.bits();
        let mut out = String::with_capacity(10);
        out.push(kind);
        // The special bit replaces the execute slot: lowercase when execute is set too.
        let classes = [
            (6u32, Self::S_ISUID, ('s', 'S')),
            (3, Self::S_ISGID, ('s', 'S')),
            (0, Self::S_ISVTX, ('t', 'T')),
        ];
        for (shift, special, (with_exec, without_exec)) in classes {
            let triple = (bits >> shift) & 0o7;
            out.push(if triple & 0o4 != 0 { 'r' } else { '-' });
            out.push(if triple & 0o2 != 0 { 'w' } else { '-' });
            out.push(match (self.contains(special), triple & 0o1 != 0) {
                (true, true) => with_exec,
                (true, false) => without_exec,
                (false, true) => 'x',
                (false, false) => '-',
            });
        }

        f.write_str(&out)
    }
}

bitflags::bitflags! {
    /// How a file is opened by `Fs::open_file`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        const READ       = 1 << 0;
        const WRITE      = 1 << 1;
        const APPEND     = 1 << 2;
        const CREATE     = 1 << 3;
        /// Fail if the file already exists.
        const CREATE_NEW = 1 << 4;
        const TRUNCATE   = 1 << 5;
    }
}

impl OpenFlags {
    /// Flags used by `Fs::create`.
    pub fn create() -> Self {
        Self::READ | Self::WRITE | Self::CREATE | Self::TRUNCATE
    }

    pub fn to_open_options(self) -> std::fs::OpenOptions {
        let mut options = std::fs::OpenOptions::new();
        options
            .read(self.contains(Self::READ))
            .write(self.contains(Self::WRITE))
            .append(self.contains(Self::APPEND))
            .create(self.contains(Self::CREATE))
            .create_new(self.contains(Self::CREATE_NEW))
            .truncate(self.contains(Self::TRUNCATE));
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_mode() {
        let mode = FileMode::from(0o040755_u32);

        assert!(mode.is_dir());
        assert!(!mode.is_regular());
        assert_eq!(mode.perm(), FileMode::from(0o755_u32));
        assert_eq!(mode.to_string(), "drwxr-xr-x");
    }

    #[test]
    fn test_regular_mode() {
        let mode = FileMode::S_IFREG | FileMode::S_IRUSR | FileMode::S_IWUSR | FileMode::S_IRGRP;

        assert!(mode.is_regular());
        assert_eq!(u32::from(mode), 0o100640);
        assert_eq!(mode.to_string(), "-rw-r-----");
    }

    #[test]
    fn test_symlink_mode() {
        let mode = FileMode::from(0o120777_u32);

        assert!(mode.is_symlink());
        assert!(!mode.is_dir());
        assert_eq!(mode.to_string(), "lrwxrwxrwx");
    }

    #[test]
    fn test_special_bits_display() {
        assert_eq!(FileMode::from(0o104755_u32).to_string(), "-rwsr-xr-x");
        assert_eq!(FileMode::from(0o102755_u32).to_string(), "-rwxr-sr-x");
        assert_eq!(FileMode::from(0o041777_u32).to_string(), "drwxrwxrwt");
        assert_eq!(FileMode::from(0o107644_u32).to_string(), "-rwSr-Sr-T");
    }

    #[test]
    fn test_permission_only_mode_has_no_type() {
        let mode = FileMode::from(0o644_u32);

        assert!(!mode.is_dir());
        assert!(!mode.is_regular());
        assert_eq!(mode.to_string(), "-rw-r--r--");
    }

    #[test]
    fn test_unknown_bits_are_retained() {
        let mode = FileMode::from(0x8000_0000_u32 | 0o644);
        assert_eq!(mode.bits(), 0x8000_0000 | 0o644);
    }

    #[test]
    fn test_create_flags() {
        let flags = OpenFlags::create();

        assert!(flags.contains(OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE));
        assert!(!flags.contains(OpenFlags::APPEND));
    }
}
