//! Override-with-fallback wrappers
//!
//! A `*Callbacks` record holds optional replacements for trait methods.
//! `override_*` fills every empty slot with the matching method of a
//! fallback implementation and returns a `*Override` whose slots are all
//! populated, so each call either runs the replacement or goes straight to
//! the fallback.

/// Resolves one slot: the caller's callback if set, otherwise a closure that
/// forwards to the same method on the shared fallback.
macro_rules! or_fallback {
    ($slot:expr, $fallback:ident, $method:ident($($arg:ident: $ty:ty),*)) => {
        match $slot {
            Some(callback) => callback,
            None => {
                let fallback = ::std::sync::Arc::clone(&$fallback);
                Box::new(move |$($arg: $ty),*| fallback.$method($($arg),*))
            }
        }
    };
}

mod file;
mod file_info;
mod fs;
mod wrapped;

pub use file::{override_file, FileCallbacks, FileOverride};
pub use file_info::{override_file_info, FileInfoCallbacks, FileInfoOverride};
pub use fs::{override_fs, FsCallbacks, FsOverride};
#[allow(deprecated)]
pub use wrapped::{wrap_file, wrap_fs, WrappedFile, WrappedFs};
