use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Defaults applied to a mock after every configuration has run.
pub trait MockDefaults: Default {
    fn apply_defaults(&mut self) {}
}

type Configure<M> = Arc<dyn Fn(&mut M) + Send + Sync>;

/// Factory for fully configured mocks.
///
/// Configurations run in the order they were added, on a fresh mock, each
/// time [`Mocker::build`] is called. A mocker can therefore be stored in a
/// table of test cases and built once per case. Expectations are verified
/// when the built mock is dropped at the end of the test.
///
/// ```
/// use fsmock::{mock_fs, Fs, FsError};
/// use fsmock::mockall::predicate::eq;
/// use std::path::Path;
///
/// let mocker = mock_fs(|fs| {
///     fs.expect_remove()
///         .with(eq(Path::new("old.log")))
///         .times(1)
///         .returning(|_| Err(FsError::other("busy")));
/// });
///
/// let fs = mocker.build();
/// assert_eq!(fs.remove(Path::new("old.log")), Err(FsError::other("busy")));
/// ```
pub struct Mocker<M> {
    configs: Vec<Configure<M>>,
}

impl<M: MockDefaults + 'static> Mocker<M> {
    pub const fn new() -> Self {
        Self {
            configs: Vec::new(),
        }
    }

    /// Appends a configuration.
    pub fn mock(mut self, configure: impl Fn(&mut M) + Send + Sync + 'static) -> Self {
        self.configs.push(Arc::new(configure));
        self
    }

    pub fn build(&self) -> M {
        let mut mock = M::default();
        for configure in &self.configs {
            configure(&mut mock);
        }
        mock.apply_defaults();

        debug!(
            mock = std::any::type_name::<M>(),
            configurations = self.configs.len(),
            "built mock"
        );
        mock
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl<M: MockDefaults + 'static> Default for Mocker<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Mocker<M> {
    fn clone(&self) -> Self {
        Self {
            configs: self.configs.clone(),
        }
    }
}

impl<M> fmt::Debug for Mocker<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mocker")
            .field("mock", &std::any::type_name::<M>())
            .field("configurations", &self.configs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        steps: Vec<&'static str>,
    }

    impl MockDefaults for Recorder {
        fn apply_defaults(&mut self) {
            self.steps.push("defaults");
        }
    }

    #[test]
    fn test_configurations_run_in_order() {
        let mocker = Mocker::<Recorder>::new()
            .mock(|r| r.steps.push("first"))
            .mock(|r| r.steps.push("second"));

        assert_eq!(mocker.len(), 2);
        assert_eq!(mocker.build().steps, vec!["first", "second", "defaults"]);
    }

    #[test]
    fn test_each_build_starts_fresh() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let mocker = Mocker::<Recorder>::new().mock(move |r| {
            *counter.lock().unwrap() += 1;
            r.steps.push("configured");
        });

        let first = mocker.build();
        let second = mocker.clone().build();

        assert_eq!(first.steps, second.steps);
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_empty_mocker() {
        let mocker = Mocker::<Recorder>::default();

        assert!(mocker.is_empty());
        assert_eq!(mocker.build().steps, vec!["defaults"]);
        assert!(format!("{:?}", mocker).contains("configurations: 0"));
    }
}
