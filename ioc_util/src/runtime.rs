//! Runtime utilities.

#[cfg(feature = "tokio")]
pub use rt_tokio::{TokioRuntime, TokioTask};

#[cfg(feature = "tokio")]
mod rt_tokio {
    use tokio::runtime::Handle;
    use tokio::task::{JoinError, JoinHandle};

    use ioc_core::runtime::{Runtime, Task};

    /// Spawns container tasks on a `tokio` runtime.
    ///
    /// Without a handle, tasks go to the runtime of the caller, which must then be inside one.
    #[derive(Clone, Default, Debug)]
    pub struct TokioRuntime {
        handle: Option<Handle>,
    }

    /// A task spawned by [`TokioRuntime`].
    #[derive(Debug)]
    pub struct TokioTask<T>(JoinHandle<T>);

    impl TokioRuntime {
        /// Spawns on the runtime of the caller.
        #[inline]
        pub fn new() -> Self {
            Self::default()
        }

        /// Spawns on the runtime behind `handle`, from any thread.
        #[inline]
        pub const fn with_handle(handle: Handle) -> Self {
            Self {
                handle: Some(handle),
            }
        }
    }

    impl Runtime for TokioRuntime {
        type Task<T>
            = TokioTask<T>
        where
            T: Send + 'static;

        fn spawn<F>(&self, fut: F) -> Self::Task<F::Output>
        where
            F: Future + Send + 'static,
            F::Output: Send + 'static,
        {
            TokioTask(match &self.handle {
                Some(handle) => handle.spawn(fut),
                None => tokio::spawn(fut),
            })
        }
    }

    impl<T> Task for TokioTask<T> {
        type Output = T;

        type Error = JoinError;

        type Join = JoinHandle<T>;

        #[inline]
        fn join(self) -> Self::Join {
            self.0
        }
    }

}
