//! Traits for async runtime.
//!
//! The container only needs a runtime for continuation-style requests, where a resolution is
//! driven in the background and its result is handed to a callback.

/// An async runtime to spawn resolutions on.
pub trait Runtime: Clone + Send + Sync + 'static {
    /// A handle to a spawned resolution.
    type Task<T>: Task<Output = T, Error: Send + 'static, Join: Send + 'static> + Send
    where
        T: Send + 'static;

    /// Spawns an asynchronous task.
    fn spawn<F>(&self, fut: F) -> Self::Task<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;
}

/// A handle to a spawned task.
///
/// Resolutions cannot be cancelled, so the handle only allows waiting for completion.
pub trait Task {
    /// The output type returned by the task.
    type Output;

    /// The error type that may occur while running the task (e.g. a panic).
    type Error;

    /// The future returned by [`join`](Self::join) method.
    type Join: Future<Output = Result<Self::Output, Self::Error>>;

    /// Takes the handle and yields until the task is completed.
    fn join(self) -> Self::Join;
}
