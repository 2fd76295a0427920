//! Future utilities.

use std::pin::Pin;
use std::task::{Context, Poll};

/// An owned, dynamically typed [`Future`] that is [`Send`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait TryFuture: Future {
    type Ok;

    type Err;

    fn try_poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<Self::Ok, Self::Err>>;
}

impl<T, E, F: Future<Output = Result<T, E>>> TryFuture for F {
    type Ok = T;

    type Err = E;

    #[inline]
    fn try_poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<Self::Ok, Self::Err>> {
        self.poll(cx)
    }
}

pin_project_lite::pin_project! {
    /// Future for [`try_join_all`].
    #[must_use = "futures do nothing unless polled"]
    pub struct TryJoinAll<F: TryFuture> {
        // `None` once the future at the same index has completed.
        pending: Vec<Option<Pin<Box<F>>>>,
        outputs: Vec<Option<F::Ok>>,
    }
}

impl<F: TryFuture> Future for TryJoinAll<F> {
    type Output = Result<Vec<F::Ok>, F::Err>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let mut done = true;
        let mut failed = None;

        for (slot, output) in this.pending.iter_mut().zip(this.outputs.iter_mut()) {
            let Some(future) = slot else {
                continue;
            };

            let poll = future.as_mut().try_poll(cx);
            match poll {
                Poll::Ready(Ok(value)) => {
                    *output = Some(value);
                    *slot = None;
                }
                Poll::Ready(Err(err)) => {
                    failed = Some(err);
                    break;
                }
                Poll::Pending => done = false,
            }
        }

        if let Some(err) = failed {
            this.pending.clear();
            return Poll::Ready(Err(err));
        }

        if done {
            let outputs = std::mem::take(this.outputs);
            Poll::Ready(Ok(outputs.into_iter().flatten().collect()))
        } else {
            Poll::Pending
        }
    }
}

/// Polls all futures concurrently and collects their outputs in the original order.
///
/// Completes as soon as any future fails, returning that error and dropping the remaining
/// futures. Otherwise completes once every future has succeeded.
///
/// # Errors
///
/// Returns the error of the first future that fails.
pub fn try_join_all<I, F>(futures: I) -> TryJoinAll<F>
where
    I: IntoIterator<Item = F>,
    F: TryFuture,
{
    let pending: Vec<_> = futures
        .into_iter()
        .map(|future| Some(Box::pin(future)))
        .collect();
    let outputs = pending.iter().map(|_| None).collect();

    TryJoinAll { pending, outputs }
}
