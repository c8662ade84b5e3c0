//! Hook wrapper for UI-triggered actions.
//!
//! The back-office wraps every mutation with toast feedback: a loading toast
//! when the action starts, dismissed when it settles, then a success or error
//! toast depending on the resolved outcome.

use std::future::Future;

/// Anything with a success/failure tag usable by [`with_callbacks`].
pub trait ActionOutcome {
    fn is_success(&self) -> bool;
}

/// Hook set observed around a wrapped action. `R` is an opaque reference
/// produced by `on_start` (a toast id in the UI); `T` is the resolved value.
pub struct Callbacks<R, T> {
    pub on_start: Option<Box<dyn Fn() -> Option<R> + Send + Sync>>,
    pub on_end: Option<Box<dyn Fn(R) + Send + Sync>>,
    pub on_success: Option<Box<dyn Fn(&T) + Send + Sync>>,
    pub on_error: Option<Box<dyn Fn(&T) + Send + Sync>>,
}

impl<R, T> Default for Callbacks<R, T> {
    fn default() -> Self {
        Self { on_start: None, on_end: None, on_success: None, on_error: None }
    }
}

/// Run `action` with hooks around it.
///
/// `on_start` fires exactly once before the await. When the action resolves,
/// `on_end` fires iff `on_start` produced a reference, then exactly one of
/// `on_success` / `on_error` depending on the outcome tag. When the action
/// itself fails, the error propagates and no further hook runs.
pub async fn with_callbacks<R, T, E, Fut>(
    action: Fut,
    callbacks: Callbacks<R, T>,
) -> Result<T, E>
where
    T: ActionOutcome,
    Fut: Future<Output = Result<T, E>>,
{
    let reference = callbacks.on_start.as_ref().and_then(|hook| hook());
    let result = action.await?;
    if let Some(reference) = reference {
        if let Some(hook) = callbacks.on_end.as_ref() {
            hook(reference);
        }
    }
    if result.is_success() {
        if let Some(hook) = callbacks.on_success.as_ref() {
            hook(&result);
        }
    } else if let Some(hook) = callbacks.on_error.as_ref() {
        hook(&result);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    #[derive(Debug)]
    struct Outcome {
        ok: bool,
    }

    impl ActionOutcome for Outcome {
        fn is_success(&self) -> bool {
            self.ok
        }
    }

    struct Counters {
        start: AtomicUsize,
        end: AtomicUsize,
        success: AtomicUsize,
        error: AtomicUsize,
    }

    impl Counters {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                start: AtomicUsize::new(0),
                end: AtomicUsize::new(0),
                success: AtomicUsize::new(0),
                error: AtomicUsize::new(0),
            })
        }

        fn snapshot(&self) -> (usize, usize, usize, usize) {
            (
                self.start.load(Ordering::SeqCst),
                self.end.load(Ordering::SeqCst),
                self.success.load(Ordering::SeqCst),
                self.error.load(Ordering::SeqCst),
            )
        }
    }

    fn counted(counters: &Arc<Counters>, with_reference: bool) -> Callbacks<u32, Outcome> {
        let c = Arc::clone(counters);
        let on_start: Box<dyn Fn() -> Option<u32> + Send + Sync> = Box::new(move || {
            c.start.fetch_add(1, Ordering::SeqCst);
            with_reference.then_some(42)
        });
        let c = Arc::clone(counters);
        let on_end: Box<dyn Fn(u32) + Send + Sync> = Box::new(move |reference| {
            assert_eq!(reference, 42);
            c.end.fetch_add(1, Ordering::SeqCst);
        });
        let c = Arc::clone(counters);
        let on_success: Box<dyn Fn(&Outcome) + Send + Sync> = Box::new(move |_| {
            c.success.fetch_add(1, Ordering::SeqCst);
        });
        let c = Arc::clone(counters);
        let on_error: Box<dyn Fn(&Outcome) + Send + Sync> = Box::new(move |_| {
            c.error.fetch_add(1, Ordering::SeqCst);
        });
        Callbacks {
            on_start: Some(on_start),
            on_end: Some(on_end),
            on_success: Some(on_success),
            on_error: Some(on_error),
        }
    }

    #[tokio::test]
    async fn success_path_fires_start_end_success() {
        let counters = Counters::new();
        let result: Result<Outcome, ()> =
            with_callbacks(async { Ok(Outcome { ok: true }) }, counted(&counters, true)).await;
        assert!(result.unwrap().is_success());
        assert_eq!(counters.snapshot(), (1, 1, 1, 0));
    }

    #[tokio::test]
    async fn non_success_outcome_fires_error_hook() {
        let counters = Counters::new();
        let result: Result<Outcome, ()> =
            with_callbacks(async { Ok(Outcome { ok: false }) }, counted(&counters, true)).await;
        assert!(!result.unwrap().is_success());
        assert_eq!(counters.snapshot(), (1, 1, 0, 1));
    }

    #[tokio::test]
    async fn end_hook_skipped_without_reference() {
        let counters = Counters::new();
        let _: Result<Outcome, ()> =
            with_callbacks(async { Ok(Outcome { ok: true }) }, counted(&counters, false)).await;
        assert_eq!(counters.snapshot(), (1, 0, 1, 0));
    }

    #[tokio::test]
    async fn rejection_propagates_without_hooks() {
        let counters = Counters::new();
        let result: Result<Outcome, &str> =
            with_callbacks(async { Err("boom") }, counted(&counters, true)).await;
        assert_eq!(result.unwrap_err(), "boom");
        // only on_start ran
        assert_eq!(counters.snapshot(), (1, 0, 0, 0));
    }

    #[tokio::test]
    async fn hooks_are_all_optional() {
        let result: Result<Outcome, ()> =
            with_callbacks(async { Ok(Outcome { ok: true }) }, Callbacks::<u32, Outcome>::default())
                .await;
        assert!(result.unwrap().is_success());
    }
}
