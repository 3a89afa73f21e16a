use std::{fmt, sync::Arc};

use super::notification::Notification;

type Sink<T> = dyn Fn(Notification<T>) + Send + Sync;

/// Receiving end of a subscription.
///
/// Cheap to clone, all clones feed the same sink.
pub struct Observer<T> {
    sink: Arc<Sink<T>>,
}

impl<T> Observer<T> {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(Notification<T>) + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// An observer that only cares about values.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self::new(move |notification| {
            if let Notification::Next(value) = notification {
                f(value)
            }
        })
    }

    pub fn notify(&self, notification: Notification<T>) {
        (self.sink)(notification)
    }

    pub fn next(&self, value: T) {
        self.notify(Notification::Next(value))
    }

    pub fn complete(&self) {
        self.notify(Notification::Complete)
    }
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer").finish_non_exhaustive()
    }
}
