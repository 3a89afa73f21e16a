use std::{fmt, sync::Arc};

use futures::channel::mpsc;

use crate::subscription::Subscription;

use super::{notification::Notification, observer::Observer, subscriber::Subscriber};

type Factory<T> = dyn Fn(Observer<T>) -> Subscription + Send + Sync;

/// A lazy template for a sequence of values.
///
/// Nothing happens until [`subscribe`](Observable::subscribe) is called, at
/// which point the factory runs once for that subscriber. Whether subscribers
/// share an underlying producer is entirely up to the factory.
pub struct Observable<T> {
    factory: Arc<Factory<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Observable<T> {
    pub fn create<F>(factory: F) -> Self
    where
        F: Fn(Observer<T>) -> Subscription + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Completes every subscriber right away.
    pub fn empty() -> Self {
        Self::create(|observer| {
            observer.complete();

            Subscription::empty()
        })
    }

    /// Emits `values` synchronously to each subscriber, then completes.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
    {
        Self::create(move |observer| {
            for value in values.clone() {
                observer.next(value);
            }

            observer.complete();

            Subscription::empty()
        })
    }

    pub fn subscribe_with(&self, observer: Observer<T>) -> Subscription {
        (self.factory)(observer)
    }

    pub fn subscribe_fn<F>(&self, f: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe_with(Observer::from_fn(f))
    }

    /// Subscribes and exposes the values as a [`futures::Stream`].
    ///
    /// The stream ends when the source completes, dropping it unsubscribes.
    pub fn subscribe(&self) -> Subscriber<T> {
        let (tx, rx) = mpsc::unbounded();
        let subscription = self.subscribe_with(Observer::new(move |notification| {
            match notification {
                Notification::Next(value) => {
                    // receiver gone means the subscriber is being dropped
                    let _ = tx.unbounded_send(value);
                }
                Notification::Complete => tx.close_channel(),
            }
        }));

        Subscriber::new(rx, subscription)
    }
}
