pub mod publish_subject;

use crate::{stream::observer::Observer, subscription::Subscription};

/// A relay that is both an observer of one source and a source for many observers.
pub trait Subject: Send + Sync + 'static {
    type Item;

    fn subscribe(&self, observer: Observer<Self::Item>) -> Subscription;
    fn next(&self, value: Self::Item);
    fn complete(&self);
    fn observer_count(&self) -> usize;

    /// The observer side, suitable for `source.subscribe_with(..)`.
    fn as_observer(&self) -> Observer<Self::Item>;
}

pub use publish_subject::PublishSubject;
