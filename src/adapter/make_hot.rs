use std::sync::Arc;

use crate::{
    stream::{observable::Observable, observer::Observer},
    subject::{PublishSubject, Subject},
    subscription::Subscription,
};

/// Cold-to-hot conversion without reference counting.
///
/// The source is connected to a [`PublishSubject`] relay as soon as the adapter
/// is built, and stays connected for as long as the adapter or any observable
/// it handed out is alive. Subscriber count plays no part: with zero
/// subscribers left the upstream producer keeps running. Use
/// [`make_hot_ref_counted`](super::make_hot_ref_counted) or
/// [`Observable::share`] when the upstream should follow its subscribers.
pub struct NaiveHot<T> {
    connection: Connection<T>,
}

/// Relay plus the upstream feeding it, shared by every handed out observable.
struct Connection<T> {
    relay: PublishSubject<T>,
    upstream: Arc<Subscription>,
}

impl<T> Clone for Connection<T> {
    fn clone(&self) -> Self {
        Self {
            relay: self.relay.clone(),
            upstream: Arc::clone(&self.upstream),
        }
    }
}

impl<T: Clone + Send + 'static> Connection<T> {
    fn subscribe(&self, observer: Observer<T>) -> Subscription {
        self.relay.subscribe(observer)
    }
}

pub fn make_hot<T: Clone + Send + 'static>(cold: &Observable<T>) -> NaiveHot<T> {
    let relay = PublishSubject::new();
    let upstream = cold.subscribe_with(relay.as_observer());

    NaiveHot {
        connection: Connection {
            relay,
            upstream: Arc::new(upstream),
        },
    }
}

impl<T: Clone + Send + 'static> NaiveHot<T> {
    pub fn observable(&self) -> Observable<T> {
        let connection = self.connection.clone();

        Observable::create(move |observer| connection.subscribe(observer))
    }

    pub fn is_connected(&self) -> bool {
        !self.connection.upstream.is_closed()
    }

    pub fn subscriber_count(&self) -> usize {
        self.connection.relay.observer_count()
    }
}
