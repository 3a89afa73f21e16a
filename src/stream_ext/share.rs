use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    stream::{observable::Observable, observer::Observer},
    subject::{PublishSubject, Subject},
    subscription::Subscription,
};

struct ShareState<T> {
    count: usize,
    relay: PublishSubject<T>,
    upstream: Option<Subscription>,
    /// A connect is running outside the lock.
    connecting: bool,
    /// Bumped whenever a pending connect is abandoned.
    generation: u64,
}

/// Relay to connect the source to, outside the state lock.
struct Connect<T> {
    relay: PublishSubject<T>,
    generation: u64,
}

impl<T: Clone + Send + 'static> ShareState<T> {
    fn join(
        &mut self,
        observer: Observer<T>,
    ) -> (Subscription, Option<Subscription>, Option<Connect<T>>) {
        // a completed relay is replaced, its connection is stale
        let stale = if self.relay.is_closed() {
            self.relay = PublishSubject::new();

            if self.connecting {
                self.connecting = false;
                self.generation += 1;
            }

            self.upstream.take()
        } else {
            None
        };

        let inner = self.relay.subscribe(observer);

        self.count += 1;

        let connect = if self.upstream.is_none() && !self.connecting {
            debug!(subscribers = self.count, "share connecting");

            self.connecting = true;

            Some(Connect {
                relay: self.relay.clone(),
                generation: self.generation,
            })
        } else {
            None
        };

        (inner, stale, connect)
    }

    /// Stores a finished connect, or hands it back when nobody needs it anymore.
    fn connected(&mut self, generation: u64, upstream: Subscription) -> Option<Subscription> {
        if generation != self.generation {
            return Some(upstream);
        }

        self.connecting = false;

        if self.count > 0 && self.upstream.is_none() {
            debug!(subscribers = self.count, "share connected");

            self.upstream = Some(upstream);

            None
        } else {
            Some(upstream)
        }
    }

    fn leave(&mut self) -> Option<Subscription> {
        self.count -= 1;

        if self.count == 0 {
            debug!("share disconnected");

            self.upstream.take()
        } else {
            None
        }
    }
}

impl<T: Clone + Send + 'static> Observable<T> {
    /// Multicasts this observable while at least one subscriber is attached.
    ///
    /// The first subscriber connects the source, the last one to leave releases
    /// it, and the next subscriber after that connects it again. Late subscribers
    /// only see values emitted after they joined.
    pub fn share(&self) -> Observable<T> {
        let source = self.clone();
        let state = Arc::new(Mutex::new(ShareState {
            count: 0,
            relay: PublishSubject::new(),
            upstream: None,
            connecting: false,
            generation: 0,
        }));

        Observable::create(move |observer| {
            let (inner, stale, connect) = state.lock().join(observer);

            drop(stale);

            if let Some(Connect { relay, generation }) = connect {
                // observers may re-enter the share state while the source emits
                let upstream = source.subscribe_with(relay.as_observer());
                let unused = state.lock().connected(generation, upstream);

                drop(unused);
            }

            let state = Arc::clone(&state);

            Subscription::new(move || {
                inner.unsubscribe();

                let upstream = state.lock().leave();

                drop(upstream);
            })
        })
    }
}
