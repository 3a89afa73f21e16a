use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    stream::observable::Observable,
    subject::{PublishSubject, Subject},
    subscription::Subscription,
};

struct GateState {
    count: usize,
    upstream: Option<Subscription>,
}

/// Subscriber count guarding one upstream subscription.
///
/// The count and the release decision live behind the same lock, so
/// concurrent releases can neither miss the drop to zero nor release the
/// upstream twice.
pub struct RefCountGate {
    state: Mutex<GateState>,
}

impl RefCountGate {
    pub fn new(upstream: Subscription) -> Self {
        Self {
            state: Mutex::new(GateState {
                count: 0,
                upstream: Some(upstream),
            }),
        }
    }

    /// Registers one more subscriber, returns the new count.
    pub fn acquire(&self) -> usize {
        let mut state = self.state.lock();

        state.count += 1;

        state.count
    }

    /// Unregisters one subscriber and releases the upstream when none are left.
    ///
    /// Returns the remaining count.
    pub fn release(&self) -> usize {
        let (count, upstream) = {
            let mut state = self.state.lock();

            let Some(count) = state.count.checked_sub(1) else {
                warn!("ref count released more often than acquired");

                return 0;
            };

            state.count = count;

            let upstream = if count == 0 {
                state.upstream.take()
            } else {
                None
            };

            (count, upstream)
        };

        if let Some(upstream) = upstream {
            debug!("last subscriber left, releasing upstream");

            upstream.unsubscribe();
        }

        count
    }

    pub fn count(&self) -> usize {
        self.state.lock().count
    }

    pub fn is_connected(&self) -> bool {
        self.state
            .lock()
            .upstream
            .as_ref()
            .is_some_and(|it| !it.is_closed())
    }
}

/// Cold-to-hot conversion that releases the source with its last subscriber.
///
/// The source is connected to `relay` when the adapter is built. Each
/// subscription to [`observable`](RefCounted::observable) holds one count on
/// the [`RefCountGate`]; when the count drops back to zero the upstream is
/// released. It is not connected again afterwards.
pub struct RefCounted<S: Subject> {
    relay: S,
    gate: Arc<RefCountGate>,
}

pub fn make_hot_ref_counted<S>(cold: &Observable<S::Item>, relay: S) -> RefCounted<S>
where
    S: Subject + Clone,
    S::Item: Send + 'static,
{
    let upstream = cold.subscribe_with(relay.as_observer());

    RefCounted {
        relay,
        gate: Arc::new(RefCountGate::new(upstream)),
    }
}

/// [`make_hot_ref_counted`] with a fresh [`PublishSubject`] as relay.
pub fn make_hot_ref_counted_publish<T>(cold: &Observable<T>) -> RefCounted<PublishSubject<T>>
where
    T: Clone + Send + 'static,
{
    make_hot_ref_counted(cold, PublishSubject::new())
}

impl<S> RefCounted<S>
where
    S: Subject + Clone,
    S::Item: Send + 'static,
{
    pub fn observable(&self) -> Observable<S::Item> {
        let relay = self.relay.clone();
        let gate = Arc::clone(&self.gate);

        Observable::create(move |observer| {
            gate.acquire();

            let inner = relay.subscribe(observer);
            let gate = Arc::clone(&gate);

            Subscription::new(move || {
                inner.unsubscribe();
                gate.release();
            })
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.gate.count()
    }

    pub fn is_connected(&self) -> bool {
        self.gate.is_connected()
    }

    pub fn gate(&self) -> &RefCountGate {
        &self.gate
    }
}

#[cfg(test)]
mod test {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        thread,
        time::Duration,
    };

    use parking_lot::Mutex;
    use tokio::time::sleep;

    use crate::{
        adapter::cold_ticks,
        config::TickConfig,
        subject::{PublishSubject, Subject},
        subscription::Subscription,
        Observable,
    };

    use super::{make_hot_ref_counted, make_hot_ref_counted_publish, RefCountGate};

    fn counted_release() -> (Subscription, Arc<AtomicUsize>) {
        let released = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::new({
            let released = Arc::clone(&released);

            move || {
                released.fetch_add(1, Ordering::SeqCst);
            }
        });

        (subscription, released)
    }

    #[test]
    fn gate_releases_exactly_on_last_release() {
        let (upstream, released) = counted_release();
        let gate = RefCountGate::new(upstream);

        for expected in 1..=3 {
            assert_eq!(gate.acquire(), expected);
        }

        assert_eq!(gate.release(), 2);
        assert_eq!(gate.release(), 1);
        assert_eq!(released.load(Ordering::SeqCst), 0);
        assert!(gate.is_connected());

        assert_eq!(gate.release(), 0);
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert!(!gate.is_connected());

        assert_eq!(gate.release(), 0);
        assert_eq!(gate.count(), 0);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn gate_survives_concurrent_releases() {
        const SUBSCRIBERS: usize = 64;

        let (upstream, released) = counted_release();
        let gate = Arc::new(RefCountGate::new(upstream));

        for _ in 0..SUBSCRIBERS {
            gate.acquire();
        }

        let handles = (0..SUBSCRIBERS)
            .map(|_| {
                let gate = Arc::clone(&gate);

                thread::spawn(move || {
                    gate.release();
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(gate.count(), 0);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscriptions_drive_the_count() {
        let source = PublishSubject::<usize>::new();
        let connections = Arc::new(AtomicUsize::new(0));
        let cold = Observable::create({
            let source = source.clone();
            let connections = Arc::clone(&connections);

            move |observer| {
                connections.fetch_add(1, Ordering::SeqCst);

                let inner = source.subscribe(observer);
                let connections = Arc::clone(&connections);

                Subscription::new(move || {
                    inner.unsubscribe();
                    connections.fetch_sub(1, Ordering::SeqCst);
                })
            }
        });
        let hot = make_hot_ref_counted(&cold, PublishSubject::new());
        let observable = hot.observable();

        assert_eq!(connections.load(Ordering::SeqCst), 1);
        assert_eq!(hot.subscriber_count(), 0);

        let subscriptions = (0..4)
            .map(|_| observable.subscribe_fn(|_| {}))
            .collect::<Vec<_>>();

        assert_eq!(hot.subscriber_count(), 4);

        for (index, subscription) in [2, 0, 3, 1].map(|it| (it, &subscriptions[it])) {
            assert_eq!(connections.load(Ordering::SeqCst), 1, "released early at {index}");

            subscription.unsubscribe();
            subscription.unsubscribe();
        }

        assert_eq!(hot.subscriber_count(), 0);
        assert_eq!(connections.load(Ordering::SeqCst), 0);
        assert!(!hot.is_connected());

        drop(subscriptions);

        assert_eq!(hot.subscriber_count(), 0);
    }

    #[test]
    fn subscriptions_released_across_threads() {
        const SUBSCRIBERS: usize = 32;

        let source = PublishSubject::<usize>::new();
        let released = Arc::new(AtomicUsize::new(0));
        let cold = Observable::create({
            let source = source.clone();
            let released = Arc::clone(&released);

            move |observer| {
                let inner = source.subscribe(observer);
                let released = Arc::clone(&released);

                Subscription::new(move || {
                    inner.unsubscribe();
                    released.fetch_add(1, Ordering::SeqCst);
                })
            }
        });
        let hot = make_hot_ref_counted(&cold, PublishSubject::new());
        let observable = hot.observable();
        let subscriptions = (0..SUBSCRIBERS)
            .map(|_| observable.subscribe_fn(|_| {}))
            .collect::<Vec<_>>();

        assert_eq!(hot.gate().count(), SUBSCRIBERS);

        let emitter = thread::spawn({
            let source = source.clone();

            move || {
                for value in 0..1_000 {
                    source.next(value);
                }
            }
        });
        let handles = subscriptions
            .into_iter()
            .enumerate()
            .map(|(index, subscription)| {
                thread::spawn(move || {
                    if index % 2 == 0 {
                        subscription.unsubscribe();
                    }

                    drop(subscription);
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().unwrap();
        }

        emitter.join().unwrap();

        assert_eq!(hot.gate().count(), 0);
        assert_eq!(hot.subscriber_count(), 0);
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert!(!hot.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_shared_until_the_last_subscriber_leaves() {
        let cold = cold_ticks(TickConfig::default()).unwrap();
        let hot = make_hot_ref_counted_publish(&cold);
        let observable = hot.observable();
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let a = observable.subscribe_fn({
            let first = Arc::clone(&first);

            move |it| first.lock().push(it)
        });

        sleep(Duration::from_millis(1_500)).await;

        let b = observable.subscribe_fn({
            let second = Arc::clone(&second);

            move |it| second.lock().push(it)
        });

        sleep(Duration::from_millis(1_000)).await;

        a.unsubscribe();
        assert!(hot.is_connected());

        sleep(Duration::from_millis(1_000)).await;

        b.unsubscribe();
        assert!(!hot.is_connected());

        sleep(Duration::from_millis(2_000)).await;

        assert_eq!(*first.lock(), [0, 1]);
        assert_eq!(*second.lock(), [1, 2]);
    }
}
