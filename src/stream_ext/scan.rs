use std::sync::Arc;

use parking_lot::Mutex;

use crate::stream::{notification::Notification, observable::Observable, observer::Observer};

impl<T: Send + 'static> Observable<T> {
    /// Folds every value into an accumulator and emits a copy of it after each step.
    ///
    /// Each subscription starts from its own clone of `seed`.
    pub fn scan<A, F>(&self, seed: A, f: F) -> Observable<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(&mut A, T) + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);

        Observable::create(move |observer: Observer<A>| {
            let accumulator = Mutex::new(seed.clone());
            let f = Arc::clone(&f);

            source.subscribe_with(Observer::new(move |notification| match notification {
                Notification::Next(value) => {
                    let state = {
                        let mut accumulator = accumulator.lock();

                        f(&mut accumulator, value);
                        accumulator.clone()
                    };

                    observer.next(state);
                }
                Notification::Complete => observer.complete(),
            }))
        })
    }
}

#[cfg(test)]
mod test {
    use futures::{executor::block_on, StreamExt};

    use crate::Observable;

    #[test]
    fn smoke() {
        block_on(async {
            let all_events = Observable::from_values(1..=4)
                .scan(0, |sum, it| *sum += it)
                .subscribe()
                .collect::<Vec<_>>()
                .await;

            assert_eq!(all_events, [1, 3, 6, 10]);
        });
    }

    #[test]
    fn every_subscription_starts_from_the_seed() {
        let sums = Observable::from_values(1..=2).scan(100, |sum, it| *sum += it);

        block_on(async {
            assert_eq!(sums.subscribe().collect::<Vec<_>>().await, [101, 103]);
            assert_eq!(sums.subscribe().collect::<Vec<_>>().await, [101, 103]);
        });
    }
}
