use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::{
    stream::{notification::Notification, observable::Observable, observer::Observer},
    subscription::Subscription,
};

use super::Subject;

struct SubjectState<T> {
    is_closed: bool,
    next_id: u64,
    observers: Vec<(u64, Observer<T>)>,
}

/// Multicast relay without replay.
///
/// Each value goes to the observers attached at that moment. Late observers
/// see nothing of the past, and once completed the subject completes every
/// new observer immediately.
pub struct PublishSubject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T> Clone for PublishSubject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for PublishSubject<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                is_closed: false,
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }
}

impl<T: Clone + Send + 'static> PublishSubject<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().is_closed
    }

    pub fn as_observable(&self) -> Observable<T> {
        let subject = self.clone();

        Observable::create(move |observer| Subject::subscribe(&subject, observer))
    }

    fn observers(&self) -> Vec<Observer<T>> {
        self.state
            .lock()
            .observers
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect()
    }
}

impl<T: Clone + Send + 'static> Subject for PublishSubject<T> {
    type Item = T;

    fn subscribe(&self, observer: Observer<T>) -> Subscription {
        let id = {
            let mut state = self.state.lock();

            if state.is_closed {
                None
            } else {
                let id = state.next_id;

                state.next_id += 1;
                state.observers.push((id, observer.clone()));

                Some(id)
            }
        };

        let Some(id) = id else {
            observer.complete();

            return Subscription::empty();
        };

        let state = Arc::downgrade(&self.state);

        Subscription::new(move || remove(&state, id))
    }

    fn next(&self, value: T) {
        for observer in self.observers() {
            observer.next(value.clone());
        }
    }

    fn complete(&self) {
        let observers = {
            let mut state = self.state.lock();

            if state.is_closed {
                return;
            }

            state.is_closed = true;
            std::mem::take(&mut state.observers)
        };

        for (_, observer) in observers {
            observer.complete();
        }
    }

    fn observer_count(&self) -> usize {
        self.state.lock().observers.len()
    }

    fn as_observer(&self) -> Observer<T> {
        let subject = self.clone();

        Observer::new(move |notification| match notification {
            Notification::Next(value) => subject.next(value),
            Notification::Complete => subject.complete(),
        })
    }
}

fn remove<T>(state: &Weak<Mutex<SubjectState<T>>>, id: u64) {
    let removed = state.upgrade().and_then(|state| {
        let mut state = state.lock();
        let index = state.observers.iter().position(|(it, _)| *it == id)?;

        Some(state.observers.remove(index))
    });

    // dropped outside the lock, the observer may own other subscriptions
    drop(removed);
}
