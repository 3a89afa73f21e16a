use std::sync::Arc;

use crate::stream::{notification::Notification, observable::Observable, observer::Observer};

impl<T: Send + 'static> Observable<T> {
    pub fn map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);

        Observable::create(move |observer: Observer<U>| {
            let f = Arc::clone(&f);

            source.subscribe_with(Observer::new(move |notification: Notification<T>| {
                observer.notify(notification.map(|it| f(it)))
            }))
        })
    }
}
