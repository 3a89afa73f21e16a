use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{
    stream::{notification::Notification, observable::Observable, observer::Observer},
    subscription::Subscription,
};

impl<T: fmt::Debug + Send + 'static> Observable<T> {
    /// Logs subscribe, next, completed and disposed events under `label`.
    pub fn debug(&self, label: impl Into<String>) -> Observable<T> {
        let source = self.clone();
        let label: Arc<str> = label.into().into();

        Observable::create(move |observer: Observer<T>| {
            debug!(label = %label, "subscribed");

            let inner = source.subscribe_with(Observer::new({
                let label = Arc::clone(&label);

                move |notification: Notification<T>| {
                    match &notification {
                        Notification::Next(value) => debug!(label = %label, ?value, "next"),
                        Notification::Complete => debug!(label = %label, "completed"),
                    }

                    observer.notify(notification)
                }
            }));
            let label = Arc::clone(&label);

            Subscription::new(move || {
                inner.unsubscribe();

                debug!(label = %label, "disposed");
            })
        })
    }
}

#[cfg(test)]
mod test {
    use futures::{executor::block_on, StreamExt};

    use crate::Observable;

    #[test]
    fn passes_values_through() {
        block_on(async {
            let all_events = Observable::from_values(["a", "b"])
                .debug("letters")
                .subscribe()
                .collect::<Vec<_>>()
                .await;

            assert_eq!(all_events, ["a", "b"]);
        });
    }
}
