use parking_lot::Mutex;

type Teardown = Box<dyn FnOnce() + Send>;

/// Handle to a live subscription.
///
/// Owns the release action of whatever was set up by `subscribe`. The action
/// runs at most once: the first call to [`unsubscribe`](Subscription::unsubscribe),
/// or dropping the handle, releases; every later call is a no-op.
#[must_use = "dropping a subscription releases it"]
pub struct Subscription {
    teardown: Mutex<Option<Teardown>>,
}

impl Subscription {
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self::new(|| {})
    }

    /// Releases all subscriptions together, in the given order.
    pub fn composite<I>(subscriptions: I) -> Self
    where
        I: IntoIterator<Item = Subscription>,
    {
        let subscriptions = subscriptions.into_iter().collect::<Vec<_>>();

        Self::new(move || {
            for subscription in subscriptions {
                subscription.unsubscribe();
            }
        })
    }

    pub fn unsubscribe(&self) {
        // the lock only guards the take, teardown may re-enter other subscriptions
        let teardown = self.teardown.lock().take();

        if let Some(teardown) = teardown {
            teardown();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.teardown.lock().is_none()
    }

    /// Hands this subscription over to `bag`, which releases it on dispose.
    pub fn disposed_by(self, bag: &DisposeBag) {
        bag.insert(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("is_closed", &self.is_closed())
            .finish()
    }
}

/// Collects subscriptions and releases them all at once.
#[derive(Default)]
pub struct DisposeBag {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl DisposeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, subscription: Subscription) {
        self.subscriptions.lock().push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dispose(&self) {
        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());

        for subscription in subscriptions {
            subscription.unsubscribe();
        }
    }
}

impl Drop for DisposeBag {
    fn drop(&mut self) {
        self.dispose();
    }
}
