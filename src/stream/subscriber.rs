use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::{channel::mpsc::UnboundedReceiver, stream::FusedStream, Stream};
use pin_project_lite::pin_project;

use crate::subscription::Subscription;

pin_project! {
    /// Stream for the [`subscribe`](crate::Observable::subscribe) method.
    #[must_use = "streams do nothing unless polled"]
    pub struct Subscriber<T> {
        #[pin]
        receiver: UnboundedReceiver<T>,
        subscription: Subscription,
    }
}

impl<T> Subscriber<T> {
    pub(crate) fn new(receiver: UnboundedReceiver<T>, subscription: Subscription) -> Self {
        Self {
            receiver,
            subscription,
        }
    }

    /// Releases the subscription, values already received can still be polled.
    pub fn unsubscribe(&self) {
        self.subscription.unsubscribe();
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl<T> Stream for Subscriber<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let poll_next = this.receiver.poll_next(cx);

        if let Poll::Ready(None) = &poll_next {
            this.subscription.unsubscribe();
        }

        poll_next
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.receiver.size_hint()
    }
}

impl<T> FusedStream for Subscriber<T> {
    fn is_terminated(&self) -> bool {
        self.receiver.is_terminated()
    }
}
