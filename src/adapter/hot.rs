use std::sync::{Arc, Weak};

use crate::{
    config::TickConfig, error::Result, producer::Producer, stream::observable::Observable,
    subscription::Subscription,
};

/// Hot tick source that owns its producer.
///
/// The producer is started on construction and stops once this handle and
/// every observable it handed out are gone.
#[derive(Debug)]
pub struct HotTicks {
    producer: Arc<Producer>,
}

impl HotTicks {
    pub fn new(config: TickConfig) -> Result<Self> {
        Ok(Self {
            producer: Arc::new(Producer::started(config)?),
        })
    }

    pub fn observable(&self) -> Observable<u64> {
        hot_ticks(&self.producer)
    }

    pub fn producer(&self) -> &Arc<Producer> {
        &self.producer
    }
}

/// Ticks from one producer shared by every subscriber.
///
/// The producer lives outside of any subscription. Subscribing registers a
/// listener, releasing removes that listener again and leaves the producer
/// running. Subscribers see the live counter, never earlier ticks.
pub fn hot_ticks(producer: &Arc<Producer>) -> Observable<u64> {
    let producer = Arc::clone(producer);

    Observable::create(move |observer| {
        let id = producer.add_listener(move |tick| observer.next(tick));
        let producer: Weak<Producer> = Arc::downgrade(&producer);

        Subscription::new(move || {
            if let Some(producer) = producer.upgrade() {
                producer.remove_listener(id);
            }
        })
    })
}
