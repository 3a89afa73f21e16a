use tracing::warn;

use crate::{
    config::TickConfig,
    error::Result,
    producer::Producer,
    stream::observable::Observable,
    subscription::Subscription,
};

/// Ticks from a producer created for each subscriber.
///
/// Every subscription builds and starts its own [`Producer`], so counters are
/// never shared and always start from [`TickConfig::initial`]. Releasing the
/// subscription stops that producer.
pub fn cold_ticks(config: TickConfig) -> Result<Observable<u64>> {
    config.validate()?;

    Ok(Observable::create(move |observer| {
        let producer = match Producer::new(config) {
            Ok(producer) => producer,
            Err(error) => {
                warn!(%error, "cold producer could not be created");
                observer.complete();

                return Subscription::empty();
            }
        };

        producer.add_listener({
            let observer = observer.clone();

            move |tick| observer.next(tick)
        });

        if let Err(error) = producer.start() {
            warn!(%error, "cold producer could not be started");
            observer.complete();

            return Subscription::empty();
        }

        Subscription::new(move || producer.stop())
    }))
}
