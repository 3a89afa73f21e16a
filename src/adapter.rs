//! Tick observables and the cold-to-hot conversions.
//!
//! | adapter | upstream connected | upstream released |
//! |---|---|---|
//! | [`cold_ticks`] | per subscription | with that subscription |
//! | [`hot_ticks`] | by the caller | with the producer |
//! | [`HotTicks`] | at construction | with the last handle |
//! | [`make_hot`] | at construction | with the adapter |
//! | [`make_hot_ref_counted`] | at construction | when the count drops to zero |
//! | [`Observable::share`](crate::Observable::share) | first subscriber | when the count drops to zero |

mod cold;
mod hot;
mod make_hot;
mod ref_count;

pub use cold::cold_ticks;
pub use hot::{hot_ticks, HotTicks};
pub use make_hot::{make_hot, NaiveHot};
pub use ref_count::{make_hot_ref_counted, make_hot_ref_counted_publish, RefCountGate, RefCounted};
