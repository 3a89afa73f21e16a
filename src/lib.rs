pub mod adapter;
pub mod config;
pub mod error;
pub mod producer;
pub mod reducer;
pub mod stream;
pub mod stream_ext;
pub mod subject;
pub mod subscription;

pub use stream::{
    notification::Notification, observable::Observable, observer::Observer, subscriber::Subscriber,
};

pub mod prelude {
    pub use crate::adapter::*;
    pub use crate::config::TickConfig;
    pub use crate::error::{Error, Result};
    pub use crate::producer::{ListenerId, Producer};
    pub use crate::reducer::{Action, ActionReducer};
    pub use crate::stream::{
        notification::Notification, observable::Observable, observer::Observer,
        subscriber::Subscriber,
    };
    pub use crate::subject::*;
    pub use crate::subscription::{DisposeBag, Subscription};
}
