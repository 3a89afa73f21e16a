pub mod notification;
pub mod observable;
pub mod observer;
pub mod subscriber;
