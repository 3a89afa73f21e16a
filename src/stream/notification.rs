/// A single signal delivered to an [`Observer`](super::observer::Observer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T> {
    Next(T),
    Complete,
}

impl<T> Notification<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Notification::Next(it) => Some(it),
            Notification::Complete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Notification::Complete)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Notification<U> {
        match self {
            Notification::Next(it) => Notification::Next(f(it)),
            Notification::Complete => Notification::Complete,
        }
    }
}
