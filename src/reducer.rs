//! Filter log folded from a stream of user actions.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    stream::{notification::Notification, observable::Observable, observer::Observer},
    subject::{PublishSubject, Subject},
    subscription::Subscription,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Delete(String),
}

impl Action {
    /// One fold step over the filter log.
    ///
    /// `Add` appends even when the name is already present. `Delete` removes
    /// every equal entry and is a no-op for unknown names.
    pub fn apply(&self, filters: &mut Vec<String>) {
        match self {
            Action::Add(name) => filters.push(name.clone()),
            Action::Delete(name) => filters.retain(|it| it != name),
        }
    }
}

/// Holds the current filter log and republishes it after every action.
///
/// Only observers attached when an action arrives receive the new log.
pub struct ActionReducer {
    actions: PublishSubject<Action>,
    states: PublishSubject<Vec<String>>,
    current: Arc<Mutex<Vec<String>>>,
    _fold: Subscription,
}

impl Default for ActionReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionReducer {
    pub fn new() -> Self {
        let actions = PublishSubject::new();
        let states = PublishSubject::new();
        let current = Arc::new(Mutex::new(Vec::new()));
        let fold = actions
            .as_observable()
            .scan(Vec::new(), |filters: &mut Vec<String>, action: Action| {
                action.apply(filters)
            })
            .subscribe_with(Observer::new({
                let states = states.clone();
                let current = Arc::clone(&current);

                move |notification: Notification<Vec<String>>| match notification {
                    Notification::Next(filters) => {
                        *current.lock() = filters.clone();
                        states.next(filters);
                    }
                    Notification::Complete => states.complete(),
                }
            }));

        Self {
            actions,
            states,
            current,
            _fold: fold,
        }
    }

    pub fn push(&self, action: Action) {
        self.actions.next(action);
    }

    pub fn add(&self, name: impl Into<String>) {
        self.push(Action::Add(name.into()));
    }

    pub fn delete(&self, name: impl Into<String>) {
        self.push(Action::Delete(name.into()));
    }

    /// Ends the action source, observers of [`states`](Self::states) complete.
    pub fn complete(&self) {
        self.actions.complete();
    }

    pub fn states(&self) -> Observable<Vec<String>> {
        self.states.as_observable()
    }

    /// Snapshot of the current filter log.
    pub fn filters(&self) -> Vec<String> {
        self.current.lock().clone()
    }

    /// Observer side of the action source, to feed it from another observable.
    pub fn actions(&self) -> Observer<Action> {
        self.actions.as_observer()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use futures::{executor::block_on, StreamExt};
    use parking_lot::Mutex;

    use crate::Observable;

    use super::{Action, ActionReducer};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|it| it.to_string()).collect()
    }

    #[test]
    fn smoke() {
        let reducer = ActionReducer::new();
        let states = reducer.states().subscribe();

        reducer.add("A");
        reducer.add("B");
        reducer.delete("A");
        reducer.complete();

        block_on(async {
            let all_states = states.collect::<Vec<_>>().await;

            assert_eq!(
                all_states,
                [strings(&["A"]), strings(&["A", "B"]), strings(&["B"])]
            );
        });
    }

    #[test]
    fn delete_of_unknown_name_emits_unchanged_log() {
        let reducer = ActionReducer::new();
        let states = reducer.states().subscribe();

        reducer.delete("Z");
        reducer.complete();

        block_on(async {
            assert_eq!(states.collect::<Vec<_>>().await, [Vec::<String>::new()]);
        });
    }

    #[test]
    fn duplicates_are_kept_and_removed_together() {
        let mut filters = Vec::new();

        Action::Add("Date filter".into()).apply(&mut filters);
        Action::Add("Date filter".into()).apply(&mut filters);
        Action::Add("Amount filter".into()).apply(&mut filters);

        assert_eq!(filters, strings(&["Date filter", "Date filter", "Amount filter"]));

        Action::Delete("Date filter".into()).apply(&mut filters);

        assert_eq!(filters, strings(&["Amount filter"]));
    }

    #[test]
    fn late_observer_sees_only_later_states() {
        let reducer = ActionReducer::new();

        reducer.add("Date filter");

        let late = Arc::new(Mutex::new(Vec::new()));
        let _late = reducer.states().subscribe_fn({
            let late = Arc::clone(&late);

            move |it| late.lock().push(it)
        });

        reducer.add("Amount filter");

        assert_eq!(*late.lock(), [strings(&["Date filter", "Amount filter"])]);
        assert_eq!(reducer.filters(), strings(&["Date filter", "Amount filter"]));
    }

    #[test]
    fn can_be_fed_from_another_observable() {
        let reducer = ActionReducer::new();
        let states = reducer.states().subscribe();
        let _feed = Observable::from_values([
            Action::Add("Date filter".into()),
            Action::Add("Amount filter".into()),
            Action::Delete("Amount filter".into()),
        ])
        .subscribe_with(reducer.actions());

        block_on(async {
            assert_eq!(
                states.collect::<Vec<_>>().await,
                [
                    strings(&["Date filter"]),
                    strings(&["Date filter", "Amount filter"]),
                    strings(&["Date filter"]),
                ]
            );
        });
    }
}
