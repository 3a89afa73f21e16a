//! Periodic tick source.
//!
//! A [`Producer`] owns a counter and a list of listeners. Once started, it
//! wakes up every [`TickConfig::interval`], hands the current counter to every
//! listener registered at that moment, then bumps the counter by one.
//!
//! The timer runs as a task on the current tokio runtime and only keeps a
//! [`Weak`] handle to the producer state, so dropping the [`Producer`] is enough
//! to end it.

use std::{
    fmt,
    sync::{Arc, Weak},
    time::Duration,
};

use parking_lot::Mutex;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, trace};

use crate::{
    config::TickConfig,
    error::{Error, Result},
};

type Listener = Arc<dyn Fn(u64) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

enum Phase {
    Idle,
    Running(JoinHandle<()>),
    Stopped,
}

struct State {
    count: u64,
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
    phase: Phase,
}

struct Inner {
    config: TickConfig,
    state: Mutex<State>,
}

impl Inner {
    /// Runs one listener pass, returns `false` once the producer stopped.
    fn tick(&self) -> bool {
        let (count, listeners) = {
            let mut state = self.state.lock();

            if !matches!(state.phase, Phase::Running(_)) {
                return false;
            }

            let count = state.count;
            let listeners = state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect::<Vec<_>>();

            state.count = state.count.wrapping_add(1);

            (count, listeners)
        };

        trace!(count, listeners = listeners.len(), "tick");

        for listener in listeners {
            listener(count);
        }

        true
    }
}

pub struct Producer {
    inner: Arc<Inner>,
}

impl Producer {
    pub fn new(config: TickConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(State {
                    count: config.initial,
                    next_id: 0,
                    listeners: Vec::new(),
                    phase: Phase::Idle,
                }),
            }),
        })
    }

    /// Creates a producer and starts it right away.
    pub fn started(config: TickConfig) -> Result<Self> {
        let producer = Self::new(config)?;

        producer.start()?;

        Ok(producer)
    }

    /// Starts the timer, the first tick fires one interval from now.
    ///
    /// Starting a running producer does nothing. A stopped producer stays stopped.
    pub fn start(&self) -> Result<()> {
        let mut state = self.inner.state.lock();

        match state.phase {
            Phase::Running(_) => return Ok(()),
            Phase::Stopped => return Err(Error::Stopped),
            Phase::Idle => {}
        }

        let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let task = handle.spawn(run(Arc::downgrade(&self.inner), self.inner.config.interval));

        state.phase = Phase::Running(task);

        debug!(interval = ?self.inner.config.interval, "producer started");

        Ok(())
    }

    /// Stops the timer for good and drops every listener.
    pub fn stop(&self) {
        let (phase, listeners) = {
            let mut state = self.inner.state.lock();

            if matches!(state.phase, Phase::Stopped) {
                return;
            }

            (
                std::mem::replace(&mut state.phase, Phase::Stopped),
                std::mem::take(&mut state.listeners),
            )
        };

        if let Phase::Running(task) = phase {
            task.abort();
        }

        debug!(listeners = listeners.len(), "producer stopped");
    }

    /// Registers `listener` for all future ticks.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        let mut state = self.inner.state.lock();
        let id = ListenerId(state.next_id);

        state.next_id += 1;
        state.listeners.push((id, Arc::new(listener)));

        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.inner.state.lock();
        let len = state.listeners.len();

        state.listeners.retain(|(it, _)| *it != id);

        state.listeners.len() != len
    }

    pub fn is_running(&self) -> bool {
        matches!(self.inner.state.lock().phase, Phase::Running(_))
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.inner.state.lock().phase, Phase::Stopped)
    }

    /// Value the next tick will carry, wraps to zero after `u64::MAX`.
    pub fn count(&self) -> u64 {
        self.inner.state.lock().count
    }

    pub fn listener_count(&self) -> usize {
        self.inner.state.lock().listeners.len()
    }

    pub fn config(&self) -> &TickConfig {
        &self.inner.config
    }
}

impl Drop for Producer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        let phase = match state.phase {
            Phase::Idle => "idle",
            Phase::Running(_) => "running",
            Phase::Stopped => "stopped",
        };

        f.debug_struct("Producer")
            .field("count", &state.count)
            .field("listeners", &state.listeners.len())
            .field("phase", &phase)
            .finish()
    }
}

async fn run(inner: Weak<Inner>, period: Duration) {
    let mut interval = time::interval_at(Instant::now() + period, period);

    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(inner) = inner.upgrade() else {
            break;
        };

        if !inner.tick() {
            break;
        }
    }
}
