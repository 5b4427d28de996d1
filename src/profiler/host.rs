//! Single-slot owner of the profiler instance.
//!
//! The application creates one `ProfilerHost` at start-up and hands it (or
//! the profiler inside it) to the loop driver and to instrumented code. A
//! second install and any access before install are caller bugs and panic.

use super::clock::{Clock, MonotonicClock};
use super::engine::Profiler;
use crate::span::SpanId;
use log::info;

/// Owning container that holds at most one profiler
#[derive(Debug)]
pub struct ProfilerHost<C: Clock = MonotonicClock> {
    slot: Option<Profiler<C>>,
}

impl<C: Clock> Default for ProfilerHost<C> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<C: Clock> ProfilerHost<C> {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the profiler instance
    ///
    /// # Panics
    /// If a profiler is already installed.
    pub fn install(&mut self, profiler: Profiler<C>) -> &mut Profiler<C> {
        assert!(self.slot.is_none(), "Created two profilers");
        info!("Profiler installed");
        self.slot.insert(profiler)
    }

    /// Remove and return the instance, leaving the host empty
    pub fn take(&mut self) -> Option<Profiler<C>> {
        let profiler = self.slot.take();
        if profiler.is_some() {
            info!("Profiler torn down");
        }
        profiler
    }

    pub fn is_installed(&self) -> bool {
        self.slot.is_some()
    }

    /// # Panics
    /// If no profiler is installed.
    pub fn get(&self) -> &Profiler<C> {
        match &self.slot {
            Some(profiler) => profiler,
            None => panic!("Null profiler: queried before initialization"),
        }
    }

    /// # Panics
    /// If no profiler is installed.
    pub fn get_mut(&mut self) -> &mut Profiler<C> {
        match &mut self.slot {
            Some(profiler) => profiler,
            None => panic!("Null profiler: queried before initialization"),
        }
    }

    pub fn push_mark(&mut self, name: &str, description: &str) -> SpanId {
        self.get_mut().push_mark(name, description)
    }

    pub fn pop_mark(&mut self) -> SpanId {
        self.get_mut().pop_mark()
    }

    /// False when no profiler is installed
    pub fn is_shown(&self) -> bool {
        self.slot.as_ref().is_some_and(|p| p.is_shown())
    }

    pub fn is_time_shown(&self) -> bool {
        self.slot.as_ref().is_some_and(|p| p.is_time_shown())
    }

    pub fn is_log_shown(&self) -> bool {
        self.slot.as_ref().is_some_and(|p| p.is_log_shown())
    }
}
