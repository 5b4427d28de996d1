//! The profiler engine: four phase trees, one aggregator, display flags.
//!
//! Call sites push and pop marks on whichever phase is open. The loop driver
//! moves between phases with `enter_phase` and closes each frame with
//! `end_frame`, which folds every phase that ran into the history.

use super::clock::{Clock, MonotonicClock};
use crate::aggregator::{Aggregator, Rotation};
use crate::span::{Phase, PhaseMap, SpanId, SpanTree};
use crate::utils::config::ProfilerConfig;
use crate::utils::error::ConfigError;
use log::{debug, trace};

/// What happened at a frame boundary
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Index of the frame that just ended, starting at 0
    pub frame: u64,

    /// Which phase trees ran and were folded into the history
    pub processed: PhaseMap<bool>,

    /// The rotation performed at this boundary, if any
    pub rotation: Option<Rotation>,
}

impl FrameReport {
    pub fn ran(&self, phase: Phase) -> bool {
        self.processed[phase]
    }

    pub fn rotated(&self) -> bool {
        self.rotation.is_some()
    }
}

/// Hierarchical frame profiler
///
/// **Public** - the single owned instance every call site is handed
#[derive(Debug)]
pub struct Profiler<C: Clock = MonotonicClock> {
    clock: C,
    live: PhaseMap<SpanTree>,
    finished: PhaseMap<SpanTree>,
    open: Option<Phase>,
    aggregator: Aggregator,
    frames: u64,
    shown: bool,
    show_time: bool,
    show_log: bool,
}

impl Profiler<MonotonicClock> {
    /// Create a profiler reading the system monotonic clock
    pub fn new(config: ProfilerConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> Profiler<C> {
    /// Create a profiler reading time from `clock`
    ///
    /// # Errors
    /// * `ConfigError::InvalidSampleRate` - the sampling window is unusable
    pub fn with_clock(config: ProfilerConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!("Creating profiler with {}s sampling window", config.sample_rate);

        let new_tree = |phase: Phase| SpanTree::new(phase.name(), phase.description());

        Ok(Self {
            clock,
            live: PhaseMap::from_fn(new_tree),
            finished: PhaseMap::from_fn(new_tree),
            open: None,
            aggregator: Aggregator::new(config.sample_rate),
            frames: 0,
            shown: config.shown,
            show_time: config.show_time,
            show_log: config.show_log,
        })
    }

    /// Open a mark named `name` under the active span of the open phase
    ///
    /// # Panics
    /// If no phase is open.
    pub fn push_mark(&mut self, name: &str, description: &str) -> SpanId {
        let phase = match self.open {
            Some(phase) => phase,
            None => panic!("Mark '{}' pushed with no phase open", name),
        };
        let now = self.clock.now_seconds();
        self.live[phase].push_mark(name, description, now)
    }

    /// Close the active mark of the open phase
    ///
    /// # Panics
    /// If no phase is open, or the active span is the phase root.
    pub fn pop_mark(&mut self) -> SpanId {
        let phase = match self.open {
            Some(phase) => phase,
            None => panic!("Mark popped with no phase open"),
        };
        let now = self.clock.now_seconds();
        self.live[phase].pop_mark(now)
    }

    /// Run `f` inside a mark, popping it afterwards
    pub fn with_mark<R>(
        &mut self,
        name: &str,
        description: &str,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.push_mark(name, description);
        let result = f(self);
        self.pop_mark();
        result
    }

    /// Switch the open phase to `phase` at a single clock instant
    ///
    /// The previous phase (whichever it is) closes at the same time the new
    /// one opens. Entering the phase that is already open does nothing.
    ///
    /// # Panics
    /// If the previous phase still has marks open.
    pub fn enter_phase(&mut self, phase: Phase) {
        if self.open == Some(phase) {
            return;
        }
        let now = self.clock.now_seconds();
        if let Some(previous) = self.open {
            self.live[previous].close(now);
        }
        self.live[phase].open(now);
        self.open = Some(phase);
        trace!("Entered phase {}", phase);
    }

    /// Close the open phase, if there is one
    ///
    /// # Panics
    /// If the open phase still has marks open.
    pub fn leave_phase(&mut self) {
        if let Some(previous) = self.open.take() {
            let now = self.clock.now_seconds();
            self.live[previous].close(now);
            trace!("Left phase {}", previous);
        }
    }

    /// The currently open phase
    pub fn open_phase(&self) -> Option<Phase> {
        self.open
    }

    /// Finish the frame: fold phase trees, install fresh roots, sample
    ///
    /// Every phase that ran this frame is processed exactly once and becomes
    /// the finished tree shown by presentation code. Phases that did not run
    /// keep their last finished tree.
    ///
    /// # Panics
    /// If the open phase still has marks open.
    pub fn end_frame(&mut self, delta: f64) -> FrameReport {
        self.leave_phase();

        let mut report = FrameReport {
            frame: self.frames,
            ..FrameReport::default()
        };

        for phase in Phase::ALL {
            if self.live[phase].activations() == 0 {
                continue;
            }
            self.aggregator.process_node_average(&self.live[phase]);
            std::mem::swap(&mut self.live[phase], &mut self.finished[phase]);
            self.live[phase].reset();
            report.processed[phase] = true;
        }

        report.rotation = self.aggregator.end_frame(delta);
        self.frames += 1;
        report
    }

    /// Tree of `phase` being recorded this frame
    pub fn live_tree(&self, phase: Phase) -> &SpanTree {
        &self.live[phase]
    }

    /// Last finished tree of `phase`, for presentation
    pub fn finished_tree(&self, phase: Phase) -> &SpanTree {
        &self.finished[phase]
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Frames ended so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> f64 {
        self.aggregator.fps()
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    /// Flip visibility, as bound to the overlay hotkey
    pub fn toggle_shown(&mut self) -> bool {
        self.shown = !self.shown;
        debug!("Profiler overlay {}", if self.shown { "shown" } else { "hidden" });
        self.shown
    }

    /// Whether the frame-time window should be drawn
    pub fn is_time_shown(&self) -> bool {
        self.shown && self.show_time
    }

    pub fn set_show_time(&mut self, show: bool) {
        self.show_time = show;
    }

    /// Whether the log window should be drawn
    pub fn is_log_shown(&self) -> bool {
        self.shown && self.show_log
    }

    pub fn set_show_log(&mut self, show: bool) {
        self.show_log = show;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::clock::ManualClock;
    use pretty_assertions::assert_eq;

    fn manual_profiler(sample_rate: f64) -> (Profiler<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = ProfilerConfig::new().with_sample_rate(sample_rate);
        let profiler = Profiler::with_clock(config, clock.clone()).unwrap();
        (profiler, clock)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ProfilerConfig::new().with_sample_rate(0.0);
        assert!(Profiler::with_clock(config, ManualClock::new()).is_err());
    }

    #[test]
    fn test_phase_transitions_partition_time() {
        let (mut profiler, clock) = manual_profiler(0.5);

        profiler.enter_phase(Phase::Update);
        clock.advance(0.004);
        profiler.enter_phase(Phase::Draw);
        clock.advance(0.003);
        profiler.enter_phase(Phase::Swap);
        clock.advance(0.002);
        profiler.end_frame(0.009);

        let total: f64 = [Phase::Update, Phase::Draw, Phase::Swap]
            .iter()
            .map(|p| profiler.finished_tree(*p).root().total_time())
            .sum();
        assert!((total - 0.009).abs() < 1e-12);
        assert!((profiler.finished_tree(Phase::Draw).root().total_time() - 0.003).abs() < 1e-12);
        assert_eq!(profiler.open_phase(), None);
    }

    #[test]
    fn test_marks_land_in_open_phase() {
        let (mut profiler, clock) = manual_profiler(0.5);

        profiler.enter_phase(Phase::Update);
        profiler.with_mark("Physics", "rigid bodies", |p| {
            clock.advance(0.002);
            p.with_mark("Broadphase", "", |_| clock.advance(0.001));
        });
        let report = profiler.end_frame(0.003);

        assert!(report.ran(Phase::Update));
        assert!(!report.ran(Phase::Draw));

        let tree = profiler.finished_tree(Phase::Update);
        let physics = tree.find_child(SpanId::ROOT, "Physics").unwrap();
        let broadphase = tree.find_child(physics, "Broadphase").unwrap();
        assert!((tree.get(physics).total_time() - 0.003).abs() < 1e-12);
        assert!((tree.get(broadphase).total_time() - 0.001).abs() < 1e-12);
        assert!(profiler.live_tree(Phase::Update).has_no_marks());
    }

    #[test]
    fn test_reentered_phase_accumulates_within_frame() {
        let (mut profiler, clock) = manual_profiler(0.5);

        for _ in 0..3 {
            profiler.enter_phase(Phase::FixedUpdate);
            profiler.push_mark("Step", "");
            clock.advance(0.001);
            profiler.pop_mark();
            profiler.enter_phase(Phase::Update);
        }
        let report = profiler.end_frame(0.003);

        assert!(report.ran(Phase::FixedUpdate));
        let fixed = profiler.finished_tree(Phase::FixedUpdate);
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed.activations(), 3);
        assert!((fixed.root().total_time() - 0.003).abs() < 1e-12);
        let history = profiler.aggregator().history("Step").unwrap();
        assert!((history.current() - 0.003).abs() < 1e-12);
    }

    #[test]
    fn test_phase_not_run_keeps_last_finished_tree() {
        let (mut profiler, clock) = manual_profiler(0.5);

        profiler.enter_phase(Phase::Swap);
        clock.advance(0.002);
        profiler.end_frame(0.002);

        profiler.enter_phase(Phase::Update);
        clock.advance(0.001);
        let report = profiler.end_frame(0.001);

        assert!(!report.ran(Phase::Swap));
        assert!((profiler.finished_tree(Phase::Swap).root().total_time() - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_entering_open_phase_keeps_marks() {
        let (mut profiler, clock) = manual_profiler(0.5);

        profiler.enter_phase(Phase::Update);
        profiler.push_mark("AI", "");
        clock.advance(0.001);
        profiler.enter_phase(Phase::Update);

        let live = profiler.live_tree(Phase::Update);
        assert_eq!(live.depth(), 1);
        assert!(!live.is_at_root());
        assert_eq!(live.activations(), 1);

        clock.advance(0.001);
        profiler.pop_mark();
        profiler.end_frame(0.002);

        let tree = profiler.finished_tree(Phase::Update);
        let ai = tree.find_child(SpanId::ROOT, "AI").unwrap();
        assert!((tree.get(ai).total_time() - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_leave_phase_without_open_phase_does_nothing() {
        let (mut profiler, _clock) = manual_profiler(0.5);

        profiler.leave_phase();
        assert_eq!(profiler.open_phase(), None);

        profiler.enter_phase(Phase::Draw);
        profiler.leave_phase();
        profiler.leave_phase();
        assert_eq!(profiler.open_phase(), None);
        assert!(!profiler.live_tree(Phase::Draw).is_open());
    }

    #[test]
    fn test_empty_frame_is_counted() {
        let (mut profiler, _clock) = manual_profiler(0.5);

        let report = profiler.end_frame(0.016);

        assert_eq!(report.frame, 0);
        assert!(Phase::ALL.iter().all(|phase| !report.ran(*phase)));
        assert!(!report.rotated());
        assert_eq!(profiler.frames(), 1);
        assert_eq!(profiler.aggregator().frame_count(), 1);
        assert!(profiler.aggregator().is_empty());
    }

    #[test]
    fn test_phase_not_run_samples_zero() {
        let (mut profiler, clock) = manual_profiler(0.5);

        profiler.enter_phase(Phase::Swap);
        clock.advance(0.002);
        assert!(profiler.end_frame(0.5).rotated());
        assert!((profiler.aggregator().latest_ms("Swap") - 2.0).abs() < 1e-9);

        profiler.enter_phase(Phase::Update);
        clock.advance(0.001);
        let report = profiler.end_frame(0.5);

        assert!(report.rotated());
        assert!(!report.ran(Phase::Swap));
        let aggregator = profiler.aggregator();
        let swap = aggregator.history("Swap").unwrap();
        assert_eq!(aggregator.latest_ms("Swap"), 0.0);
        assert!((swap.past()[0] - 2.0).abs() < 1e-9);
        assert!((profiler.finished_tree(Phase::Swap).root().total_time() - 0.002).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "still open")]
    fn test_end_frame_with_open_mark_panics() {
        let (mut profiler, _clock) = manual_profiler(0.5);
        profiler.enter_phase(Phase::Draw);
        profiler.push_mark("Scene", "");
        profiler.end_frame(0.016);
    }

    #[test]
    #[should_panic(expected = "still open")]
    fn test_switching_phase_with_open_mark_panics() {
        let (mut profiler, _clock) = manual_profiler(0.5);
        profiler.enter_phase(Phase::Update);
        profiler.push_mark("AI", "");
        profiler.enter_phase(Phase::Draw);
    }

    #[test]
    #[should_panic(expected = "no phase open")]
    fn test_push_without_phase_panics() {
        let (mut profiler, _clock) = manual_profiler(0.5);
        profiler.push_mark("Orphan", "");
    }

    #[test]
    #[should_panic(expected = "Too many popped marks")]
    fn test_pop_at_phase_root_panics() {
        let (mut profiler, _clock) = manual_profiler(0.5);
        profiler.enter_phase(Phase::Update);
        profiler.pop_mark();
    }

    #[test]
    fn test_history_id_stable_across_frames() {
        let (mut profiler, clock) = manual_profiler(0.5);
        let mut ids = Vec::new();

        for _ in 0..5 {
            profiler.enter_phase(Phase::Update);
            profiler.push_mark("A", "");
            clock.advance(0.001);
            profiler.pop_mark();
            profiler.end_frame(0.001);
            ids.push(profiler.aggregator().history("A").unwrap().id());
        }

        assert!(ids.iter().all(|id| *id == ids[0]));
    }

    #[test]
    fn test_flags() {
        let (mut profiler, _clock) = manual_profiler(0.5);
        assert!(!profiler.is_shown());
        assert!(!profiler.is_time_shown());
        assert!(!profiler.is_log_shown());

        assert!(profiler.toggle_shown());
        assert!(profiler.is_time_shown());
        assert!(profiler.is_log_shown());

        profiler.set_show_log(false);
        assert!(!profiler.is_log_shown());
        assert!(profiler.is_time_shown());

        profiler.set_shown(false);
        profiler.set_show_time(true);
        assert!(!profiler.is_time_shown());
    }
}
