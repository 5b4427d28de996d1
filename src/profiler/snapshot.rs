//! Capture a presentation snapshot from the profiler.

use super::clock::Clock;
use super::engine::Profiler;
use crate::aggregator::Aggregator;
use crate::output::schema::{PhaseSnapshot, ProfileSnapshot, SpanSnapshot};
use crate::span::{Phase, SpanId, SpanTree};
use crate::utils::config::{HISTORY_SIZE, SCHEMA_VERSION};

impl<C: Clock> Profiler<C> {
    /// Join each finished phase tree with its history records
    ///
    /// **Public** - the read-only interface for overlays and exporters
    pub fn snapshot(&self) -> ProfileSnapshot {
        let aggregator = self.aggregator();

        let phases = Phase::ALL
            .into_iter()
            .filter(|phase| self.finished_tree(*phase).activations() > 0)
            .map(|phase| PhaseSnapshot {
                phase,
                root: span_snapshot(self.finished_tree(phase), SpanId::ROOT, aggregator),
            })
            .collect();

        ProfileSnapshot {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            frames: self.frames(),
            fps: aggregator.fps(),
            sample_rate: aggregator.sample_rate(),
            history_size: HISTORY_SIZE,
            time_shown: self.is_time_shown(),
            log_shown: self.is_log_shown(),
            phases,
        }
    }
}

fn span_snapshot(tree: &SpanTree, id: SpanId, aggregator: &Aggregator) -> SpanSnapshot {
    let span = tree.get(id);
    let offset = aggregator.offset();

    // Every span of a finished tree has been folded, so the record exists
    let record = aggregator.history(span.name());
    let (history_id, current_ms, history, peak_ms, mean_ms) = match record {
        Some(record) => (
            record.id(),
            record.latest(offset),
            record.ordered(offset),
            record.peak(),
            record.mean(),
        ),
        None => (0, 0.0, vec![0.0; HISTORY_SIZE], 0.0, 0.0),
    };

    SpanSnapshot {
        name: span.name().to_string(),
        description: span.description().to_string(),
        history_id,
        current_ms,
        frame_ms: span.total_time() * 1000.0,
        history,
        peak_ms,
        mean_ms,
        children: span
            .children()
            .iter()
            .map(|child| span_snapshot(tree, *child, aggregator))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::profiler::clock::ManualClock;
    use crate::profiler::engine::Profiler;
    use crate::span::Phase;
    use crate::utils::config::{ProfilerConfig, HISTORY_SIZE};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_mirrors_tree_and_history() {
        let clock = ManualClock::new();
        let config = ProfilerConfig::new().with_sample_rate(0.5).with_shown(true);
        let mut profiler = Profiler::with_clock(config, clock.clone()).unwrap();

        for _ in 0..2 {
            profiler.enter_phase(Phase::Update);
            profiler.push_mark("AI", "Agents thinking");
            clock.advance(0.004);
            profiler.pop_mark();
            profiler.enter_phase(Phase::Draw);
            clock.advance(0.006);
            profiler.end_frame(0.25);
        }

        let snapshot = profiler.snapshot();
        assert_eq!(snapshot.frames, 2);
        assert_eq!(snapshot.fps, 4.0);
        assert!(snapshot.time_shown);
        assert_eq!(snapshot.phases.len(), 2);
        assert!(snapshot.phase(Phase::Swap).is_none());

        let update = &snapshot.phase(Phase::Update).unwrap().root;
        assert_eq!(update.name, "Update");
        assert_eq!(update.children.len(), 1);

        let ai = &update.children[0];
        assert_eq!(ai.description, "Agents thinking");
        assert_eq!(ai.history.len(), HISTORY_SIZE);
        assert!((ai.current_ms - 4.0).abs() < 1e-9);
        assert!((ai.frame_ms - 4.0).abs() < 1e-9);
        assert_eq!(*ai.history.last().unwrap(), ai.current_ms);
        assert!((ai.peak_ms - 4.0).abs() < 1e-9);
        assert!((ai.mean_ms - 4.0 / HISTORY_SIZE as f64).abs() < 1e-9);
        assert_eq!(snapshot.span_count(), 3);
    }
}
