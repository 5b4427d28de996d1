//! Sampling window bookkeeping: frame counting, wall time and ring offset.

use crate::utils::config::HISTORY_SIZE;

/// Relative slack on the window boundary, absorbing rounding in summed deltas
const WINDOW_EPSILON: f64 = 1e-9;

/// A rotation that is due at the end of the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Ring slot that receives the new samples
    pub slot: usize,

    /// Frames seen during the window that just closed
    pub frames: u32,

    /// Frames per second over that window
    pub fps: f64,
}

/// Process-wide sampling state
#[derive(Debug, Clone)]
pub struct Sampler {
    sample_rate: f64,
    time_passed: f64,
    frame_count: u32,
    offset: Option<usize>,
    fps: f64,
}

impl Sampler {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            time_passed: 0.0,
            frame_count: 0,
            offset: None,
            fps: 0.0,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Wall time accumulated since the last rotation
    pub fn time_passed(&self) -> f64 {
        self.time_passed
    }

    /// Frames seen since the last rotation
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Slot written by the last rotation, `None` before the first one
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Count one frame of `delta` seconds and report a rotation if one is due
    ///
    /// On rotation the window carries its overshoot: `time_passed` is reduced
    /// by one window rather than cleared. At most one rotation per frame.
    /// A window counts as full once `time_passed` is within rounding error of
    /// `sample_rate`, so 30 frames of `1.0 / 60.0` fill a 0.5 s window.
    pub fn end_frame(&mut self, delta: f64) -> Option<Rotation> {
        self.frame_count += 1;
        self.time_passed += delta;

        if self.time_passed + self.sample_rate * WINDOW_EPSILON < self.sample_rate {
            return None;
        }

        let slot = self.offset.map(|o| (o + 1) % HISTORY_SIZE).unwrap_or(0);
        let frames = self.frame_count;

        self.offset = Some(slot);
        self.fps = f64::from(frames) / self.sample_rate;
        self.time_passed -= self.sample_rate;
        self.frame_count = 0;

        Some(Rotation {
            slot,
            frames,
            fps: self.fps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rotation_inside_window() {
        let mut sampler = Sampler::new(0.5);
        assert_eq!(sampler.end_frame(0.25), None);
        assert_eq!(sampler.frame_count(), 1);
        assert_eq!(sampler.offset(), None);
    }

    #[test]
    fn test_rotation_at_window_boundary() {
        let mut sampler = Sampler::new(0.5);
        sampler.end_frame(0.25);
        let rotation = sampler.end_frame(0.25).expect("rotation due");

        assert_eq!(rotation.slot, 0);
        assert_eq!(rotation.frames, 2);
        assert_eq!(rotation.fps, 4.0);
        assert_eq!(sampler.frame_count(), 0);
        assert_eq!(sampler.time_passed(), 0.0);
    }

    #[test]
    fn test_sixty_hz_fills_window_in_thirty_frames() {
        let mut sampler = Sampler::new(0.5);
        let mut rotations = Vec::new();

        for frame in 1..=90 {
            if let Some(rotation) = sampler.end_frame(1.0 / 60.0) {
                rotations.push((frame, rotation.frames, rotation.fps));
            }
        }

        assert_eq!(
            rotations,
            vec![(30, 30, 60.0), (60, 30, 60.0), (90, 30, 60.0)]
        );
    }

    #[test]
    fn test_overshoot_is_carried() {
        let mut sampler = Sampler::new(0.5);
        sampler.end_frame(0.75);
        assert_eq!(sampler.time_passed(), 0.25);

        // Only one rotation per frame even when far behind
        let mut sampler = Sampler::new(0.5);
        assert!(sampler.end_frame(2.0).is_some());
        assert_eq!(sampler.time_passed(), 1.5);
        assert!(sampler.end_frame(0.0).is_some());
        assert_eq!(sampler.time_passed(), 1.0);
    }

    #[test]
    fn test_offset_cycles_through_ring() {
        let mut sampler = Sampler::new(1.0);
        let slots: Vec<usize> = (0..HISTORY_SIZE * 2 + 3)
            .map(|_| sampler.end_frame(1.0).expect("rotation").slot)
            .collect();

        assert_eq!(slots[0], 0);
        assert_eq!(slots[HISTORY_SIZE - 1], HISTORY_SIZE - 1);
        assert_eq!(slots[HISTORY_SIZE], 0);
        assert_eq!(slots[HISTORY_SIZE * 2 + 2], 2);
        assert!(slots.iter().all(|s| *s < HISTORY_SIZE));
    }
}
