use crate::config::{Thresholds, SAMPLE_RATE_HZ};
use crate::notification::Notification;
use crate::sample::Sample;
use crate::util::mean;

/// A contiguous run of samples above the breathing threshold
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BreathSegment {
    pub start_time: f64,
    pub active: bool,
}

/// Threshold checks and breath-segment bookkeeping, fed one sample at a time
#[derive(Debug, Clone)]
pub struct BreathMonitor {
    thresholds: Thresholds,
    segment: BreathSegment,
    low_streak: u32,
}

impl BreathMonitor {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            segment: BreathSegment::default(),
            low_streak: 0,
        }
    }

    pub fn segment(&self) -> BreathSegment {
        self.segment
    }

    pub fn low_streak(&self) -> u32 {
        self.low_streak
    }

    pub fn reset(&mut self) {
        self.segment = BreathSegment::default();
        self.low_streak = 0;
    }

    /// Runs every check for `sample` against the samples stored so far.
    /// `history` must not yet contain `sample`.
    pub fn observe(&mut self, history: &[Sample], sample: &Sample) -> Vec<Notification> {
        let mut out = Vec::new();

        if let Some(n) = self.check_levels(history) {
            out.push(n);
        }
        if let Some(n) = self.track_segment(history, sample) {
            out.push(n);
        }
        if let Some(n) = self.track_no_breath(sample) {
            out.push(n);
        }

        out
    }

    /// Looks at the latest stored sample. An empty history counts as an
    /// alarm rather than a skipped check.
    fn check_levels(&self, history: &[Sample]) -> Option<Notification> {
        match history.last() {
            Some(last) if last.acetone.is_finite() => {
                if last.acetone > self.thresholds.acetone_high {
                    log::warn!(
                        "acetone {:.3} ppm above {:.3} ppm at t={:.2}s",
                        last.acetone,
                        self.thresholds.acetone_high,
                        last.time
                    );
                    Some(Notification::AcetoneTooHigh)
                } else {
                    None
                }
            }
            Some(last) => {
                log::warn!("acetone reading is not a number at t={:.2}s", last.time);
                Some(Notification::AcetoneTooHigh)
            }
            None => {
                log::warn!("data is empty or acetone has no data");
                Some(Notification::AcetoneTooHigh)
            }
        }
    }

    fn track_segment(&mut self, history: &[Sample], sample: &Sample) -> Option<Notification> {
        let breathing = sample.acetone > self.thresholds.breath_active;

        if !self.segment.active && breathing {
            self.segment = BreathSegment {
                start_time: sample.time,
                active: true,
            };
            self.low_streak = 0;
            log::debug!("breath segment opened at t={:.2}s", sample.time);
            None
        } else if self.segment.active && !breathing {
            self.segment.active = false;
            let duration = sample.time - self.segment.start_time;
            let window = segment_window(duration).min(history.len());
            let tail: Vec<f64> = history[history.len() - window..]
                .iter()
                .map(|s| s.acetone)
                .collect();

            match mean(&tail) {
                Some(average) => {
                    log::info!(
                        "breath segment closed after {duration:.2}s, mean acetone {average:.3} ppm over {window} samples"
                    );
                    Some(Notification::BreathSegmentComplete { average })
                }
                None => {
                    log::warn!("breath segment closed with no stored samples");
                    None
                }
            }
        } else {
            None
        }
    }

    fn track_no_breath(&mut self, sample: &Sample) -> Option<Notification> {
        if sample.acetone <= self.thresholds.breath_active {
            self.low_streak += 1;
        } else {
            self.low_streak = 0;
        }

        if self.low_streak > self.thresholds.no_breath_limit {
            self.low_streak = 0;
            log::warn!("no breath detected by t={:.2}s", sample.time);
            Some(Notification::NoBreathDetected)
        } else {
            None
        }
    }
}

/// Trailing sample count covering a segment of `duration_secs`
pub fn segment_window(duration_secs: f64) -> usize {
    let n = (duration_secs * SAMPLE_RATE_HZ).round();
    if n.is_finite() && n >= 1.0 {
        n as usize
    } else {
        1
    }
}
