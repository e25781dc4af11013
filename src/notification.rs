use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Severity {
    Info,
    Warning,
}

/// Messages surfaced to the user without interrupting the run
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    TestComplete { duration_secs: f64 },
    AcetoneTooHigh,
    NoBreathDetected,
    BreathSegmentComplete { average: f64 },
}

impl Notification {
    pub fn severity(&self) -> Severity {
        match self {
            Notification::TestComplete { .. } | Notification::BreathSegmentComplete { .. } => {
                Severity::Info
            }
            Notification::AcetoneTooHigh | Notification::NoBreathDetected => Severity::Warning,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notification::TestComplete { .. } => "Test Complete",
            Notification::BreathSegmentComplete { .. } => "Breathing Segment Complete",
            Notification::AcetoneTooHigh | Notification::NoBreathDetected => "Warning",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::TestComplete { duration_secs } => {
                write!(f, "The {duration_secs:.0}-second test has finished.")
            }
            Notification::AcetoneTooHigh => write!(f, "Acetone levels are too high!"),
            Notification::NoBreathDetected => write!(f, "No breath detected. Please blow again."),
            Notification::BreathSegmentComplete { average } => {
                write!(f, "Average Acetone during breathing: {average:.3} ppm")
            }
        }
    }
}
