use chrono::{DateTime, Local};
use std::fmt;

/// Format used for every timestamp that appears in guidance text
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Start/end times of the current (or most recent) match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub game_started_at: Option<DateTime<Local>>,
    pub game_ended_at: Option<DateTime<Local>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, at: DateTime<Local>) {
        self.game_started_at = Some(at);
    }

    /// Record the end of the match and return the elapsed time since its start.
    ///
    /// A match that was never started counts as zero seconds long.
    pub fn end(&mut self, at: DateTime<Local>) -> Elapsed {
        self.game_ended_at = Some(at);
        let secs = self
            .game_started_at
            .map(|start| (at - start).num_seconds().max(0) as u64)
            .unwrap_or(0);
        Elapsed::from_secs(secs)
    }
}

/// Whole-second duration broken down into days, hours, minutes and seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Elapsed {
    pub fn from_secs(total: u64) -> Self {
        let days = total / SECS_PER_DAY;
        let rem = total % SECS_PER_DAY;
        let hours = rem / SECS_PER_HOUR;
        let rem = rem % SECS_PER_HOUR;
        Self {
            days,
            hours,
            minutes: rem / SECS_PER_MINUTE,
            seconds: rem % SECS_PER_MINUTE,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.days * SECS_PER_DAY
            + self.hours * SECS_PER_HOUR
            + self.minutes * SECS_PER_MINUTE
            + self.seconds
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time elapsed: ")?;
        if self.days > 0 {
            write!(f, "{} days, ", self.days)?;
        }
        if self.hours > 0 {
            write!(f, "{} hours, ", self.hours)?;
        }
        write!(f, "{} minutes, {} seconds", self.minutes, self.seconds)
    }
}
