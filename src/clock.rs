//! Source of the current instant.
//!
//! The orchestrator reads the clock exactly once per release so the date,
//! time and timestamp exposed to tasks all describe the same moment.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local};
use std::fmt::Write;

use crate::domain::ReleaseStamp;
use crate::error::{GitPackageError, Result};

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local timezone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock frozen at a given instant, for tests and reproducible builds
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Check that a strftime format string only contains valid specifiers
pub fn validate_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(GitPackageError::config(format!(
            "Invalid date/time format '{}'",
            format
        )));
    }
    Ok(())
}

/// Render the release stamp for `instant`
pub fn stamp(
    instant: DateTime<FixedOffset>,
    date_format: &str,
    time_format: &str,
) -> Result<ReleaseStamp> {
    Ok(ReleaseStamp {
        timestamp: instant.timestamp(),
        date: render(&instant, date_format)?,
        time: render(&instant, time_format)?,
    })
}

fn render(instant: &DateTime<FixedOffset>, format: &str) -> Result<String> {
    validate_format(format)?;

    let mut out = String::new();
    write!(out, "{}", instant.format(format)).map_err(|_| {
        GitPackageError::config(format!("Cannot render date/time format '{}'", format))
    })?;
    Ok(out)
}
