//! Compact formatting helpers and the simulated-time log formatter.
//!
//! Log lines from the engine should read as a simulation transcript, not
//! a wall-clock one. The engine publishes the clock through a
//! thread-local as it fires events; [`SimFormat`] reads it back and puts
//! the tick count where a timestamp would normally go.

use std::cell::Cell;
use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::types::SimTime;

thread_local! {
    static SIM_CLOCK: Cell<SimTime> = const { Cell::new(0) };
}

/// Read the simulated clock for the current thread.
///
/// Returns the value last published by the engine as it fires events.
pub fn sim_clock() -> SimTime {
    SIM_CLOCK.with(|c| c.get())
}

/// Update the simulated clock thread-local. Called by the engine before
/// `info!`/`debug!` calls so the log formatter has access.
pub fn set_sim_clock(now: SimTime) {
    SIM_CLOCK.with(|c| c.set(now));
}

/// Timestamp formatter with underscore-grouped digits.
///
/// Formats tick values for log and trace output, grouped in 3s with
/// underscores and right-aligned to a fixed width:
/// - `[      500]`
/// - `[   10_000]`
pub struct FmtTs(pub SimTime);

/// Group a tick count in 3s with underscores, from the right.
pub(crate) fn fmt_grouped(v: u64) -> String {
    let digits = v.to_string();
    // A u64 renders to at least one digit, so a zero remainder means the
    // leading group is a full three.
    let lead = match digits.len() % 3 {
        0 => 3,
        r => r,
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    out.push_str(&digits[..lead]);
    let mut rest = &digits[lead..];
    while !rest.is_empty() {
        out.push('_');
        out.push_str(&rest[..3]);
        rest = &rest[3..];
    }
    out
}

impl fmt::Display for FmtTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>9}", fmt_grouped(self.0))
    }
}

/// Custom event formatter that shows simulated time instead of
/// wall-clock time: `[   <ticks>] LEVEL MESSAGE key=value ...`.
pub struct SimFormat;

impl<S, N> FormatEvent<S, N> for SimFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}] ", FmtTs(sim_clock()))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            write!(writer, "{}{level:>5}\x1b[0m ", level_color(level))?;
        } else {
            write!(writer, "{level:>5} ")?;
        }

        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        write!(writer, "{}", collector.message)?;
        for (key, value) in &collector.pairs {
            write!(writer, " {key}={value}")?;
        }
        writeln!(writer)
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[31m",
        Level::WARN => "\x1b[33m",
        Level::INFO => "\x1b[32m",
        Level::DEBUG => "\x1b[34m",
        Level::TRACE => "\x1b[35m",
    }
}

/// Visitor that splits one event into its message and key=value fields.
///
/// The engine only logs strings and unsigned integers; everything else
/// falls back to the `Debug` rendering.
#[derive(Default)]
struct FieldCollector {
    message: String,
    pairs: Vec<(String, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            name => self.pairs.push((name.to_string(), value)),
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_grouped() {
        assert_eq!(fmt_grouped(0), "0");
        assert_eq!(fmt_grouped(42), "42");
        assert_eq!(fmt_grouped(999), "999");
        assert_eq!(fmt_grouped(1_000), "1_000");
        assert_eq!(fmt_grouped(999_999), "999_999");
        assert_eq!(fmt_grouped(123_456_789), "123_456_789");
    }

    #[test]
    fn test_fmt_ts() {
        assert_eq!(FmtTs(0).to_string(), "        0");
        assert_eq!(FmtTs(500).to_string(), "      500");
        assert_eq!(FmtTs(10_000).to_string(), "   10_000");
        assert_eq!(FmtTs(1_234_567).to_string(), "1_234_567");
    }

    #[test]
    fn test_sim_clock_roundtrip() {
        set_sim_clock(123);
        assert_eq!(sim_clock(), 123);
        set_sim_clock(0);
    }
}
