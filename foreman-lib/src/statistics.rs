//! Logging of statistics with a configurable prefix and closing line.
//!
//! Statistic logging is off until [`configure_statistic_logging`] is called; afterwards every
//! [`log_statistic`] call writes one `PREFIX name=value` line to the configured writer.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::RwLock;

/// The options for statistic logging: the line prefix, an optional closing line, and the writer
/// the statistics are written to.
pub struct StatisticOptions {
    statistic_prefix: &'static str,
    after_statistics: Option<&'static str>,
    statistics_writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("statistic_prefix", &self.statistic_prefix)
            .field("after_statistics", &self.after_statistics)
            .field("statistics_writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<RwLock<StatisticOptions>> = OnceLock::new();

/// Configure statistic logging with the given line prefix, optional closing line and writer.
///
/// Statistics go to stdout when no writer is given. Calling this more than once has no effect.
pub fn configure_statistic_logging(
    prefix: &'static str,
    after: Option<&'static str>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        RwLock::from(StatisticOptions {
            statistic_prefix: prefix,
            after_statistics: after,
            statistics_writer: writer.unwrap_or(Box::new(stdout())),
        })
    });
}

/// Log one statistic in the form `PREFIX name=value`, if logging is configured.
pub fn log_statistic(name: impl Display, value: impl Display) {
    if let Some(statistic_options_lock) = STATISTIC_OPTIONS.get() {
        if let Ok(mut statistic_options) = statistic_options_lock.write() {
            let prefix = statistic_options.statistic_prefix;
            let _ = writeln!(
                statistic_options.statistics_writer,
                "{prefix} {name}={value}"
            );
        }
    }
}

/// Log the closing line after a block of statistics, if one is configured.
pub fn log_statistic_postfix() {
    if let Some(statistic_options_lock) = STATISTIC_OPTIONS.get() {
        if let Ok(mut statistic_options) = statistic_options_lock.write() {
            if let Some(post_fix) = statistic_options.after_statistics {
                let _ = writeln!(statistic_options.statistics_writer, "{post_fix}");
            }
        }
    }
}

/// Whether statistics should be logged, i.e. whether logging has been configured.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}

/// Counters describing one search run of a backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveStatistics {
    /// Number of branching decisions, including alternatives tried after backtracking.
    pub decisions: u64,
    /// Number of conflicts hit during propagation.
    pub conflicts: u64,
    /// Number of variable bound updates made by propagation.
    pub propagations: u64,
    /// Deepest decision level reached.
    pub peak_search_depth: u64,
}

impl SolveStatistics {
    /// Write every counter through [`log_statistic`].
    pub fn log(&self) {
        log_statistic("numberOfDecisions", self.decisions);
        log_statistic("numberOfConflicts", self.conflicts);
        log_statistic("numberOfPropagations", self.propagations);
        log_statistic("peakSearchDepth", self.peak_search_depth);
    }
}
