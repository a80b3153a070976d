//! A minimal line-based [log::Log] implementation installed by the CLI.
//!
//! `wsp_sat` the library only depends on the `log` facade and never
//! installs a backend itself — that decision belongs to whatever binds
//! the crate into a program. Rather than reach for `env_logger`/`log4rs`
//! for a one-line need, the CLI installs this tiny logger directly.

use log::{Level, Log, Metadata, Record};

struct LineLogger {
    level: Level,
}

impl Log for LineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Installs the line logger at `level`, capping it with
/// [log::set_max_level] so disabled levels are skipped before formatting.
/// A second call is a no-op (the `log` facade only accepts one logger per
/// process) and is not treated as an error — the CLI only ever calls this
/// once, but tests that exercise `main`-adjacent code may call it more.
pub fn install(level: Level) {
    let logger = Box::new(LineLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level.to_level_filter());
    }
}
