/*!
Miscellaneous items related to logging.

Calls to the `log` macros are made throughout the library: one `trace!`
per search-loop iteration, `info!` for decisions and backtracks, `warn!`
for recoverable anomalies. No log implementation is provided by this
crate — the CLI installs a minimal one (see `cli::logging` in the binary
target).
*/

/// Targets to be used within a `log` macro.
pub mod targets {
    /// Logs related to the reference back-end's search loop.
    pub const SEARCH: &str = "search";

    /// Logs related to per-family propagation.
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to the static feasibility analyzer.
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to the instance parser.
    pub const PARSE: &str = "parse";

    /// Logs related to the Solver Interface (build/solve/uniqueness).
    pub const CONTEXT: &str = "context";
}
