//! Application configuration.

use std::path::PathBuf;

/// Configuration for one load/update/save run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Entity document to load.
    pub input: PathBuf,
    /// Where to write the entity after updating (`None` = don't save).
    pub output: Option<PathBuf>,
    /// Number of fixed update ticks to run.
    pub ticks: u64,
    /// Seconds per tick.
    pub dt: f32,
    /// Fail the run if any component document was skipped.
    pub strict: bool,
    /// Print the inspector view of the entity after updating.
    pub inspect: bool,
}

impl AppConfig {
    /// Create a config that loads `input` and does nothing else.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            ticks: 0,
            dt: 1.0 / 60.0,
            strict: false,
            inspect: false,
        }
    }

    /// Save the updated entity to `path`.
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Run `ticks` updates of `dt` seconds each.
    #[must_use]
    pub fn with_ticks(mut self, ticks: u64, dt: f32) -> Self {
        self.ticks = ticks;
        self.dt = dt;
        self
    }

    /// Reject documents with unknown component types.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Print the inspector view.
    #[must_use]
    pub fn inspect(mut self, inspect: bool) -> Self {
        self.inspect = inspect;
        self
    }
}
