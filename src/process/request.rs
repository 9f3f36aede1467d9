//! # Invocation request for one generator run.

use crate::params::ValueSet;

/// Base command plus the parameter values for one invocation.
///
/// Ephemeral, built by the controller per run. The serialized argument vector
/// appends `--<name> <json value>` pairs in value-set iteration order (which
/// follows the manifest), so runs are reproducible from the request alone.
#[derive(Debug, Clone)]
pub struct RunRequest {
    command: Vec<String>,
    values: ValueSet,
}

impl RunRequest {
    /// Creates a request from a base command (program + fixed args) and the
    /// current values.
    pub fn new(command: Vec<String>, values: ValueSet) -> Self {
        Self { command, values }
    }

    /// The program to execute, or `None` for an empty base command.
    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    /// The full argument vector: fixed args followed by serialized parameters.
    ///
    /// Each parameter contributes two arguments: `--<name>` and its value as
    /// JSON text (strings stay quoted; the generator's option parser strips
    /// the quotes back off).
    pub fn args(&self) -> Vec<String> {
        let fixed = self.command.iter().skip(1).cloned();
        let params = self
            .values
            .iter()
            .flat_map(|(name, value)| [format!("--{name}"), value.to_json()]);
        fixed.chain(params).collect()
    }
}
