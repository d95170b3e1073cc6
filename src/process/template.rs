//! `{VAR}` expansion of launch environments against the OS environment.

use crate::environment::substitute;
use crate::types::Environment;
use tracing::warn;

/// Expand every value of `environment` against `os_environment`.
///
/// Placeholders naming variables absent from the OS environment stay verbatim.
pub fn expand_environment(environment: &Environment, os_environment: &Environment) -> Environment {
    environment
        .iter()
        .map(|(key, value)| {
            let (expanded, missing) = substitute(value, |name| os_environment.get(name).cloned());
            if !missing.is_empty() {
                warn!(
                    variable = %key,
                    missing = ?missing,
                    "Launch environment references unset variables"
                );
            }
            (key.clone(), expanded)
        })
        .collect()
}
