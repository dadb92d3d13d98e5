//! Build parameters → process environment.

use std::collections::HashMap;

use exlabel_core::LabelError;
use exlabel_model::{Env, Parameters};

/// Turn build parameters into environment variables for the labelling process.
///
/// Each parameter name loses exactly one leading marker character
/// (`$BuildDate` → `BuildDate`). Fails before anything is spawned when a
/// name is empty, becomes empty after stripping, cannot be represented as an
/// OS environment entry, or collides with another stripped name.
pub fn materialize(params: &Parameters) -> Result<Env, LabelError> {
    let mut env = Env::with_capacity(params.len());
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(params.len());

    for param in params {
        let key = strip_marker(param.name())?;
        if key.contains(['=', '\0']) {
            return Err(LabelError::Configuration(format!(
                "parameter '{}' yields invalid environment variable name '{key}'",
                param.name()
            )));
        }
        if param.value().contains('\0') {
            return Err(LabelError::Configuration(format!(
                "parameter '{}' has a value containing NUL",
                param.name()
            )));
        }
        if let Some(previous) = seen.insert(key, param.name()) {
            return Err(LabelError::Configuration(format!(
                "parameters '{previous}' and '{}' both map to environment variable '{key}'",
                param.name()
            )));
        }
        env.push(key, param.value());
    }
    Ok(env)
}

/// Drop the first character of a parameter name.
fn strip_marker(name: &str) -> Result<&str, LabelError> {
    let mut chars = name.chars();
    if chars.next().is_none() {
        return Err(LabelError::Configuration("parameter name is empty".into()));
    }
    let key = chars.as_str();
    if key.is_empty() {
        return Err(LabelError::Configuration(format!(
            "parameter '{name}' has no name after its marker"
        )));
    }
    Ok(key)
}
