use std::{fmt, path::{Path, PathBuf}};

use crate::{Parameter, Parameters};

/// Build-scoped state handed to a labeller.
///
/// Labellers read the working directory and the parameters; the task
/// capability writes the computed label back through [`IntegrationContext::set_label`].
#[derive(Debug, Clone, Default)]
pub struct IntegrationContext {
    working_directory: PathBuf,
    parameters: Parameters,
    label: String,
}

impl IntegrationContext {
    /// Create a context for a build rooted at `working_directory`.
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            parameters: Parameters::new(),
            label: String::new(),
        }
    }

    /// Replace the parameters and return updated context.
    pub fn with_parameters(mut self, parameters: impl Into<Parameters>) -> Self {
        self.parameters = parameters.into();
        self
    }

    /// Append a single parameter and return updated context.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(name, value);
        self
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Current label; empty until a labeller has run.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

impl fmt::Display for IntegrationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IntegrationContext(workdir={}, params={}, label='{}')",
            self.working_directory.display(),
            self.parameters.len(),
            self.label,
        )
    }
}
