mod domain;
pub use domain::{Env, IntegrationContext, KeyValue, Parameter, Parameters};

mod error;
pub use error::ModelError;
