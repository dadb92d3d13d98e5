mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod parameter;
pub use parameter::{Parameter, Parameters};

mod context;
pub use context::IntegrationContext;
