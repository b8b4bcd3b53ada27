//! The service stack: typed descriptors, compose serialization, proxy
//! route rendering, secret generation.

pub mod compose;
pub mod profile;
pub mod proxy;
pub mod secret;

pub use compose::render_compose;
pub use profile::{StackPlan, StackProfile};
pub use proxy::render_proxy;
