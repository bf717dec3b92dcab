//! Authorization: who may touch which zone, and through which backend.

mod model;
mod provider;
mod router;
mod rule;

pub use model::{AuthorizationModel, AuthorizedUser};
pub use provider::ProviderInstance;
pub use rule::ZoneRule;
