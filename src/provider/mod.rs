// ABOUTME: Hosting provider boundary: capability traits and the REST client.
// ABOUTME: The controller only reads deployment state and requests restores.

mod error;
mod http;
mod record;
mod traits;

pub use error::{ProviderError, ProviderErrorKind};
pub use http::HttpProvider;
pub use record::{DeploymentRecord, DeploymentStatus};
pub use traits::{DeployTrigger, DeploymentHistory, EndpointLookup, RollbackExecutor};
