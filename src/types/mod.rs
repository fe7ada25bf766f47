// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod endpoint;
mod id;

pub use endpoint::{EndpointError, ServiceEndpoint};
pub use id::{DeploymentId, Id, IdError, ServiceId};
