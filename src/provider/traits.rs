// ABOUTME: Capability traits for the hosting provider's management API.
// ABOUTME: Endpoint lookup, deployment history, restore, and deploy trigger.

use async_trait::async_trait;

use super::error::ProviderError;
use super::record::DeploymentRecord;
use crate::types::{DeploymentId, ServiceEndpoint, ServiceId};

/// Resolves the public base URL of a service.
#[async_trait]
pub trait EndpointLookup: Send + Sync {
    async fn service_endpoint(&self, service: &ServiceId)
    -> Result<ServiceEndpoint, ProviderError>;
}

/// Reads a service's deployment history.
#[async_trait]
pub trait DeploymentHistory: Send + Sync {
    /// List deployments, most recent first.
    async fn list_deployments(
        &self,
        service: &ServiceId,
    ) -> Result<Vec<DeploymentRecord>, ProviderError>;
}

/// Asks the provider to restore a prior deployment.
///
/// Success only means the request was accepted. Whether the restored
/// deployment is healthy is for the caller to find out.
#[async_trait]
pub trait RollbackExecutor: Send + Sync {
    async fn restore_deployment(
        &self,
        service: &ServiceId,
        deployment: &DeploymentId,
    ) -> Result<(), ProviderError>;
}

/// Starts a new deployment of the service's current revision.
#[async_trait]
pub trait DeployTrigger: Send + Sync {
    async fn trigger_deploy(&self, service: &ServiceId) -> Result<DeploymentRecord, ProviderError>;
}
