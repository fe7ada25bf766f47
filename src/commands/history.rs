// ABOUTME: History command implementation.
// ABOUTME: Lists provider deployments and the deployment a rollback would restore.

use super::provider_connection::connect_provider;
use rollguard::config::Config;
use rollguard::error::Result;
use rollguard::output::Output;
use rollguard::provider::DeploymentHistory;
use rollguard::release::find_rollback_target;

pub async fn history(config: Config, output: Output) -> Result<()> {
    let provider = connect_provider(&config.provider)?;
    let deployments = provider.list_deployments(&config.service).await?;

    let target = find_rollback_target(&deployments, config.rollback.target).ok();
    output.history(&deployments, target.as_ref());
    Ok(())
}
