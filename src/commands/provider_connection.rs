// ABOUTME: Shared helper for building the provider API client from config.
// ABOUTME: Used by both the release and history commands.

use rollguard::config::ProviderConfig;
use rollguard::error::Result;
use rollguard::provider::HttpProvider;

/// Resolve credentials and build the provider client.
pub fn connect_provider(config: &ProviderConfig) -> Result<HttpProvider> {
    let api_key = config.api_key.resolve()?;
    let provider = HttpProvider::new(&config.api_url, api_key, config.request_timeout)?;
    tracing::debug!(api_url = %provider.api_url(), "provider client ready");
    Ok(provider)
}
