// ── Provider ──
//
// An authenticated FMC client plus the capability table resolved from the
// server version at connect time. Every lifecycle call takes the provider
// explicitly.

use fmc_api::FmcClient;
use tracing::info;

use crate::capability::{Capabilities, FmcVersion};
use crate::config::ConnectionConfig;
use crate::error::CoreError;
use crate::resource::Resource;

pub struct Provider {
    client: FmcClient,
    capabilities: Capabilities,
}

impl Provider {
    /// Log in, query the server version and resolve the capability table.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, CoreError> {
        let mut client = FmcClient::new(config.url.as_str(), config.credentials(), &config.transport())?;
        if let Some(ref domain) = config.domain {
            client = client.with_default_domain(domain.clone());
        }

        client.login().await?;
        let info = client.server_version().await?;
        let version: FmcVersion = info.server_version.parse()?;
        info!(url = %config.url, %version, "connected to FMC");

        Ok(Self::new(client, Capabilities::resolve(version)))
    }

    /// Assemble a provider from an existing client and capability table.
    pub fn new(client: FmcClient, capabilities: Capabilities) -> Self {
        Self {
            client,
            capabilities,
        }
    }

    pub fn client(&self) -> &FmcClient {
        &self.client
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Fail before any request when `R` is gated above the server version.
    pub(crate) fn check<R: Resource>(&self) -> Result<(), CoreError> {
        match R::FEATURE {
            Some(feature) => self.capabilities.require(feature),
            None => Ok(()),
        }
    }
}
