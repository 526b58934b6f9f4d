use crate::http_client::handle_http_response;
use anyhow::{Context, Result};
use log::{debug, error};
#[cfg(feature = "mock")]
use mockall::automock;
use reqwest::Client;
use std::time::Duration;
use switch_control_core::SwitchAction;
use trait_variant::make;

/// Sends switch actions to other switch-control devices
#[make(Send)]
#[cfg_attr(feature = "mock", automock)]
pub trait RemoteSwitchClient {
    async fn switch(&self, ip: String, action: SwitchAction) -> Result<()>;
}

#[derive(Clone)]
pub struct HttpRemoteSwitchClient {
    client: Client,
}

impl HttpRemoteSwitchClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to create remote switch client")?;

        Ok(Self { client })
    }
}

impl RemoteSwitchClient for HttpRemoteSwitchClient {
    async fn switch(&self, ip: String, mut action: SwitchAction) -> Result<()> {
        // the receiving device owns the channel
        action.ip = None;

        let url = format!("http://{ip}/api/channel");
        debug!("forwarding switch action to {url}: {action:?}");

        let res = self
            .client
            .post(&url)
            .json(&action)
            .send()
            .await
            .with_context(|| format!("failed to send switch request to {ip}"))?;

        handle_http_response(res, &format!("switch request to {ip}"))
            .await
            .map(|_| ())
    }
}

/// Forward `actions` one after another; failures are logged and skipped
pub async fn forward_actions<C: RemoteSwitchClient>(client: &C, actions: Vec<SwitchAction>) {
    for action in actions {
        let Some(ip) = action.remote_ip().map(str::to_string) else {
            continue;
        };
        let channel = action.channel.clone();

        if let Err(e) = client.switch(ip.clone(), action).await {
            error!("forwarding switch of channel {channel} to {ip} failed: {e:#}");
        }
    }
}
