//! Bolna voice-call provider.

use async_trait::async_trait;
use reqwest::Client;
use rowcall_core::{CallInitiated, CallProvider, CallRequest, ProviderConfig, RowcallResult};

use super::{decode_failed, status_failed, transport_failed};

const PROVIDER: &str = "bolna";

/// Client for `POST {base_url}/call`.
#[derive(Clone)]
pub struct BolnaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BolnaClient {
    pub fn new(config: &ProviderConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl CallProvider for BolnaClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn initiate_call(&self, request: &CallRequest) -> RowcallResult<CallInitiated> {
        let url = format!("{}/call", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_failed(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_failed(PROVIDER, status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_failed(PROVIDER, e))?;
        serde_json::from_str::<CallInitiated>(&body).map_err(|e| decode_failed(PROVIDER, e))
    }
}

impl std::fmt::Debug for BolnaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BolnaClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
