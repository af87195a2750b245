use reqwest::{redirect, Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use shared::errors::{GasError, Result, TransportError};
use shared::Settings;
use tracing::{debug, info};
use url::Url;

use super::Transport;

const USER_AGENT: &str = concat!("gas-client/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;

/// HTTP transport for an Apps Script web app deployment.
///
/// Every request carries `authToken` and `sheetId` next to the caller's
/// fields. Apps Script answers `/exec` with a redirect to its content host,
/// so redirects are followed.
#[derive(Debug, Clone)]
pub struct GasHttpClient {
    client: Client,
    endpoint: Url,
    auth_token: String,
    sheet_id: String,
}

impl GasHttpClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let endpoint_url = settings.endpoint_url();
        let endpoint = Url::parse(&endpoint_url).map_err(|e| {
            GasError::Configuration(format!("Invalid endpoint URL {}: {}", endpoint_url, e))
        })?;

        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| GasError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        info!(endpoint = %redacted(&endpoint), "GAS HTTP client ready");

        Ok(Self {
            client,
            endpoint,
            auth_token: settings.auth_token.clone(),
            sheet_id: settings.sheet_id.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn auth_fields(&self) -> [(&str, &str); 2] {
        [
            ("authToken", self.auth_token.as_str()),
            ("sheetId", self.sheet_id.as_str()),
        ]
    }
}

impl Transport for GasHttpClient {
    async fn post_form(&self, fields: &[(String, String)]) -> std::result::Result<(), TransportError> {
        let mut form: Vec<(&str, &str)> = fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        form.extend(self.auth_fields());

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await?;

        let body = success_body(response).await?;
        debug!(response_len = body.len(), "POST accepted");

        Ok(())
    }

    async fn get_json<R>(&self, query: &[(String, String)]) -> std::result::Result<R, TransportError>
    where
        R: DeserializeOwned + Send,
    {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(query)
            .query(&self.auth_fields())
            .send()
            .await?;

        let body = success_body(response).await?;
        debug!(response_len = body.len(), "GET answered");

        Ok(serde_json::from_str(&body)?)
    }
}

async fn success_body(response: Response) -> std::result::Result<String, TransportError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

// The deployment id is a credential in its own right; keep it out of logs.
fn redacted(endpoint: &Url) -> String {
    format!("{}://{}/…", endpoint.scheme(), endpoint.host_str().unwrap_or("?"))
}
