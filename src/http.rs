use reqwest::Method;
use tracing::debug;

use crate::{Error, Result};

/// Issues one outbound HTTP request per call against a user-configured
/// endpoint. Certificate validation is disabled: the target is a LAN
/// device with a self-signed or absent certificate.
pub(crate) struct HttpExecutor {
    http: reqwest::Client,
}

impl HttpExecutor {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .expect("failed to build HTTP client");
        Self { http }
    }

    /// One attempt, empty body, no retries. Status 200 yields the body
    /// text; any other status or a transport failure is an error.
    pub async fn perform(&self, url: &str, method: &str) -> Result<String> {
        let method: Method = method
            .parse()
            .map_err(|_| Error::Config(format!("invalid http method '{method}'")))?;

        debug!(url, %method, "issuing request");
        let response = self.http.request(method, url).body("").send().await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::Status(status));
        }

        Ok(response.text().await?)
    }
}
