//! Airspace authorization check endpoint.

use airhub_protocol::{AirspaceDetails, CheckAirspaceOptions, Scope};
use reqwest::Method;
use tracing::instrument;

use crate::client::{decode_body, AirHubClient};
use crate::error::{ClientError, ClientResult};

const CHECK_AIRSPACE_PATH: &str = "/v1/check/airspace";

/// Handle for the check endpoints.
pub struct CheckService<'a> {
    client: &'a AirHubClient,
}

impl<'a> CheckService<'a> {
    pub(crate) fn new(client: &'a AirHubClient) -> Self {
        Self { client }
    }

    /// Whether the area is controlled, restricted or LAANC-enabled over the
    /// requested window.
    #[instrument(skip(self, opts), fields(start = %opts.start_time, end = %opts.end_time))]
    pub async fn airspace(&self, opts: &CheckAirspaceOptions) -> ClientResult<AirspaceDetails> {
        if opts.end_time < opts.start_time {
            return Err(ClientError::InvalidArgument(
                "end time must not precede start time".to_string(),
            ));
        }

        let url = self.client.endpoint(CHECK_AIRSPACE_PATH)?;
        let body = self
            .client
            .call(Method::POST, url, Some(opts), Scope::AviationRead)
            .await?;
        decode_body(&body)
    }
}
