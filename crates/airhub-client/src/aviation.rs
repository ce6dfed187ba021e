//! FAA aviation data endpoint.

use airhub_protocol::{AviationOptions, Feature, Scope, ServerResponse};
use reqwest::Method;
use tracing::instrument;

use crate::client::{decode_body, AirHubClient};
use crate::error::ClientResult;

const AVIATION_PATH: &str = "/v1/aviation";

/// Handle for the aviation endpoint.
pub struct AviationService<'a> {
    client: &'a AirHubClient,
}

impl<'a> AviationService<'a> {
    pub(crate) fn new(client: &'a AirHubClient) -> Self {
        Self { client }
    }

    /// FAA features of the requested types intersecting the geometry.
    ///
    /// `opts.buffer` travels as the `buffer` query parameter.
    #[instrument(skip(self, opts), fields(types = opts.types.len(), buffer = ?opts.buffer))]
    pub async fn intersections(&self, opts: &AviationOptions) -> ClientResult<Vec<Feature>> {
        let mut url = self.client.endpoint(AVIATION_PATH)?;
        if let Some(buffer) = opts.buffer {
            url.query_pairs_mut()
                .append_pair("buffer", &buffer.to_string());
        }

        let body = self
            .client
            .call(Method::POST, url, Some(opts), Scope::AviationRead)
            .await?;
        let envelope: ServerResponse<Vec<Feature>> = decode_body(&body)?;
        Ok(envelope.data)
    }
}
