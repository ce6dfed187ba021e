//! Advisory endpoints.

use airhub_protocol::requests::MAX_QUERY_GEO_IDS;
use airhub_protocol::{
    Advisory, CreateAdvisoryOptions, QueryAdvisoryOptions, Scope, UpdateAdvisoryOptions,
};
use reqwest::Method;
use tracing::instrument;

use crate::client::{decode_body, AirHubClient};
use crate::error::{ClientError, ClientResult};

const ADVISORY_PATH: &str = "/v4/advisory";
const QUERY_PATH: &str = "/v4/advisory/query";

/// Handle for the advisory endpoints.
pub struct AdvisoryService<'a> {
    client: &'a AirHubClient,
}

impl<'a> AdvisoryService<'a> {
    pub(crate) fn new(client: &'a AirHubClient) -> Self {
        Self { client }
    }

    /// Find advisories intersecting the query geometry.
    #[instrument(skip(self, opts), fields(geometry = opts.geometry.type_name(), geo_ids = opts.geo_ids.len()))]
    pub async fn query(&self, opts: &QueryAdvisoryOptions) -> ClientResult<Vec<Advisory>> {
        if opts.geo_ids.len() > MAX_QUERY_GEO_IDS {
            return Err(ClientError::InvalidArgument(format!(
                "at most {} geo IDs may be queried, got {}",
                MAX_QUERY_GEO_IDS,
                opts.geo_ids.len()
            )));
        }

        let url = self.client.endpoint(QUERY_PATH)?;
        let body = self
            .client
            .call(Method::POST, url, Some(opts), Scope::AdvisoryRead)
            .await?;
        decode_body(&body)
    }

    /// Create an advisory, returning it as stored by the server.
    #[instrument(skip(self, opts), fields(name = %opts.name, geo_id = %opts.geo_id))]
    pub async fn create(&self, opts: &CreateAdvisoryOptions) -> ClientResult<Advisory> {
        let url = self.client.endpoint(ADVISORY_PATH)?;
        let body = self
            .client
            .call(Method::POST, url, Some(opts), Scope::AdvisoryRead)
            .await?;
        decode_body(&body)
    }

    /// Apply a partial update to an advisory.
    #[instrument(skip(self, opts))]
    pub async fn update(
        &self,
        advisory_id: &str,
        opts: &UpdateAdvisoryOptions,
    ) -> ClientResult<Advisory> {
        let url = self.advisory_url(advisory_id)?;
        let body = self
            .client
            .call(Method::PATCH, url, Some(opts), Scope::AdvisoryRead)
            .await?;
        decode_body(&body)
    }

    /// Delete an advisory.
    #[instrument(skip(self))]
    pub async fn delete(&self, advisory_id: &str) -> ClientResult<()> {
        let url = self.advisory_url(advisory_id)?;
        self.client
            .call::<()>(Method::DELETE, url, None, Scope::AdvisoryRead)
            .await?;
        Ok(())
    }

    fn advisory_url(&self, advisory_id: &str) -> ClientResult<reqwest::Url> {
        if advisory_id.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "advisory id must be a non-empty string".to_string(),
            ));
        }
        self.client.endpoint_with_segment(ADVISORY_PATH, advisory_id)
    }
}
