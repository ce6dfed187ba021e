//! Hexbin surface endpoint.

use airhub_protocol::{HexFeature, Scope, SurfaceHexbinOptions};
use reqwest::Method;
use tracing::instrument;

use crate::client::{decode_body, AirHubClient};
use crate::error::{ClientError, ClientResult};

const SURFACE_PATH: &str = "/v2/surface";

/// Finest H3 resolution.
pub const MAX_H3_RESOLUTION: u8 = 15;

/// Handle for the surface endpoint.
pub struct SurfaceService<'a> {
    client: &'a AirHubClient,
}

impl<'a> SurfaceService<'a> {
    pub(crate) fn new(client: &'a AirHubClient) -> Self {
        Self { client }
    }

    /// Index the requested area into scored H3 cells.
    #[instrument(skip(self, opts), fields(resolution = opts.resolution, layers = opts.layers.len()))]
    pub async fn hexbin(&self, opts: &SurfaceHexbinOptions) -> ClientResult<Vec<HexFeature>> {
        if opts.resolution > MAX_H3_RESOLUTION {
            return Err(ClientError::InvalidArgument(format!(
                "H3 resolution must be 0-{}, got {}",
                MAX_H3_RESOLUTION, opts.resolution
            )));
        }

        let url = self.client.endpoint(SURFACE_PATH)?;
        let body = self
            .client
            .call(Method::POST, url, Some(opts), Scope::SurfaceTier1)
            .await?;
        decode_body(&body)
    }
}
