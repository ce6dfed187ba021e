//! OAuth client-credentials token endpoint.

use airhub_protocol::{Scope, ServerResponse, Token};
use tracing::instrument;

use crate::client::{decode_body, AirHubClient, API_KEY_HEADER};
use crate::error::{ClientError, ClientResult};

/// Token endpoint path.
pub const TOKEN_PATH: &str = "/v1/oauth/token";

/// Handle for the token endpoint.
pub struct TokenService<'a> {
    client: &'a AirHubClient,
}

impl<'a> TokenService<'a> {
    pub(crate) fn new(client: &'a AirHubClient) -> Self {
        Self { client }
    }

    /// Request a new token for `scopes`.
    ///
    /// This bypasses the client's token cache; service calls manage the
    /// cache on their own.
    #[instrument(skip(self), fields(scopes = %Scope::join(scopes)))]
    pub async fn oauth_token(&self, scopes: &[Scope]) -> ClientResult<Token> {
        self.request_token(&Scope::join(scopes)).await
    }

    /// Request a token for a space-separated scope string.
    pub(crate) async fn request_token(&self, scope: &str) -> ClientResult<Token> {
        let config = self.client.config();
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(ClientError::MissingCredentials);
        }

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("scope", scope),
        ];

        let request = self
            .client
            .http()
            .post(self.client.endpoint(TOKEN_PATH)?)
            .header(API_KEY_HEADER, &config.api_key)
            .form(&params);

        let body = self.client.send(request).await?;
        let envelope: ServerResponse<Token> = decode_body(&body)?;
        Ok(envelope.data)
    }
}
