// Kuna account authentication
//
// Exchanges email/password for an opaque bearer token. The token is
// stored on the client and attached to every subsequent request; there
// is no refresh endpoint -- an expired token is replaced by logging in
// again.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

const AUTH_ENDPOINT: &str = "account/auth";

/// Response body of `POST account/auth`.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
}

impl ApiClient {
    /// Authenticate with the Kuna cloud using email/password.
    ///
    /// On success the bearer token is stored on the client and used for
    /// all subsequent requests. A response without a usable token maps to
    /// [`Error::Authentication`] -- the credentials should be checked.
    pub async fn authenticate(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        debug!("authenticating account {email}");

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp: AuthResponse = self.post(AUTH_ENDPOINT, &body).await?;

        match resp.token {
            Some(token) if !token.is_empty() => {
                self.set_token(token);
                debug!("authentication successful");
                Ok(())
            }
            _ => Err(Error::Authentication {
                message: "no token in auth response -- check email and password".into(),
            }),
        }
    }
}
