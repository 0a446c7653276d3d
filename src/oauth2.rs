//! Application-only authentication (OAuth 2.0 client credentials grant).

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use log::debug;
use serde::Deserialize;

use crate::encoding::percent_decode;
use crate::{
    Client, Credentials, MalformedResponseError, MalformedResponseResult, OAuth2Token,
    Parameters, RequestOptions, Result,
};

const GRANT_TYPE_KEY: &str = "grant_type";
const CLIENT_CREDENTIALS: &str = "client_credentials";
const ACCESS_TOKEN_KEY: &str = "access_token";

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
}

/// `Basic base64(consumer_key:consumer_secret)`
pub fn basic_credentials(credentials: &Credentials) -> String {
    let pair = format!("{}:{}", credentials.consumer_key, credentials.consumer_secret);
    format!("Basic {}", BASE64_STANDARD.encode(pair))
}

/// Pull `access_token` out of a JSON object.
pub fn read_access_token(text: &str) -> MalformedResponseResult<String> {
    let parsed: AccessTokenResponse = serde_json::from_str(text)
        .map_err(|e| MalformedResponseError::InvalidJson(e.to_string()))?;
    parsed
        .access_token
        .ok_or_else(|| MalformedResponseError::MissingField(ACCESS_TOKEN_KEY, text.to_string()))
}

impl Client {
    /// Obtain a bearer token for `credentials`.
    pub fn get_token(&self, credentials: &Credentials) -> Result<OAuth2Token> {
        self.get_token_with_options(credentials, &RequestOptions::new())
    }

    /// [`Client::get_token`] with request options.
    pub fn get_token_with_options(
        &self,
        credentials: &Credentials,
        options: &RequestOptions,
    ) -> Result<OAuth2Token> {
        let params = Parameters::new().with(GRANT_TYPE_KEY, CLIENT_CREDENTIALS);
        let text = self.transport().post_form_text(
            &self.config().endpoints.oauth2_token,
            &params,
            &basic_credentials(credentials),
            options,
        )?;
        let bearer_token = read_access_token(&text)?;
        debug!("bearer token obtained");

        Ok(OAuth2Token {
            credentials: credentials.clone(),
            bearer_token,
        })
    }

    /// Revoke `token`, returning the token the server reports as invalidated.
    pub fn invalidate_token(&self, token: &OAuth2Token) -> Result<String> {
        self.invalidate_token_with_options(token, &RequestOptions::new())
    }

    /// [`Client::invalidate_token`] with request options.
    pub fn invalidate_token_with_options(
        &self,
        token: &OAuth2Token,
        options: &RequestOptions,
    ) -> Result<String> {
        let params =
            Parameters::new().with(ACCESS_TOKEN_KEY, percent_decode(&token.bearer_token));
        let text = self.transport().post_form_text(
            &self.config().endpoints.oauth2_invalidate_token,
            &params,
            &basic_credentials(&token.credentials),
            options,
        )?;
        let invalidated = read_access_token(&text)?;
        debug!("bearer token invalidated");

        Ok(invalidated)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Config, Endpoints, Error};

    fn client(server: &MockServer) -> Client {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = Config::default().with_endpoints(Endpoints::with_base(&server.base_url()));
        Client::with_config(config).unwrap()
    }

    #[test]
    fn test_basic_credentials() {
        assert_eq!(
            basic_credentials(&Credentials::new("ck", "cs")),
            "Basic Y2s6Y3M="
        );
    }

    #[test]
    fn test_read_access_token() {
        assert_eq!(
            read_access_token(r#"{"token_type":"bearer","access_token":"xyz"}"#),
            Ok("xyz".to_string())
        );
        assert_eq!(
            read_access_token("{}"),
            Err(MalformedResponseError::MissingField(
                "access_token",
                "{}".to_string()
            ))
        );
        assert!(matches!(
            read_access_token("<html>"),
            Err(MalformedResponseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_get_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth2/token")
                .header("authorization", "Basic Y2s6Y3M=")
                .header("content-type", "application/x-www-form-urlencoded")
                .body("grant_type=client_credentials");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"xyz"}"#);
        });

        let token = client(&server)
            .get_token(&Credentials::new("ck", "cs"))
            .unwrap();

        mock.assert();
        assert_eq!(token.bearer_token, "xyz");
        assert_eq!(token.credentials, Credentials::new("ck", "cs"));
    }

    #[test]
    fn test_get_token_without_field() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth2/token");
            then.status(200).body("{}");
        });

        let err = client(&server)
            .get_token(&Credentials::new("ck", "cs"))
            .unwrap_err();
        assert!(err.is_malformed_response());
    }

    #[test]
    fn test_get_token_forbidden() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth2/token");
            then.status(403).body(r#"{"errors":[{"code":99}]}"#);
        });

        let err = client(&server)
            .get_token(&Credentials::new("ck", "cs"))
            .unwrap_err();
        match err {
            Error::Status { status, body } => {
                assert_eq!(status.as_u16(), 403);
                assert_eq!(body, r#"{"errors":[{"code":99}]}"#);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalidate_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth2/invalidate_token")
                .header("authorization", "Basic Y2s6Y3M=")
                .body("access_token=AAAA%2FAAA");
            then.status(200).body(r#"{"access_token":"AAAA%2FAAA"}"#);
        });

        let token = OAuth2Token {
            credentials: Credentials::new("ck", "cs"),
            bearer_token: "AAAA%2FAAA".to_string(),
        };
        let invalidated = client(&server).invalidate_token(&token).unwrap();

        mock.assert();
        assert_eq!(invalidated, token.bearer_token);
    }

    #[test]
    fn test_get_token_honours_deadline() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth2/token");
            then.status(200)
                .delay(Duration::from_secs(3))
                .body(r#"{"access_token":"xyz"}"#);
        });

        let err = client(&server)
            .get_token_with_options(
                &Credentials::new("ck", "cs"),
                &RequestOptions::new().timeout(Duration::from_millis(300)),
            )
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
