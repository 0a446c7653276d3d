//! Three-legged OAuth 1.0a with PIN based verification.
//!
//! `Credentials` → [`Client::authorize`] → `OAuthSession` → [`Client::get_tokens`] → `Tokens`

use std::collections::HashMap;

use http::Method;
use log::debug;
use url::Url;

use crate::{
    Client, Credentials, Error, MalformedResponseError, MalformedResponseResult,
    OAuthParameters, OAuthSession, Parameters, RequestOptions, Result, Signer, TokenReader,
    Tokens, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY,
};

const USER_ID_KEY: &str = "user_id";
const SCREEN_NAME_KEY: &str = "screen_name";

impl Client {
    /// Obtain a request token and the url the user has to visit for a PIN.
    pub fn authorize(&self, credentials: &Credentials) -> Result<OAuthSession> {
        self.authorize_with_options(credentials, OAuthParameters::new(), &RequestOptions::new())
    }

    /// Like [`Client::authorize`], sending `oauth_callback` (`"oob"` for PIN flow).
    pub fn authorize_with_callback(
        &self,
        credentials: &Credentials,
        callback: &str,
    ) -> Result<OAuthSession> {
        self.authorize_with_options(
            credentials,
            OAuthParameters::new().callback(callback),
            &RequestOptions::new(),
        )
    }

    /// [`Client::authorize`] with explicit `oauth_*` overrides and request options.
    pub fn authorize_with_options(
        &self,
        credentials: &Credentials,
        oauth: OAuthParameters<'_>,
        options: &RequestOptions,
    ) -> Result<OAuthSession> {
        let endpoints = &self.config().endpoints;
        let params = Parameters::new();
        let authorization = Signer::new(credentials, oauth).generate_signature(
            &Method::GET,
            &endpoints.request_token,
            &params,
        )?;

        let token = self
            .transport()
            .get(&endpoints.request_token, &params, &authorization, options)?
            .parse_oauth_token()?;

        let authorize_url = Url::parse_with_params(
            &endpoints.authorize,
            &[(OAUTH_TOKEN_KEY, token.oauth_token.as_str())],
        )
        .map_err(|e| Error::Config(format!("invalid authorize endpoint: {}", e)))?;
        debug!("request token obtained, authorize at {}", authorize_url);

        Ok(OAuthSession {
            credentials: credentials.clone(),
            request_token: token.oauth_token,
            request_token_secret: token.oauth_token_secret,
            authorize_url,
        })
    }

    /// Exchange the request token in `session` and the user's `pin` for an
    /// access token.
    pub fn get_tokens(&self, session: &OAuthSession, pin: &str) -> Result<Tokens> {
        self.get_tokens_with_options(session, pin, &RequestOptions::new())
    }

    /// [`Client::get_tokens`] with request options.
    pub fn get_tokens_with_options(
        &self,
        session: &OAuthSession,
        pin: &str,
        options: &RequestOptions,
    ) -> Result<Tokens> {
        let url = &self.config().endpoints.access_token;
        let params = Parameters::new().with(OAUTH_VERIFIER_KEY, pin);
        let authorization = Signer::new(session, OAuthParameters::new()).generate_signature(
            &Method::GET,
            url,
            &params,
        )?;

        let mut token = self
            .transport()
            .get(url, &params, &authorization, options)?
            .parse_oauth_token()?;

        let user_id = take_field(&mut token.remain, USER_ID_KEY)?;
        let user_id = user_id
            .parse::<i64>()
            .map_err(|_| MalformedResponseError::InvalidUserId(user_id.clone()))?;
        let screen_name = take_field(&mut token.remain, SCREEN_NAME_KEY)?;
        debug!("access token obtained for user {}", user_id);

        Ok(Tokens {
            credentials: session.credentials.clone(),
            access_token: token.oauth_token,
            access_token_secret: token.oauth_token_secret,
            user_id: Some(user_id),
            screen_name: Some(screen_name),
        })
    }
}

fn take_field(
    remain: &mut HashMap<String, String>,
    key: &'static str,
) -> MalformedResponseResult<String> {
    remain.remove(key).ok_or_else(|| {
        let mut others = remain.keys().map(String::as_str).collect::<Vec<_>>();
        others.sort_unstable();
        MalformedResponseError::MissingField(key, others.join("&"))
    })
}
