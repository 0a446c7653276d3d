use std::collections::HashMap;

use reqwest::blocking::Response;

use crate::encoding::parse_form_response;
use crate::{
    MalformedResponseError, MalformedResponseResult, Result, OAUTH_TOKEN_KEY,
    OAUTH_TOKEN_SECRET_KEY,
};

/// Represents response of token acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other contents
    pub remain: HashMap<String, String>,
}

/// Add parse_oauth_token feature to reqwest::blocking::Response.
pub trait TokenReader: private::Sealed {
    fn parse_oauth_token(self) -> Result<TokenResponse>;
}

impl TokenReader for Response {
    fn parse_oauth_token(self) -> Result<TokenResponse> {
        let text = self.text()?;
        Ok(read_oauth_token(&text)?)
    }
}

/// Parse a `key=value&...` token endpoint body.
///
/// Both `oauth_token` and `oauth_token_secret` must be present, everything
/// else ends up in `remain`.
pub fn read_oauth_token(text: &str) -> MalformedResponseResult<TokenResponse> {
    let mut destructured = parse_form_response(text);
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = destructured.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            remain: destructured,
        }),
        (None, _) => Err(MalformedResponseError::MissingField(
            OAUTH_TOKEN_KEY,
            text.to_string(),
        )),
        (_, _) => Err(MalformedResponseError::MissingField(
            OAUTH_TOKEN_SECRET_KEY,
            text.to_string(),
        )),
    }
}

mod private {
    use reqwest::blocking::Response;

    pub trait Sealed {}
    impl Sealed for Response {}
}
