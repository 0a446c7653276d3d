/*!
reqwest-oauth-session: signed OAuth 1.0a / OAuth 2.0 requests over blocking reqwest.

# Overview

This library builds the `Authorization` header for OAuth 1.0a (HMAC-SHA1, RFC 5849)
and OAuth 2.0 application-only requests, and sends them as a query string, an
url-encoded form or a streamed multipart form. It also runs the PIN based
three-legged flow and the bearer token exchange.

All calls block the current thread.

# How to use

## Basic usecase 1 - sending the tweet

```no_run
use reqwest_oauth_session::{Client, Credentials, MethodType, ParamValue, Parameters};

# fn main() -> Result<(), reqwest_oauth_session::Error> {
let tokens = Credentials::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
    .token("[ACCESS_TOKEN]", "[TOKEN_SECRET]");

let client = Client::new()?;
let endpoint = client.config().api_url("statuses/update_with_media");

// binary values switch the request to multipart/form-data
let params = Parameters::new()
    .with("status", "Hello, Twitter!")
    .with("media[]", ParamValue::file("./photo.png"));

let resp = client.send(&tokens, MethodType::Post, &endpoint, params)?;
# let _ = resp;
# Ok(())
# }
```

## Basic usecase 2 - Acquiring OAuth token & secret

```no_run
use std::io;
use reqwest_oauth_session::{Client, Credentials};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let credentials = Credentials::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]");
let client = Client::new()?;

// step 1: acquire request token & token secret
let session = client.authorize_with_callback(&credentials, "oob")?;

// step 2. acquire user pin
println!("please access to: {}", session.authorize_url);
println!("input pin: ");
let mut user_input = String::new();
io::stdin().read_line(&mut user_input)?;

// step 3. acquire access token
let tokens = client.get_tokens(&session, user_input.trim())?;
println!(
    "your token and secret is: \n token: {}\n secret: {}",
    tokens.access_token, tokens.access_token_secret
);
# Ok(())
# }
```

## Basic usecase 3 - Application-only bearer token

```no_run
use reqwest_oauth_session::{Client, Credentials, MethodType, Parameters};

# fn main() -> Result<(), reqwest_oauth_session::Error> {
let client = Client::new()?;
let token = client.get_token(&Credentials::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]"))?;

let endpoint = client.config().api_url("search/tweets");
let resp = client.send_bearer(&token, MethodType::Get, &endpoint, Parameters::new().with("q", "rust"))?;
# let _ = resp;

client.invalidate_token(&token)?;
# Ok(())
# }
```
*/
mod client;
mod config;
pub mod encoding;
mod error;
pub mod multipart;
mod oauth1;
mod oauth2;
mod parameters;
mod secrets;
pub mod signature;
mod signer;
mod token_reader;
mod transport;

// exposed to external program
pub use client::{Client, MethodType};
pub use config::{Config, Endpoints, DEFAULT_API_VERSION};
pub use error::{
    Error, MalformedResponseError, MalformedResponseResult, Result, SignError, SignResult,
};
pub use oauth2::{basic_credentials, read_access_token};
pub use parameters::{ParamValue, Parameters};
pub use secrets::{Credentials, OAuth2Token, OAuthSession, SecretsProvider, Tokens};
pub use signer::{OAuthParameters, Signer};
pub use token_reader::{read_oauth_token, TokenReader, TokenResponse};
pub use transport::{RequestOptions, ResponseMode, Transport};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `realm`.
pub const REALM_KEY: &str = "realm";

// crate-private constant variables
pub(crate) const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
pub(crate) const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub(crate) const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub(crate) const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub(crate) const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
