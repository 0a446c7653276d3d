use http::Method;
use log::debug;
use reqwest::blocking::Response;

use crate::{
    Config, OAuth2Token, OAuthParameters, Parameters, RequestOptions, Result, SecretsProvider,
    Signer, Transport,
};

/// How a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodType {
    /// GET with the parameters in the query string.
    Get,
    /// POST; url-encoded, or multipart when any parameter is binary.
    Post,
    /// POST without reading any response.
    PostNoResponse,
}

impl MethodType {
    pub fn http_method(self) -> Method {
        match self {
            MethodType::Get => Method::GET,
            MethodType::Post | MethodType::PostNoResponse => Method::POST,
        }
    }
}

/// Signs requests and sends them through a shared [`Transport`].
#[derive(Debug, Clone)]
pub struct Client {
    config: Config,
    transport: Transport,
}

impl Client {
    /// Constructs a new `Client` with the default configuration.
    pub fn new() -> Result<Self> {
        Client::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(Client { config, transport })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Sign `params` with `secrets` and send them to `url`.
    ///
    /// Returns `None` for [`MethodType::PostNoResponse`].
    pub fn send<S>(
        &self,
        secrets: &S,
        method: MethodType,
        url: &str,
        params: Parameters,
    ) -> Result<Option<Response>>
    where
        S: SecretsProvider,
    {
        self.send_with_params(
            secrets,
            OAuthParameters::new(),
            method,
            url,
            params,
            RequestOptions::new(),
        )
    }

    /// [`Client::send`] with explicit `oauth_*` overrides and request options.
    pub fn send_with_params<S>(
        &self,
        secrets: &S,
        oauth: OAuthParameters<'_>,
        method: MethodType,
        url: &str,
        params: Parameters,
        options: RequestOptions,
    ) -> Result<Option<Response>>
    where
        S: SecretsProvider,
    {
        let authorization =
            Signer::new(secrets, oauth).generate_signature(&method.http_method(), url, &params)?;
        self.dispatch(&authorization, method, url, params, options)
    }

    /// Send an application-only request with a bearer token.
    pub fn send_bearer(
        &self,
        token: &OAuth2Token,
        method: MethodType,
        url: &str,
        params: Parameters,
    ) -> Result<Option<Response>> {
        self.send_bearer_with_options(token, method, url, params, RequestOptions::new())
    }

    /// [`Client::send_bearer`] with request options.
    pub fn send_bearer_with_options(
        &self,
        token: &OAuth2Token,
        method: MethodType,
        url: &str,
        params: Parameters,
        options: RequestOptions,
    ) -> Result<Option<Response>> {
        self.dispatch(&token.authorization_header(), method, url, params, options)
    }

    fn dispatch(
        &self,
        authorization: &str,
        method: MethodType,
        url: &str,
        params: Parameters,
        options: RequestOptions,
    ) -> Result<Option<Response>> {
        debug!("dispatching {:?} {}", method, url);
        let options = match method {
            MethodType::PostNoResponse => options.ignore_response(),
            _ => options,
        };
        match method {
            MethodType::Get => self
                .transport
                .get(url, &params, authorization, &options)
                .map(Some),
            MethodType::Post | MethodType::PostNoResponse if params.has_binary() => self
                .transport
                .post_multipart(url, params, authorization, &options),
            MethodType::Post | MethodType::PostNoResponse => self
                .transport
                .post_form(url, &params, authorization, &options),
        }
    }
}
