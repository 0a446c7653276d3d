//! Wire level GET / POST calls over `reqwest::blocking`.

use std::io::{self, Cursor, Read};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE, EXPECT};
use log::{debug, warn};
use reqwest::blocking::{Body, Client as HttpClient, RequestBuilder, Response};

use crate::encoding::encode_pairs;
use crate::multipart;
use crate::{Config, Error, Parameters, Result};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const EXPECT_CONTINUE: &str = "100-continue";

/// How long an ignored request keeps listening once its body is out, so that
/// an immediate failure such as a refused connection is still reported.
const HAND_OFF_GRACE: Duration = Duration::from_millis(100);

/// What to do with the server's reply to a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Check the status and hand the response to the caller.
    #[default]
    Read,
    /// Fire and forget: return as soon as the body is written, without
    /// waiting for a reply.
    Ignore,
}

/// Per-request knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    pub response: ResponseMode,
    /// Deadline for the whole request, overriding the client wide timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn ignore_response(self) -> Self {
        RequestOptions {
            response: ResponseMode::Ignore,
            ..self
        }
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        RequestOptions {
            timeout: Some(timeout),
            ..self
        }
    }
}

/// Progress of a request running in the background.
pub(crate) enum Sent {
    /// The whole body has been handed to the connection.
    Body,
    /// The server answered, or the request failed.
    Reply(Result<Response>),
}

/// Reports [`Sent::Body`] once the wrapped body has been read to its end.
pub(crate) struct HandOff<R> {
    inner: R,
    written: Option<Sender<Sent>>,
    remaining: Option<u64>,
}

impl<R: Read> HandOff<R> {
    pub(crate) fn new(inner: R, written: Sender<Sent>, len: Option<u64>) -> Self {
        HandOff {
            inner,
            written: Some(written),
            remaining: len,
        }
    }
}

impl<R: Read> Read for HandOff<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(n as u64);
        }
        let finished = (n == 0 && !buf.is_empty()) || self.remaining == Some(0);
        if finished {
            if let Some(tx) = self.written.take() {
                let _ = tx.send(Sent::Body);
            }
        }
        Ok(n)
    }
}

/// Sends already signed requests.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    inner: HttpClient,
    expect_continue: bool,
}

impl Transport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(ref user_agent) = config.user_agent {
            let user_agent = HeaderValue::from_str(user_agent)
                .map_err(|e| Error::Config(format!("invalid user agent: {}", e)))?;
            builder = builder.user_agent(user_agent);
        }
        if config.danger_accept_invalid_certs {
            warn!("TLS certificate validation is disabled, every connection can be intercepted");
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Transport {
            inner: builder.build()?,
            expect_continue: config.expect_continue,
        })
    }

    /// `GET url?params` and return the response for the caller to read.
    ///
    /// # Errors
    ///
    /// `Error::Status` on a non-2xx reply, `Error::Encoding` if a parameter
    /// holds binary content or the authorization is not a valid header value.
    pub fn get(
        &self,
        url: &str,
        params: &Parameters,
        authorization: &str,
        options: &RequestOptions,
    ) -> Result<Response> {
        let query = url_encoded(params)?;
        let target = if query.is_empty() {
            url.to_string()
        } else {
            let separator = if url.contains('?') { '&' } else { '?' };
            format!("{}{}{}", url, separator, query)
        };
        debug!("GET {}", url);

        let request = self
            .inner
            .get(target)
            .header(AUTHORIZATION, header_value(authorization)?);
        check_status(self.send(request, options)?)
    }

    /// POST `params` as an `application/x-www-form-urlencoded` body.
    ///
    /// Returns `None` when `options` ignore the response.
    pub fn post_form(
        &self,
        url: &str,
        params: &Parameters,
        authorization: &str,
        options: &RequestOptions,
    ) -> Result<Option<Response>> {
        let body = url_encoded(params)?;
        debug!("POST {} (form, {} bytes)", url, body.len());
        let request = self
            .post(url, authorization)?
            .header(CONTENT_TYPE, FORM_URLENCODED);

        match options.response {
            ResponseMode::Read => check_status(self.send(request.body(body), options)?).map(Some),
            ResponseMode::Ignore => self.fire(options, move |written| {
                if body.is_empty() {
                    let _ = written.send(Sent::Body);
                    return Ok(request.body(body));
                }
                let len = body.len() as u64;
                let reader = HandOff::new(Cursor::new(body.into_bytes()), written, Some(len));
                Ok(request.body(Body::sized(reader, len)))
            }),
        }
    }

    /// POST a url-encoded form and read the whole reply as text.
    ///
    /// The response is always read here, so `options.response` is ignored.
    pub fn post_form_text(
        &self,
        url: &str,
        params: &Parameters,
        authorization: &str,
        options: &RequestOptions,
    ) -> Result<String> {
        let options = RequestOptions {
            response: ResponseMode::Read,
            ..*options
        };
        match self.post_form(url, params, authorization, &options)? {
            Some(response) => Ok(response.text()?),
            None => Ok(String::new()),
        }
    }

    /// POST `params` as a streamed `multipart/form-data` body.
    pub fn post_multipart(
        &self,
        url: &str,
        params: Parameters,
        authorization: &str,
        options: &RequestOptions,
    ) -> Result<Option<Response>> {
        debug!("POST {} (multipart, {} parts)", url, params.len());
        let request = self.post(url, authorization)?;

        match options.response {
            ResponseMode::Read => {
                let form = multipart::form(params)?;
                check_status(self.send(request.multipart(form), options)?).map(Some)
            }
            ResponseMode::Ignore => self.fire(options, move |written| {
                Ok(request.multipart(multipart::build_form(params, Some(written))?))
            }),
        }
    }

    fn post(&self, url: &str, authorization: &str) -> Result<RequestBuilder> {
        let request = self
            .inner
            .post(url)
            .header(AUTHORIZATION, header_value(authorization)?);
        if self.expect_continue {
            Ok(request.header(EXPECT, EXPECT_CONTINUE))
        } else {
            Ok(request)
        }
    }

    fn send(&self, request: RequestBuilder, options: &RequestOptions) -> Result<Response> {
        Ok(with_timeout(request, options).send()?)
    }

    /// Send the request from a background thread and return once its body is
    /// written. The reply is never read; it is only logged.
    fn fire<F>(&self, options: &RequestOptions, build: F) -> Result<Option<Response>>
    where
        F: FnOnce(Sender<Sent>) -> Result<RequestBuilder>,
    {
        let (tx, rx) = mpsc::channel();
        let request = with_timeout(build(tx.clone())?, options);
        thread::Builder::new()
            .name("oauth-ignored-reply".to_string())
            .spawn(move || {
                let reply = request.send().map_err(Error::from);
                match reply {
                    Ok(ref response) => debug!("ignored reply {}", response.status()),
                    Err(ref e) => debug!("ignored request failed: {}", e),
                }
                let _ = tx.send(Sent::Reply(reply));
            })?;

        match rx.recv() {
            Ok(Sent::Body) => {}
            Ok(Sent::Reply(reply)) => return ignored(reply),
            Err(_) => return Ok(None),
        }
        match rx.recv_timeout(HAND_OFF_GRACE) {
            Ok(Sent::Reply(reply)) => ignored(reply),
            _ => Ok(None),
        }
    }
}

fn with_timeout(request: RequestBuilder, options: &RequestOptions) -> RequestBuilder {
    match options.timeout {
        Some(timeout) => request.timeout(timeout),
        None => request,
    }
}

fn ignored(reply: Result<Response>) -> Result<Option<Response>> {
    let response = reply?;
    if !response.status().is_success() {
        warn!(
            "ignored response from {} had status {}",
            response.url(),
            response.status()
        );
    }
    Ok(None)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::Encoding(format!("invalid header value: {}", e)))
}

/// Serialize text parameters as `k=v&k=v`.
pub(crate) fn url_encoded(params: &Parameters) -> Result<String> {
    if let Some(key) = params.first_binary_key() {
        return Err(Error::Encoding(format!(
            "parameter {} carries binary content and cannot be url-encoded",
            key
        )));
    }
    Ok(encode_pairs(params.text_pairs()))
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().unwrap_or_default();
        Err(Error::Status { status, body })
    }
}
