//! HMAC-SHA1 signature generation (RFC 5849 section 3.4).

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use http::Method;
use log::debug;
use sha1::Sha1;

use crate::encoding::percent_encode;
use crate::{SignError, SignResult};

type HmacSha1 = Hmac<Sha1>;

/// Normalize the parameters into the `key=value&...` string that goes into
/// the base string.
///
/// Keys and values are encoded independently, then sorted by encoded key and
/// encoded value. Repeated keys are all kept.
pub fn normalize_parameters<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut encoded = params
        .into_iter()
        .map(|(k, v)| (percent_encode(k.as_ref()), percent_encode(v.as_ref())))
        .collect::<Vec<_>>();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// `METHOD&encoded(url)&encoded(parameter string)`.
pub fn signature_base_string<I, K, V>(method: &Method, url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        percent_encode(url),
        percent_encode(&normalize_parameters(params))
    )
}

/// `encoded(consumer_secret)&encoded(token_secret)`; the `&` is kept even
/// without a token secret.
pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    )
}

/// Compute the Base64 encoded HMAC-SHA1 signature of a request.
///
/// `params` must already contain the `oauth_*` control parameters and only
/// the text valued request parameters.
pub fn sign<I, K, V>(
    consumer_secret: &str,
    token_secret: Option<&str>,
    method: &Method,
    url: &str,
    params: I,
) -> SignResult<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let base_string = signature_base_string(method, url, params);
    debug!("signature base string: {}", base_string);

    let key = signing_key(consumer_secret, token_secret);
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| SignError::InvalidKey(e.to_string()))?;
    mac.update(base_string.as_bytes());

    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}
