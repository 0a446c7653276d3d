use std::borrow::Cow;

use chrono::Utc;
use http::Method;
use rand::distributions::Alphanumeric;
use rand::Rng;
use url::Url;

use crate::encoding::percent_encode;
use crate::signature;
use crate::{
    Parameters, SecretsProvider, SignError, SignResult, OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY,
    OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY, OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY,
    OAUTH_TOKEN_KEY, OAUTH_VERSION_KEY, REALM_KEY,
};

const HMAC_SHA1: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// Builds the OAuth 1.0a `Authorization` header for one request.
#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
    parameters: OAuthParameters<'a>,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider, parameters: OAuthParameters<'a>) -> Self {
        Signer {
            secrets,
            parameters,
        }
    }

    /// Sign the request and return the `OAuth ...` header value.
    ///
    /// Only text valued `params` take part in the signature and none of them
    /// are copied into the header. A query string in `url` is signed along
    /// with `params` and left out of the signed url.
    pub fn generate_signature(
        self,
        method: &Method,
        url: &str,
        params: &Parameters,
    ) -> SignResult<String> {
        let (consumer_key, consumer_secret) = self.secrets.get_consumer_key_pair();
        let (token, token_secret) = self.secrets.get_token_option_pair();
        let mut oauth = self.parameters.build_options(consumer_key, token);
        let (url, query) = split_query(url)?;

        let sign = signature::sign(
            consumer_secret,
            token_secret,
            method,
            &url,
            oauth
                .iter()
                .map(|(k, v)| (*k, &**v))
                .chain(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .chain(params.text_pairs()),
        )?;
        oauth.push((OAUTH_SIGNATURE_KEY, Cow::from(sign)));
        oauth.sort();

        let mut fields = Vec::with_capacity(oauth.len() + 1);
        if let Some(ref realm) = self.parameters.realm {
            fields.push(format!("{}=\"{}\"", REALM_KEY, percent_encode(realm)));
        }
        fields.extend(
            oauth
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, percent_encode(v))),
        );

        Ok(format!("OAuth {}", fields.join(", ")))
    }
}

/// Overrides for the generated `oauth_*` values.
///
/// Nonce and timestamp are normally generated per request; fixing them makes
/// signatures reproducible.
#[derive(Debug, Clone, Default)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    realm: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_callback value
    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the realm value
    ///
    /// # Note
    /// realm is sent percent-encoded in the header but never signed.
    pub fn realm<T>(self, realm: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            realm: Some(realm.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    fn build_options<'s>(
        &'s self,
        consumer_key: &'s str,
        token: Option<&'s str>,
    ) -> Vec<(&'static str, Cow<'s, str>)> {
        let nonce = match self.nonce {
            Some(ref nonce) => Cow::from(&**nonce),
            None => Cow::from(generate_nonce()),
        };
        let timestamp = match self.timestamp {
            Some(timestamp) => timestamp.to_string(),
            None => Utc::now().timestamp().to_string(),
        };

        let mut opt = vec![
            (OAUTH_CONSUMER_KEY, Cow::from(consumer_key)),
            (OAUTH_NONCE_KEY, nonce),
            (OAUTH_SIGNATURE_METHOD_KEY, Cow::from(HMAC_SHA1)),
            (OAUTH_TIMESTAMP_KEY, Cow::from(timestamp)),
            (OAUTH_VERSION_KEY, Cow::from(OAUTH_VERSION)),
        ];
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            opt.push((OAUTH_TOKEN_KEY, Cow::from(token)));
        }
        if let Some(ref callback) = self.callback {
            opt.push((OAUTH_CALLBACK_KEY, Cow::from(&**callback)));
        }
        opt
    }
}

/// Separate the query of `url` into decoded pairs.
fn split_query(url: &str) -> SignResult<(Cow<'_, str>, Vec<(String, String)>)> {
    if !url.contains('?') {
        return Ok((Cow::from(url), Vec::new()));
    }
    let mut parsed = Url::parse(url).map_err(|e| SignError::InvalidUrl(e.to_string()))?;
    let query = parsed.query_pairs().into_owned().collect();
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok((Cow::from(String::from(parsed)), query))
}

/// Random alphanumeric nonce from the thread local CSPRNG.
fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::encoding::percent_decode;
    use crate::Credentials;

    fn parse_header(auth_header: &str) -> BTreeMap<String, String> {
        let content = auth_header.strip_prefix("OAuth ").unwrap();
        content
            .split(", ")
            .filter_map(|item| item.split_once('='))
            .map(|(k, v)| (k.to_string(), percent_decode(v.trim_matches('"'))))
            .collect()
    }

    fn twitter_request() -> (crate::Tokens, Parameters) {
        // https://developer.twitter.com/en/docs/authentication/oauth-1-0a/creating-a-signature
        let tokens = Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        )
        .token(
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        );
        let params = Parameters::new()
            .with("include_entities", "true")
            .with("status", "Hello Ladies + Gentlemen, a signed OAuth request!");
        (tokens, params)
    }

    fn fixed() -> OAuthParameters<'static> {
        OAuthParameters::new()
            .nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
            .timestamp(1_318_622_958u64)
    }

    #[test]
    fn sign_post_body() {
        let (tokens, params) = twitter_request();
        let header = Signer::new(&tokens, fixed())
            .generate_signature(
                &Method::POST,
                "https://api.twitter.com/1.1/statuses/update.json",
                &params,
            )
            .unwrap();

        let fields = parse_header(&header);
        assert_eq!(fields["oauth_signature"], "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
    }

    #[test]
    fn header_contains_exact_oauth_keys() {
        let (tokens, params) = twitter_request();
        let header = Signer::new(&tokens, OAuthParameters::new())
            .generate_signature(&Method::GET, "https://api.twitter.com/1.1/x.json", &params)
            .unwrap();
        let keys = parse_header(&header).into_keys().collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "oauth_consumer_key",
                "oauth_nonce",
                "oauth_signature",
                "oauth_signature_method",
                "oauth_timestamp",
                "oauth_token",
                "oauth_version",
            ]
        );
        assert!(!header.contains("include_entities"));
        assert!(!header.contains("status"));

        let credentials = Credentials::new("ck", "cs");
        let header = Signer::new(&credentials, OAuthParameters::new())
            .generate_signature(&Method::GET, "https://api.twitter.com/1.1/x.json", &params)
            .unwrap();
        let fields = parse_header(&header);
        assert_eq!(fields.len(), 6);
        assert!(!fields.contains_key("oauth_token"));
        assert_eq!(fields["oauth_signature_method"], "HMAC-SHA1");
        assert_eq!(fields["oauth_version"], "1.0");
        assert_eq!(fields["oauth_consumer_key"], "ck");
    }

    #[test]
    fn header_values_are_quoted_and_encoded() {
        let credentials = Credentials::new("key with space", "cs");
        let header = Signer::new(&credentials, OAuthParameters::new().nonce("n/1"))
            .generate_signature(&Method::GET, "https://example.com/", &Parameters::new())
            .unwrap();
        assert!(header.starts_with("OAuth oauth_consumer_key=\"key%20with%20space\", "));
        assert!(header.contains("oauth_nonce=\"n%2F1\""));
    }

    #[test]
    fn binary_values_are_not_signed() {
        let (tokens, params) = twitter_request();
        let with_media = Parameters::new()
            .with("include_entities", "true")
            .with("status", "Hello Ladies + Gentlemen, a signed OAuth request!")
            .with("media", vec![1u8, 2, 3]);
        let url = "https://api.twitter.com/1.1/statuses/update.json";

        let plain = Signer::new(&tokens, fixed())
            .generate_signature(&Method::POST, url, &params)
            .unwrap();
        let binary = Signer::new(&tokens, fixed())
            .generate_signature(&Method::POST, url, &with_media)
            .unwrap();
        assert_eq!(plain, binary);
    }

    #[test]
    fn callback_and_realm() {
        let credentials = Credentials::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44");
        let params = OAuthParameters::new()
            .nonce("wIjqoS")
            .timestamp(137_131_200u64)
            .callback("http://printer.example.com/ready")
            .realm("Photos");
        let header = Signer::new(&credentials, params)
            .generate_signature(
                &Method::POST,
                "https://photos.example.net/initiate",
                &Parameters::new(),
            )
            .unwrap();

        assert!(header.starts_with("OAuth realm=\"Photos\", oauth_callback="));
        let fields = parse_header(&header);
        assert_eq!(fields["oauth_callback"], "http://printer.example.com/ready");
        assert!(!fields.contains_key("oauth_token"));
    }

    #[test]
    fn nonce_is_fresh_per_request() {
        let a = generate_nonce();
        let b = generate_nonce();
        assert_ne!(a, b);
        assert_eq!(a.len(), NONCE_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn realm_is_encoded() {
        let credentials = Credentials::new("ck", "cs");
        let header = Signer::new(&credentials, OAuthParameters::new().realm("Photos \"A\", B"))
            .generate_signature(&Method::GET, "https://example.com/", &Parameters::new())
            .unwrap();

        assert!(header.starts_with("OAuth realm=\"Photos%20%22A%22%2C%20B\", oauth_consumer_key="));
        let fields = parse_header(&header);
        assert_eq!(fields["realm"], "Photos \"A\", B");
        assert_eq!(fields.len(), 7);
    }

    #[test]
    fn query_in_url_is_signed_like_params() {
        let (tokens, _) = twitter_request();
        let params = Parameters::new().with("count", 5i64).with("q", "a b");

        let plain = Signer::new(&tokens, fixed())
            .generate_signature(&Method::GET, "https://api.twitter.com/1.1/search.json", &params)
            .unwrap();
        let in_url = Signer::new(&tokens, fixed())
            .generate_signature(
                &Method::GET,
                "https://api.twitter.com/1.1/search.json?q=a%20b&count=5",
                &Parameters::new(),
            )
            .unwrap();
        let mixed = Signer::new(&tokens, fixed())
            .generate_signature(
                &Method::GET,
                "https://api.twitter.com/1.1/search.json?count=5",
                &Parameters::new().with("q", "a b"),
            )
            .unwrap();

        assert_eq!(plain, in_url);
        assert_eq!(plain, mixed);
    }

    #[test]
    fn rfc5849_url_with_query() {
        // RFC 5849 section 1.2, photo request
        let tokens = Credentials::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
            .token("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
        let header = Signer::new(
            &tokens,
            OAuthParameters::new()
                .nonce("chapoH")
                .timestamp(137_131_202u64),
        )
        .generate_signature(
            &Method::GET,
            "http://photos.example.net/photos?file=vacation.jpg&size=original",
            &Parameters::new(),
        )
        .unwrap();

        // with oauth_version=1.0 added to the RFC parameters
        assert_eq!(
            parse_header(&header)["oauth_signature"],
            "1IAE9RzK+DqSqVTdQ/0zWANXVzs="
        );
    }

    #[test]
    fn unparsable_url_with_query_is_rejected() {
        let credentials = Credentials::new("ck", "cs");
        let err = Signer::new(&credentials, OAuthParameters::new())
            .generate_signature(&Method::GET, "not a url?x=1", &Parameters::new())
            .unwrap_err();
        assert!(matches!(err, SignError::InvalidUrl(_)));
    }
}
