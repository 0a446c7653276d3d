//! RFC 3986 percent-encoding and the `key=value&...` wire format.

use std::collections::HashMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_' and '~'.
pub(crate) const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `text` for use in a signature base string, header or body.
///
/// Unreserved bytes pass through, every other byte becomes `%XX` with
/// uppercase hex digits. The empty string encodes to the empty string.
pub fn percent_encode(text: &str) -> String {
    utf8_percent_encode(text, OAUTH_ENCODE_SET).to_string()
}

/// Reverse of [`percent_encode`]. Invalid UTF-8 is replaced lossily.
pub fn percent_decode(text: &str) -> String {
    percent_decode_str(text).decode_utf8_lossy().into_owned()
}

/// Serialize pairs as `key=value&key=value`, both sides percent-encoded.
pub fn encode_pairs<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                percent_encode(k.as_ref()),
                percent_encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Parse an OAuth 1.0a token endpoint body (`key=value&key=value`).
///
/// Fragments without `=` are dropped. Values are split at the first `=` and
/// kept verbatim. A repeated key keeps its last value.
pub fn parse_form_response(text: &str) -> HashMap<String, String> {
    text.split('&')
        .filter_map(|fragment| fragment.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
