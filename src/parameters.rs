use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A single request parameter value.
pub enum ParamValue {
    /// Plain text; the only kind that is signed, url-encoded or sent in a query.
    Text(String),
    /// Raw bytes, sent as an `application/octet-stream` multipart part.
    Bytes(Vec<u8>),
    /// A reader streamed into a multipart part.
    Stream(Box<dyn Read + Send>),
    /// A file opened lazily and streamed into a multipart part.
    File(PathBuf),
}

impl ParamValue {
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        ParamValue::File(path.as_ref().to_path_buf())
    }

    pub fn stream<R: Read + Send + 'static>(reader: R) -> Self {
        ParamValue::Stream(Box::new(reader))
    }

    /// Text content, or `None` for binary values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        !matches!(self, ParamValue::Text(_))
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            ParamValue::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            ParamValue::Stream(_) => f.write_str("Stream(..)"),
            ParamValue::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(value: Vec<u8>) -> Self {
        ParamValue::Bytes(value)
    }
}

impl From<&[u8]> for ParamValue {
    fn from(value: &[u8]) -> Self {
        ParamValue::Bytes(value.to_vec())
    }
}

macro_rules! text_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    ParamValue::Text(value.to_string())
                }
            }
        )*
    };
}

text_from_display!(bool, i32, i64, u32, u64, usize, f64);

/// Request parameters keyed by name, in insertion order.
///
/// Keys are unique: setting an existing key replaces its value in place.
#[derive(Debug, Default)]
pub struct Parameters {
    entries: Vec<(String, ParamValue)>,
}

impl Parameters {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set `key` to `value`, returning the replaced value if any.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<ParamValue>
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder flavour of [`Parameters::insert`].
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Text valued entries only; these are the ones that get signed.
    pub fn text_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_text().map(|text| (k.as_str(), text)))
    }

    /// First key holding a binary value, if any.
    pub fn first_binary_key(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| v.is_binary())
            .map(|(k, _)| k.as_str())
    }

    pub fn has_binary(&self) -> bool {
        self.first_binary_key().is_some()
    }
}

impl IntoIterator for Parameters {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
