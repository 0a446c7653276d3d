use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type MalformedResponseResult<T> = std::result::Result<T, MalformedResponseError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("token acquisition failed : {0}")]
    MalformedResponse(#[from] MalformedResponseError),
    #[error("OAuth sign failed : {0}")]
    Signer(#[from] SignError),
    #[error("server responded {status} : {body}")]
    Status { status: StatusCode, body: String },
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("failed to read request payload : {0}")]
    Io(#[from] std::io::Error),
    #[error("request could not be encoded : {0}")]
    Encoding(String),
    #[error("invalid configuration : {0}")]
    Config(String),
}

impl Error {
    /// HTTP status of the rejected request, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Reqwest(err) => err.status(),
            _ => None,
        }
    }

    /// Whether the request ran past its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Reqwest(err) if err.is_timeout())
    }

    /// Whether the server answered 2xx but sent something we could not read.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Error::MalformedResponse(_))
    }
}

#[derive(Error, Debug, Clone)]
pub enum SignError {
    #[error("signing key rejected by HMAC-SHA1 : {0}")]
    InvalidKey(String),
    #[error("request url cannot be parsed : {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedResponseError {
    #[error("response has malformed format: not found {0} in {1}")]
    MissingField(&'static str, String),
    #[error("user_id must be an integer, but got {0}")]
    InvalidUserId(String),
    #[error("response is not valid JSON : {0}")]
    InvalidJson(String),
}
