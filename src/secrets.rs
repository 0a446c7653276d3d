use url::Url;

/// Anything that can sign an OAuth 1.0a request.
pub trait SecretsProvider {
    fn get_consumer_key_pair(&self) -> (&str, &str);

    fn get_token_pair_option(&self) -> Option<(&str, &str)>;

    fn get_token_option_pair(&self) -> (Option<&str>, Option<&str>) {
        self.get_token_pair_option()
            .map(|s| (Some(s.0), Some(s.1)))
            .unwrap_or((None, None))
    }
}

/// Consumer key and secret of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl Credentials {
    pub fn new<K, S>(consumer_key: K, consumer_secret: S) -> Self
    where
        K: Into<String>,
        S: Into<String>,
    {
        Credentials {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Attach an already known access token, skipping the PIN flow.
    pub fn token<T, S>(self, access_token: T, access_token_secret: S) -> Tokens
    where
        T: Into<String>,
        S: Into<String>,
    {
        Tokens {
            credentials: self,
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
            user_id: None,
            screen_name: None,
        }
    }
}

impl SecretsProvider for Credentials {
    fn get_consumer_key_pair(&self) -> (&str, &str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    fn get_token_pair_option(&self) -> Option<(&str, &str)> {
        None
    }
}

/// Request token issued by the first leg, waiting for the user's PIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthSession {
    pub credentials: Credentials,
    pub request_token: String,
    pub request_token_secret: String,
    /// Page the user has to visit to obtain the PIN.
    pub authorize_url: Url,
}

impl SecretsProvider for OAuthSession {
    fn get_consumer_key_pair(&self) -> (&str, &str) {
        self.credentials.get_consumer_key_pair()
    }

    fn get_token_pair_option(&self) -> Option<(&str, &str)> {
        Some((&self.request_token, &self.request_token_secret))
    }
}

/// Access token bundle for user-context requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub credentials: Credentials,
    pub access_token: String,
    pub access_token_secret: String,
    pub user_id: Option<i64>,
    pub screen_name: Option<String>,
}

impl SecretsProvider for Tokens {
    fn get_consumer_key_pair(&self) -> (&str, &str) {
        self.credentials.get_consumer_key_pair()
    }

    fn get_token_pair_option(&self) -> Option<(&str, &str)> {
        Some((&self.access_token, &self.access_token_secret))
    }
}

/// Application-only bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Token {
    pub credentials: Credentials,
    pub bearer_token: String,
}

impl OAuth2Token {
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.bearer_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CONSUMER_KEY: &str = "<CONSUMER_KEY>";
    static CONSUMER_SECRET: &str = "<CONSUMER_SECRET>";
    static TOKEN: &str = "<ACCESS_TOKEN>";
    static TOKEN_SECRET: &str = "<ACCESS_TOKEN_SECRET>";

    #[test]
    fn test_credentials_have_no_token() {
        let credentials = Credentials::new(CONSUMER_KEY, CONSUMER_SECRET);
        assert_eq!(
            credentials.get_consumer_key_pair(),
            (CONSUMER_KEY, CONSUMER_SECRET)
        );
        assert_eq!(credentials.get_token_option_pair(), (None, None));
    }

    #[test]
    fn test_tokens_expose_access_token() {
        let tokens = Credentials::new(CONSUMER_KEY, CONSUMER_SECRET).token(TOKEN, TOKEN_SECRET);
        assert_eq!(tokens.get_token_pair_option(), Some((TOKEN, TOKEN_SECRET)));
        assert_eq!(tokens.get_consumer_key_pair().0, CONSUMER_KEY);
        assert_eq!(tokens.user_id, None);
    }

    #[test]
    fn test_bearer_header() {
        let token = OAuth2Token {
            credentials: Credentials::new(CONSUMER_KEY, CONSUMER_SECRET),
            bearer_token: "AAAA%2FAAA".to_string(),
        };
        assert_eq!(token.authorization_header(), "Bearer AAAA%2FAAA");
    }
}
