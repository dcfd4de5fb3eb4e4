//! Bearer credential sources
//!
//! Tokens are issued by an external session manager; this crate only reads
//! them. A source returning `None` means no credential is available.

/// Environment variable read by [`EnvCredential::default`]
pub const TOKEN_ENV_VAR: &str = "ACCESS_API_TOKEN";

/// Supplies the bearer token attached to every API call
pub trait CredentialSource: Send + Sync {
    /// Current bearer token, if any
    fn bearer_token(&self) -> Option<String>;

    /// Whether a token is currently available
    fn has_token(&self) -> bool {
        self.bearer_token().is_some()
    }
}

/// Fixed token (or fixed absence of one)
#[derive(Clone, Debug, Default)]
pub struct StaticCredential {
    token: Option<String>,
}

impl StaticCredential {
    /// Credential with the given token; an empty token counts as absent
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.is_empty()).then_some(token),
        }
    }

    /// No credential
    #[must_use]
    pub const fn none() -> Self {
        Self { token: None }
    }
}

impl CredentialSource for StaticCredential {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Token read from an environment variable on every call
#[derive(Clone, Debug)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    /// Read the token from `var`
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new(TOKEN_ENV_VAR)
    }
}

impl CredentialSource for EnvCredential {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|t| !t.is_empty())
    }
}
