//! Bearer credential authentication.
//!
//! Signature verification sits behind [`TokenVerifier`]: either a fixed
//! table of credentials from the config file, or RS256 checks against the
//! identity provider's published key set. What comes back is a set of
//! decoded [`Claims`], which [`validate_claims`] turns into the typed
//! [`AuthContext`] handed to every command.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::Context;
use gather_types::Subject;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Decoded token payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub token_use: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub aud: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub exp: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenUse {
    Access,
    Id,
}

impl fmt::Display for TokenUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenUse::Access => f.write_str("access"),
            TokenUse::Id => f.write_str("id"),
        }
    }
}

/// Identity of the caller, produced once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub subject: Subject,
    pub token_use: TokenUse,
    pub client_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("unrecognized token")]
    UnknownToken,

    #[error("no published key matches the token")]
    UnknownKey,

    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    #[error("token expired")]
    Expired,

    #[error("issuer mismatch")]
    IssuerMismatch,

    #[error("unsupported token_use: {0}")]
    TokenUse(String),

    #[error("audience mismatch")]
    AudienceMismatch,

    #[error("missing user sub")]
    MissingSubject,
}

/// Checks a token's signature and decodes its claims.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Verifier backed by credentials listed in the config file.
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Claims>,
}

impl StaticTokenVerifier {
    pub fn from_config(config: &AuthConfig) -> Self {
        let issuer = (!config.issuer.is_empty()).then(|| config.issuer.clone());
        let default_client = (!config.client_id.is_empty()).then(|| config.client_id.clone());

        let tokens = config
            .tokens
            .iter()
            .map(|entry| {
                let client = entry.client_id.clone().or_else(|| default_client.clone());
                let claims = Claims {
                    sub: Some(entry.sub.clone()),
                    token_use: Some(entry.token_use.clone()),
                    client_id: client.clone(),
                    aud: client,
                    iss: issuer.clone(),
                    exp: entry.exp,
                };
                (entry.token.clone(), claims)
            })
            .collect();
        Self { tokens }
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.get(token).cloned().ok_or(AuthError::UnknownToken)
    }
}

/// Verifier for RS256 tokens signed by a key from a JSON Web Key Set, as
/// published by the identity provider at `/.well-known/jwks.json`.
pub struct JwksTokenVerifier {
    keys: JwkSet,
}

impl JwksTokenVerifier {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let keys: JwkSet = serde_json::from_str(json).context("parsing JWKS")?;
        Ok(Self { keys })
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading JWKS {}", path.display()))?;
        Self::from_json(&json)
    }
}

impl TokenVerifier for JwksTokenVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = jsonwebtoken::decode_header(token).map_err(|_| AuthError::UnknownToken)?;
        let jwk = header
            .kid
            .as_deref()
            .and_then(|kid| self.keys.find(kid))
            .ok_or(AuthError::UnknownKey)?;
        let key = DecodingKey::from_jwk(jwk).map_err(|e| AuthError::InvalidSignature(e.to_string()))?;

        // Expiry, issuer and audience are checked by validate_claims.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<Claims>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidSignature(e.to_string()))?;
        Ok(data.claims)
    }
}

/// Build the verifier selected by `auth.verifier`.
pub fn verifier_from_config(config: &AuthConfig) -> anyhow::Result<Box<dyn TokenVerifier>> {
    match config.verifier.as_str() {
        "" | "static" => Ok(Box::new(StaticTokenVerifier::from_config(config))),
        "jwks" => {
            if config.jwks_path.is_empty() {
                anyhow::bail!("auth.jwks_path is required for the jwks verifier");
            }
            Ok(Box::new(JwksTokenVerifier::from_file(Path::new(&config.jwks_path))?))
        }
        other => anyhow::bail!("unknown auth verifier: {other}"),
    }
}

/// Validate decoded claims against the configured issuer and client.
pub fn validate_claims(claims: &Claims, config: &AuthConfig, now: u64) -> Result<AuthContext, AuthError> {
    if claims.exp.is_some_and(|exp| exp <= now) {
        return Err(AuthError::Expired);
    }
    if !config.issuer.is_empty() && claims.iss.as_deref() != Some(config.issuer.as_str()) {
        return Err(AuthError::IssuerMismatch);
    }

    let token_use = match claims.token_use.as_deref() {
        Some("access") => TokenUse::Access,
        Some("id") => TokenUse::Id,
        other => return Err(AuthError::TokenUse(other.unwrap_or_default().to_string())),
    };

    if !config.client_id.is_empty() {
        let presented = match token_use {
            TokenUse::Access => claims.client_id.as_deref(),
            TokenUse::Id => claims.aud.as_deref(),
        };
        if presented != Some(config.client_id.as_str()) {
            return Err(AuthError::AudienceMismatch);
        }
    }

    let subject = claims
        .sub
        .clone()
        .filter(|sub| !sub.is_empty())
        .ok_or(AuthError::MissingSubject)?;

    Ok(AuthContext {
        subject,
        token_use,
        client_id: claims.client_id.clone(),
    })
}

/// Verify and validate an optional bearer token.
pub fn authenticate(
    verifier: &dyn TokenVerifier,
    config: &AuthConfig,
    token: Option<&str>,
    now: u64,
) -> Result<AuthContext, AuthError> {
    let token = token
        .map(|t| t.strip_prefix("Bearer ").unwrap_or(t))
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;
    let claims = verifier.verify(token)?;
    validate_claims(&claims, config, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    use jsonwebtoken::{EncodingKey, Header};

    const JWKS: &str = include_str!("../testdata/jwks.json");
    const SIGNING_KEY: &[u8] = include_bytes!("../testdata/signing-key.pem");

    fn config(client_id: &str) -> AuthConfig {
        AuthConfig {
            issuer: "https://idp.example".to_string(),
            client_id: client_id.to_string(),
            ..AuthConfig::default()
        }
    }

    fn sign(kid: Option<&str>, claims: &Claims) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = kid.map(str::to_string);
        let key = EncodingKey::from_rsa_pem(SIGNING_KEY).expect("signing key");
        jsonwebtoken::encode(&header, claims, &key).expect("sign")
    }

    fn claims(token_use: &str) -> Claims {
        Claims {
            sub: Some("alice".to_string()),
            token_use: Some(token_use.to_string()),
            client_id: Some("mobile".to_string()),
            aud: Some("mobile".to_string()),
            iss: Some("https://idp.example".to_string()),
            exp: Some(2000),
        }
    }

    #[test]
    fn test_access_and_id_tokens() {
        let ctx = validate_claims(&claims("access"), &config("mobile"), 1000).expect("access");
        assert_eq!(ctx.subject, "alice");
        assert_eq!(ctx.token_use, TokenUse::Access);

        let ctx = validate_claims(&claims("id"), &config("mobile"), 1000).expect("id");
        assert_eq!(ctx.token_use, TokenUse::Id);
    }

    #[test]
    fn test_rejections() {
        let cfg = config("mobile");
        assert!(matches!(
            validate_claims(&claims("access"), &cfg, 2000),
            Err(AuthError::Expired)
        ));
        assert!(matches!(
            validate_claims(&claims("refresh"), &cfg, 1000),
            Err(AuthError::TokenUse(_))
        ));
        assert!(matches!(
            validate_claims(&claims("access"), &config("web"), 1000),
            Err(AuthError::AudienceMismatch)
        ));

        let wrong_issuer = Claims {
            iss: Some("https://evil.example".to_string()),
            ..claims("access")
        };
        assert!(matches!(
            validate_claims(&wrong_issuer, &cfg, 1000),
            Err(AuthError::IssuerMismatch)
        ));

        let no_sub = Claims {
            sub: None,
            ..claims("access")
        };
        assert!(matches!(
            validate_claims(&no_sub, &cfg, 1000),
            Err(AuthError::MissingSubject)
        ));
    }

    #[test]
    fn test_client_check_skipped_when_unconfigured() {
        let other_client = Claims {
            client_id: Some("someone-else".to_string()),
            ..claims("access")
        };
        assert!(validate_claims(&other_client, &config(""), 1000).is_ok());
    }

    #[test]
    fn test_static_verifier() {
        let mut cfg = config("mobile");
        cfg.tokens.push(crate::config::StaticToken {
            token: "dev-alice".to_string(),
            sub: "alice".to_string(),
            token_use: "access".to_string(),
            client_id: None,
            exp: None,
        });
        let verifier = StaticTokenVerifier::from_config(&cfg);

        let ctx = authenticate(&verifier, &cfg, Some("Bearer dev-alice"), 1000).expect("auth");
        assert_eq!(ctx.subject, "alice");
        assert_eq!(ctx.client_id.as_deref(), Some("mobile"));

        assert!(matches!(
            authenticate(&verifier, &cfg, Some("nope"), 1000),
            Err(AuthError::UnknownToken)
        ));
        assert!(matches!(
            authenticate(&verifier, &cfg, None, 1000),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_jwks_verifier() {
        let verifier = JwksTokenVerifier::from_json(JWKS).expect("jwks");
        let cfg = config("mobile");

        let token = sign(Some("test-key-1"), &claims("access"));
        assert_eq!(verifier.verify(&token).expect("verify"), claims("access"));
        let header = format!("Bearer {token}");
        let ctx = authenticate(&verifier, &cfg, Some(header.as_str()), 1000).expect("auth");
        assert_eq!(ctx.subject, "alice");

        // Signature still checked, expiry left to validate_claims.
        assert!(matches!(
            authenticate(&verifier, &cfg, Some(token.as_str()), 2000),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_jwks_verifier_rejections() {
        let verifier = JwksTokenVerifier::from_json(JWKS).expect("jwks");

        let other_kid = sign(Some("rotated-away"), &claims("access"));
        assert!(matches!(verifier.verify(&other_kid), Err(AuthError::UnknownKey)));
        let no_kid = sign(None, &claims("access"));
        assert!(matches!(verifier.verify(&no_kid), Err(AuthError::UnknownKey)));
        assert!(matches!(verifier.verify("not-a-jwt"), Err(AuthError::UnknownToken)));

        // Payload of one signed token spliced onto another's signature.
        let genuine = sign(Some("test-key-1"), &claims("access"));
        let mallory = Claims {
            sub: Some("mallory".to_string()),
            ..claims("access")
        };
        let forged_payload = sign(Some("test-key-1"), &mallory);
        let parts: Vec<&str> = genuine.split('.').collect();
        let forged_parts: Vec<&str> = forged_payload.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);
        assert!(matches!(verifier.verify(&spliced), Err(AuthError::InvalidSignature(_))));
    }

    #[test]
    fn test_verifier_from_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("jwks.json");
        std::fs::write(&path, JWKS).expect("write jwks");

        let mut cfg = config("mobile");
        cfg.verifier = "jwks".to_string();
        cfg.jwks_path = path.display().to_string();
        let verifier = verifier_from_config(&cfg).expect("jwks verifier");
        let token = sign(Some("test-key-1"), &claims("access"));
        assert!(authenticate(verifier.as_ref(), &cfg, Some(token.as_str()), 1000).is_ok());

        cfg.jwks_path.clear();
        assert!(verifier_from_config(&cfg).is_err());
        cfg.verifier = "ldap".to_string();
        assert!(verifier_from_config(&cfg).is_err());

        let verifier = verifier_from_config(&config("mobile")).expect("static verifier");
        assert!(matches!(verifier.verify("anything"), Err(AuthError::UnknownToken)));
    }
}
