use crate::config::Config;
use crate::domain::models::account::Account;
use crate::domain::models::auth::{TokenClaims, VerifiedIdentity};
use crate::domain::ports::IdentityProvider;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

const AUDIENCE: &str = "workspace-frontend";
const TOKEN_TTL_MINUTES: i64 = 60;

/// Local (fast-path) identity provider: issues and verifies Ed25519 JWTs.
/// Behind the `IdentityProvider` port this is interchangeable with a
/// remote verifier; callers only see a single-attempt async `verify`.
pub struct JwtIdentityProvider {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_private_key.as_bytes())
            .expect("Invalid JWT Private Key PEM");
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .expect("Invalid JWT Public Key PEM");

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(&[config.auth_issuer.as_str()]);

        Self {
            issuer: config.auth_issuer.clone(),
            encoding_key,
            decoding_key,
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Option<VerifiedIdentity>, AppError> {
        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(Some(VerifiedIdentity { account_id: data.claims.sub })),
            Err(_) => Ok(None),
        }
    }

    fn issue(&self, account: &Account) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = TokenClaims {
            iss: self.issuer.clone(),
            sub: account.id.clone(),
            aud: AUDIENCE.to_string(),
            exp: (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("JWT encoding failed: {}", e);
            AppError::Internal
        })
    }
}
