use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_private_key: String, // Ed25519 private key (PEM)
    pub jwt_public_key: String,  // Ed25519 public key (PEM)
    pub auth_issuer: String,
    pub rate_limit_per_minute: u32,
    pub admin_rate_limit_per_minute: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_private_key: env::var("JWT_PRIVATE_KEY").expect("JWT_PRIVATE_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.workspace-system.local".to_string()),
            rate_limit_per_minute: env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("RATE_LIMIT_PER_MINUTE must be a number"),
            admin_rate_limit_per_minute: env::var("ADMIN_RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("ADMIN_RATE_LIMIT_PER_MINUTE must be a number"),
        }
    }
}
