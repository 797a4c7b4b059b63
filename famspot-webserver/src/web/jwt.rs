use anyhow::Result;
use jwt_service::JwtService;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user id
    sub: String,
    /// Expiry time as Unix timestamp
    exp: u64,
}

/// Validates the bearer tokens that are issued by the auth service.
pub struct JwtState {
    jwt_service: JwtService,
    time_valid: Duration,
}

impl JwtState {
    /// Tokens can only be validated if the secret is shared with
    /// the auth service. Without a secret a random one is generated.
    pub fn new(secret: Option<&str>) -> Self {
        let jwt_service = match secret {
            Some(secret) => JwtService::new(secret),
            None => {
                warn!("No JWT secret configured, using a random one");
                JwtService::random()
            }
        };
        Self {
            jwt_service,
            time_valid: Duration::days(1),
        }
    }

    pub fn generate_token(&self, user_id: &str) -> Result<String> {
        let exp = u64::try_from((OffsetDateTime::now_utc() + self.time_valid).unix_timestamp())?;
        let claims = Claims {
            sub: user_id.to_string(),
            exp,
        };
        self.jwt_service.encode(&claims)
    }

    pub fn validate_token_and_get_user_id(&self, token: &str) -> Result<String> {
        let claims = self.jwt_service.decode(token)?;
        Ok(claims.sub)
    }
}

#[cfg(feature = "jwt")]
mod jwt_service {
    use super::{Claims, Result};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

    /// 256-bit base64 encoded secret
    fn generate_secret() -> String {
        STANDARD.encode(rand::random::<[u8; 32]>())
    }

    pub struct JwtService {
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
    }

    impl JwtService {
        pub fn new(secret: &str) -> Self {
            Self {
                encoding_key: EncodingKey::from_secret(secret.as_bytes()),
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            }
        }

        pub fn random() -> Self {
            Self::new(&generate_secret())
        }

        pub fn encode(&self, claims: &Claims) -> Result<String> {
            let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?;
            Ok(token)
        }

        pub fn decode(&self, token: &str) -> Result<Claims> {
            let token_data = decode::<Claims>(
                token,
                &self.decoding_key,
                &Validation::new(Algorithm::HS256),
            )?;
            Ok(token_data.claims)
        }
    }
}

#[cfg(not(feature = "jwt"))]
mod jwt_service {
    use super::{Claims, Result};
    use anyhow::bail;

    pub struct JwtService;

    impl JwtService {
        pub fn new(_secret: &str) -> Self {
            Self
        }
        pub fn random() -> Self {
            Self
        }
        pub fn encode(&self, _claims: &Claims) -> Result<String> {
            bail!("JWT support is disabled")
        }
        pub fn decode(&self, _token: &str) -> Result<Claims> {
            bail!("JWT support is disabled")
        }
    }
}
