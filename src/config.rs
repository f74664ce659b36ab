use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Image storage strategy, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Write files under `dir`, serve them at `public_path`.
    Local { dir: String, public_path: String },
    /// Upload to an S3-compatible endpoint; references are public URLs built
    /// from `public_base`.
    S3 {
        endpoint: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        public_base: String,
    },
    /// Keep the bytes in the owning database row.
    Database,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    /// When true, user/product/ingredient routes require a valid Bearer token.
    /// The original deployment left them open; this stays a deployment choice.
    pub auth_required: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "catalog-api".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "catalog-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };

        let storage = match std::env::var("IMAGE_STORAGE").as_deref() {
            Ok("s3") => {
                let endpoint = std::env::var("S3_ENDPOINT")?;
                let bucket = std::env::var("S3_BUCKET")?;
                let public_base = std::env::var("S3_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));
                StorageConfig::S3 {
                    endpoint,
                    bucket,
                    access_key: std::env::var("S3_ACCESS_KEY")?,
                    secret_key: std::env::var("S3_SECRET_KEY")?,
                    public_base,
                }
            }
            Ok("database") => StorageConfig::Database,
            _ => StorageConfig::Local {
                dir: std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into()),
                public_path: std::env::var("UPLOADS_PUBLIC_PATH")
                    .unwrap_or_else(|_| "/uploads".into()),
            },
        };

        let auth_required = std::env::var("AUTH_REQUIRED")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt,
            storage,
            auth_required,
        })
    }
}
