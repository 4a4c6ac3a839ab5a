use std::path::PathBuf;

use mediahub_core::asset::MAX_ASSET_BYTES;

use crate::auth::jwt::JwtConfig;

/// Multipart framing allowance on top of the largest accepted asset.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory uploaded assets are written under (default: `storage`).
    pub storage_root: PathBuf,
    /// URL prefix the stored objects are served from (default: `/files`).
    pub storage_public_base_url: String,
    /// Request body limit in bytes, sized for asset uploads.
    pub max_upload_bytes: usize,
    /// JWT validation configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `STORAGE_ROOT`            | `storage`                  |
    /// | `STORAGE_PUBLIC_BASE_URL` | `/files`                   |
    /// | `MAX_UPLOAD_BYTES`        | 100 MiB plus 1 MiB framing |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let storage_root =
            PathBuf::from(std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".into()));

        let storage_public_base_url = std::env::var("STORAGE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "/files".into())
            .trim_end_matches('/')
            .to_string();

        let max_upload_bytes: usize = match std::env::var("MAX_UPLOAD_BYTES") {
            Ok(v) => v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"),
            Err(_) => MAX_ASSET_BYTES + MULTIPART_OVERHEAD_BYTES,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage_root,
            storage_public_base_url,
            max_upload_bytes,
            jwt,
        }
    }
}
