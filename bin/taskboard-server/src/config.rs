//! Server configuration, loaded from environment variables at startup.

/// Origins the bundled front-ends are served from during development.
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Runtime configuration for taskboard-server.
///
/// Every field has a default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    pub bind_address: String,

    /// Origins allowed to make credentialed cross-origin requests.
    pub cors_allowed_origins: Vec<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// When `true`, 500 responses carry a `stack` field with the failure detail.
    pub development: bool,

    /// Load the sample tasks and projects at startup.
    pub seed_data: bool,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_docs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_owned(),
            cors_allowed_origins: split_origins(DEFAULT_CORS_ORIGINS),
            log_level: "info".to_owned(),
            log_json: false,
            development: false,
            seed_data: true,
            enable_docs: true,
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let bind_address = std::env::var("TASKBOARD_BIND")
            .ok()
            .or_else(|| std::env::var("PORT").ok().map(|port| format!("0.0.0.0:{port}")))
            .unwrap_or(defaults.bind_address);

        let development = env_flag("TASKBOARD_DEV", false)
            || std::env::var("NODE_ENV").is_ok_and(|v| v == "development");

        Self {
            bind_address,
            cors_allowed_origins: split_origins(&env_or("TASKBOARD_CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
            log_level: env_or("TASKBOARD_LOG", &defaults.log_level),
            log_json: env_flag("TASKBOARD_LOG_JSON", defaults.log_json),
            development,
            seed_data: env_flag("TASKBOARD_SEED", defaults.seed_data),
            enable_docs: env_flag("TASKBOARD_ENABLE_DOCS", defaults.enable_docs),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => v == "1" || v.eq_ignore_ascii_case("true"),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
