use anyhow::{Context, Error};

const COUNT_PATH: &str = "/api/count";
const DEFAULT_SITE_TITLE: &str = "Visit Counter";

/// Process wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub site_origin: Option<String>,
    pub site_title: String,
    pub port: u16,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        let production = std::env::var("PRODUCTION").is_ok();

        let port = std::env::var("PORT")
            .context("missing env variable PORT")?
            .parse::<u16>()
            .context("env variable PORT is not a valid port number")?;

        Ok(Config {
            api_base_url: non_empty_var("PUBLIC_API_URL"),
            site_origin: non_empty_var("SITE_ORIGIN"),
            site_title: non_empty_var("SITE_TITLE")
                .unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
            port,
            production,
        })
    }

    /// Endpoint the counter widget fetches from.
    ///
    /// Falls back to the site origin when no api base url is set, and to the
    /// bare relative path when neither is known.
    pub fn count_endpoint(&self) -> String {
        match (self.api_base_url.as_deref(), self.site_origin.as_deref()) {
            (Some(base), _) | (None, Some(base)) => {
                format!("{}{}", base.trim_end_matches('/'), COUNT_PATH)
            }
            (None, None) => COUNT_PATH.to_string(),
        }
    }
}

/// Env file for the deployment target named by `APP_ENV`.
pub fn env_file(app_env: Option<&str>) -> &'static str {
    match app_env {
        Some("docker") => ".env.docker",
        Some("k8s") => ".env.k8s",
        _ => ".env",
    }
}

/// Loads the env file of the current deployment target, returning its name.
/// A missing file leaves the environment untouched.
pub fn load_env_file() -> Option<&'static str> {
    let file = env_file(std::env::var("APP_ENV").ok().as_deref());
    dotenv::from_filename(file).ok().map(|_| file)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
