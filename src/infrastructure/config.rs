use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_REALTIME_URL: &str = "ws://localhost:3001/ws";
pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub api: ApiSettings,
    pub realtime: RealtimeSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    /// Ambient session cookie sent with every request, e.g. `session=abc`.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RealtimeSettings {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    #[serde(default)]
    pub credential: Option<String>,
    pub sign_in_path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionSettings {
    #[serde(default)]
    pub dashboard: Option<String>,
}

fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("api.base_url", DEFAULT_API_BASE_URL)?
        .set_default("realtime.url", DEFAULT_REALTIME_URL)?
        .set_default("auth.sign_in_path", DEFAULT_SIGN_IN_PATH)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("DASHBOARD")
        .prefix_separator("__")
        .separator("__")
}

/// Load `config/client.{toml,...}` (optional) overlaid with `DASHBOARD__*`
/// environment variables, falling back to local defaults.
pub fn load_client_config() -> anyhow::Result<ClientConfig> {
    load_layered(environment())
}

fn load_layered(env: config::Environment) -> anyhow::Result<ClientConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/client").required(false))
        .add_source(env)
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Same layering as [`load_client_config`] but from an in-memory TOML
/// document instead of the config directory.
pub fn load_client_config_from_str(toml: &str) -> anyhow::Result<ClientConfig> {
    let settings = builder()?
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(settings.try_deserialize()?)
}
