use axum_helpers::FirebaseConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use domain_pods::PodsConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub pods: PodsConfig,
    pub firebase: FirebaseConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let pods = PodsConfig::from_env()?; // Requires OPENAI_API_KEY
        let firebase = FirebaseConfig::from_env()?; // Requires FIREBASE_KEY_PATH

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            pods,
            firebase,
        })
    }
}
