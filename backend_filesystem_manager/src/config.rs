// backend_filesystem_manager/src/config.rs
use rocket::figment::providers::{Env, Format, Serialized, Toml};
use rocket::figment::{Figment, Profile};
use rocket::serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Settings read from `Rocket.toml` next to Rocket's own.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(crate = "rocket::serde")]
pub struct ManagerConfig {
    /// Namespace name → root directory on disk. A configured table replaces
    /// the built-in `files`/`themes` mounts instead of extending them.
    #[serde(default = "default_namespaces", skip_serializing_if = "BTreeMap::is_empty")]
    pub namespaces: BTreeMap<String, PathBuf>,
    /// Namespace used by `/browse` without arguments and by autocomplete.
    pub default_namespace: String,
    /// JSON file with content types and records for the record browser.
    pub content_path: Option<PathBuf>,
    pub admin_password: String,
    pub token_ttl_secs: u64,
    pub allowed_origins: Vec<String>,
}

fn default_namespaces() -> BTreeMap<String, PathBuf> {
    let mut namespaces = BTreeMap::new();
    namespaces.insert("files".to_string(), PathBuf::from("/public_site/files"));
    namespaces.insert("themes".to_string(), PathBuf::from("/public_site/themes"));
    namespaces
}

// `namespaces` stays empty so it is left out of the serialized defaults.
impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            namespaces: BTreeMap::new(),
            default_namespace: "files".to_string(),
            content_path: None,
            admin_password: String::new(),
            token_ttl_secs: 60 * 10,
            allowed_origins: vec![
                "http://127.0.0.1".to_string(),
                "http://localhost".to_string(),
            ],
        }
    }
}

impl ManagerConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

/// Rocket's default figment with our defaults underneath and the plain
/// `ADMIN_PASSWORD` environment variable on top.
pub fn figment() -> Figment {
    Figment::from(rocket::Config::default())
        .merge(Serialized::defaults(ManagerConfig::default()))
        .merge(Toml::file(Env::var_or("ROCKET_CONFIG", "Rocket.toml")).nested())
        .merge(Env::prefixed("ROCKET_").ignore(&["PROFILE"]).global())
        .merge(Env::raw().only(&["ADMIN_PASSWORD"]).global())
        .select(Profile::from_env_or("ROCKET_PROFILE", rocket::Config::DEFAULT_PROFILE))
}
