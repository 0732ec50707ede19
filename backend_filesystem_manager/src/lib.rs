// backend_filesystem_manager/src/lib.rs
#[macro_use]
extern crate rocket;

pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod vfs;

use rocket::fairing::{self, AdHoc};
use rocket::figment::Figment;
use rocket::http::Method;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedHeaders, AllowedOrigins, Cors, CorsOptions};

use crate::auth::TokenStore;
use crate::config::ManagerConfig;
use crate::content::{ContentStore, JsonContentStore};
use crate::vfs::MountManager;

/// Assemble the server from a configuration figment.
pub fn build(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(AdHoc::try_on_ignite("Filesystem manager", setup))
        .mount("/async/auth", routes![auth::login])
        .mount("/async", api::routes())
}

fn cors(config: &ManagerConfig) -> Result<Cors, rocket_cors::Error> {
    CorsOptions {
        allowed_origins: AllowedOrigins::some_exact(&config.allowed_origins),
        allowed_methods: vec![Method::Get, Method::Post, Method::Options]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: AllowedHeaders::some(&["Authorization", "Content-Type"]),
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()
}

async fn setup(rocket: Rocket<Build>) -> fairing::Result {
    let config: ManagerConfig = match rocket.figment().extract() {
        Ok(config) => config,
        Err(e) => {
            rocket::config::pretty_print_error(e);
            return Err(rocket);
        }
    };

    let mounts = match MountManager::mount_all(&config.namespaces, &config.default_namespace).await {
        Ok(mounts) => mounts,
        Err(e) => {
            error!("❌ failed to mount namespaces: {}", e);
            return Err(rocket);
        }
    };

    let content: Box<dyn ContentStore> = match &config.content_path {
        Some(path) => match JsonContentStore::load(path).await {
            Ok(store) => Box::new(store),
            Err(e) => {
                error!("❌ {}", e);
                return Err(rocket);
            }
        },
        None => {
            info!("📚 no content_path configured, record browser is empty");
            Box::new(JsonContentStore::empty())
        }
    };

    let cors = match cors(&config) {
        Ok(cors) => cors,
        Err(e) => {
            error!("❌ error configuring CORS: {}", e);
            return Err(rocket);
        }
    };

    if config.admin_password.is_empty() {
        warn!("⚠️ ADMIN_PASSWORD is not set, every login will be refused");
    }
    let tokens = TokenStore::new(config.admin_password.clone(), config.token_ttl());

    Ok(rocket
        .attach(cors)
        .manage(mounts)
        .manage(content)
        .manage(tokens))
}
