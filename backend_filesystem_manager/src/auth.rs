// backend_filesystem_manager/src/auth.rs
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct Login {
    pub password: String,
}

#[derive(Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct TokenResponse {
    pub token: String,
}

/// Issued tokens and the moment they were handed out.
pub struct TokenStore {
    password: String,
    ttl: Duration,
    tokens: RwLock<HashMap<String, Instant>>,
}

impl TokenStore {
    pub fn new(password: impl Into<String>, ttl: Duration) -> Self {
        TokenStore {
            password: password.into(),
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Hand out a fresh token when `password` matches. An empty configured
    /// password never matches.
    pub fn issue(&self, password: &str) -> Option<String> {
        if self.password.is_empty() || password != self.password {
            return None;
        }
        let token = Uuid::new_v4().to_string();
        let mut map = self
            .tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.retain(|_, t0| t0.elapsed() <= self.ttl);
        map.insert(token.clone(), Instant::now());
        Some(token)
    }

    /// Check if a token is valid and hasn't expired
    pub fn validate(&self, token: &str) -> bool {
        let mut map = self
            .tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(&t0) = map.get(token) {
            if t0.elapsed() <= self.ttl {
                return true;
            }
            // Token expired
            map.remove(token);
        }
        false
    }
}

/// Login and return a token
/// ### Arguments
/// - `body`: JSON with the password
/// ### Returns
/// - `Json<TokenResponse>`
/// ### Examples
/// - `curl -i -X POST -H "Content-Type: application/json" -d '{"password":"secret123"}' http://localhost:8000/async/auth`
#[post("/", format = "json", data = "<body>")]
pub fn login(body: Json<Login>, store: &State<TokenStore>) -> Result<Json<TokenResponse>, Status> {
    match store.issue(&body.password) {
        Some(token) => {
            info!("🔑 issued admin token");
            Ok(Json(TokenResponse { token }))
        }
        None => {
            warn!("🚫 rejected login attempt");
            Err(Status::Unauthorized)
        }
    }
}

/// Guard to check if the request has a valid token
pub struct Admin;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Admin {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, ()> {
        let Some(store) = req.rocket().state::<TokenStore>() else {
            error!("❌ token store is not managed");
            return Outcome::Error((Status::InternalServerError, ()));
        };
        match req.headers().get_one("Authorization") {
            Some(t) if store.validate(t) => Outcome::Success(Admin),
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}
