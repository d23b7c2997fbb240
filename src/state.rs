use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    auth::{password::PasswordService, JwtKeys},
    config::AppConfig,
    users::UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub jwt: JwtKeys,
    pub passwords: PasswordService,
}

impl AppState {
    pub fn from_parts(config: &AppConfig, users: Arc<dyn UserStore>) -> anyhow::Result<Self> {
        Ok(Self {
            users,
            jwt: JwtKeys::new(&config.jwt),
            passwords: PasswordService::new(&config.password)?,
        })
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
