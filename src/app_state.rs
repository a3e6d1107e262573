use crate::config::Config;
use crate::services::auth::AuthService;
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub auth: AuthService,
}
