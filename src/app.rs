// Application state and configuration
use std::sync::Arc;

use crate::{
    app_config::AppConfig,
    db::DieselPool,
    services::{EmailService, ImageHost, JwtService, VideoHost},
};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub diesel_pool: DieselPool,
    pub jwt_service: Arc<JwtService>,
    pub email_service: Arc<EmailService>,
    pub image_host: Arc<dyn ImageHost>,
    pub video_host: Arc<dyn VideoHost>,
    pub max_connections: u32,
}
