use std::sync::Arc;

use ember_shared::clients::rabbitmq::RabbitMQClient;

pub mod config;
pub mod events;
pub mod filters;
pub mod matching;
pub mod models;
pub mod registration;
pub mod repo;
pub mod routes;
pub mod schema;

pub struct AppState {
    pub config: config::AppConfig,
    pub repos: repo::Repositories,
    pub sessions: registration::SessionStore,
    pub resolver: Arc<dyn registration::CityResolver>,
    pub rabbitmq: RabbitMQClient,
}
