mod database {
    pub mod actions;
    pub mod error;
    pub mod payload;
    pub mod schema;
}
mod authentication {
    pub mod cryptography;
    pub mod jwt;
    pub mod middleware;
}
mod api {
    pub mod ingredients;
    pub mod recipes;
    pub mod router;
    pub mod tags;
    pub mod users;
}
mod config;
mod constants;

pub use api::router::*;
pub use api::*;
pub use authentication::*;
pub use config::*;
pub use constants::*;
pub use database::*;
