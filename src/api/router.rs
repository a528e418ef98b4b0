use std::convert::Infallible;
use std::sync::Arc;

use sqlx::{Pool, Postgres};
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

use crate::config::Config;
use crate::database::error::ApiError;

/// Composes every resource route into the full API surface.
pub fn routes(
    pool: Pool<Postgres>,
    config: Arc<Config>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    super::users::routes(pool.clone(), config.clone())
        .or(super::recipes::routes(pool.clone(), config.clone()))
        .or(super::tags::routes(pool.clone(), config.clone()))
        .or(super::ingredients::routes(pool, config))
}

pub fn with_pool(
    pool: Pool<Postgres>,
) -> impl Filter<Extract = (Pool<Postgres>,), Error = Infallible> + Clone {
    warp::any().map(move || pool.clone())
}

pub fn with_config(
    config: Arc<Config>,
) -> impl Filter<Extract = (Arc<Config>,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}

/// Renders rejections as `{"detail": ...}` JSON with the matching status.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, detail) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<ApiError>() {
        let code = StatusCode::from_u16(e.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let detail = e.info.clone().unwrap_or_else(|| "Request failed".to_string());
        (code, detail)
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Payload too large".to_string(),
        )
    } else {
        log::error!("Unhandled rejection: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    let body = warp::reply::json(&serde_json::json!({ "detail": detail }));
    Ok(warp::reply::with_status(body, code))
}
