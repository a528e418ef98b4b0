use std::collections::HashMap;
use std::sync::Arc;

use sqlx::{Pool, Postgres};
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

use crate::authentication::jwt::SessionData;
use crate::authentication::middleware::with_session;
use crate::config::Config;
use crate::database::actions::ingredients;
use crate::database::error::RequestError;
use crate::database::payload::{parse_assigned_only, AttributeUpdate};

use super::router::with_pool;

pub fn routes(
    pool: Pool<Postgres>,
    config: Arc<Config>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let secret = config.jwt_secret.clone();

    let list = warp::path!("api" / "recipe" / "ingredients")
        .and(warp::get())
        .and(with_session(secret.clone()))
        .and(warp::query::<HashMap<String, String>>())
        .and(with_pool(pool.clone()))
        .and_then(list_ingredients);

    let update = warp::path!("api" / "recipe" / "ingredients" / i32)
        .and(warp::patch())
        .and(with_session(secret.clone()))
        .and(warp::body::json())
        .and(with_pool(pool.clone()))
        .and_then(update_ingredient);

    let delete = warp::path!("api" / "recipe" / "ingredients" / i32)
        .and(warp::delete())
        .and(with_session(secret))
        .and(with_pool(pool))
        .and_then(delete_ingredient);

    list.or(update).or(delete)
}

async fn list_ingredients(
    session: SessionData,
    params: HashMap<String, String>,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let assigned_only = parse_assigned_only(params.get("assigned_only"))?;

    let list = ingredients::list_ingredients(session.user_id, assigned_only, &pool).await?;

    Ok(warp::reply::json(&list))
}

async fn update_ingredient(
    id: i32,
    session: SessionData,
    payload: AttributeUpdate,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    payload.validate()?;

    let ingredient = ingredients::update_ingredient(id, session.user_id, &payload.name, &pool)
        .await?
        .ok_or(RequestError::NotFound.new("No ingredient exists with specified id"))?;

    Ok(warp::reply::json(&ingredient))
}

async fn delete_ingredient(
    id: i32,
    session: SessionData,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let deleted = ingredients::delete_ingredient(id, session.user_id, &pool).await?;
    if !deleted {
        return Err(RequestError::NotFound
            .new("No ingredient exists with specified id")
            .into());
    }

    Ok(warp::reply::with_status(
        warp::reply(),
        StatusCode::NO_CONTENT,
    ))
}
