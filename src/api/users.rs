use std::sync::Arc;

use sqlx::{Pool, Postgres};
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

use crate::authentication::cryptography::hash_password;
use crate::authentication::jwt::SessionData;
use crate::authentication::middleware::with_session;
use crate::config::Config;
use crate::database::actions::users;
use crate::database::error::RequestError;
use crate::database::payload::{Credentials, NewUser, UserUpdate};
use crate::database::schema::PublicUser;

use super::router::{with_config, with_pool};

pub fn routes(
    pool: Pool<Postgres>,
    config: Arc<Config>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let create = warp::path!("api" / "user" / "create")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_pool(pool.clone()))
        .and_then(create_user);

    let token = warp::path!("api" / "user" / "token")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_pool(pool.clone()))
        .and(with_config(config.clone()))
        .and_then(create_token);

    let retrieve_me = warp::path!("api" / "user" / "me")
        .and(warp::get())
        .and(with_session(config.jwt_secret.clone()))
        .and(with_pool(pool.clone()))
        .and_then(me);

    let update_me = warp::path!("api" / "user" / "me")
        .and(warp::patch())
        .and(with_session(config.jwt_secret.clone()))
        .and(warp::body::json())
        .and(with_pool(pool))
        .and_then(update_me);

    create.or(token).or(retrieve_me).or(update_me)
}

async fn create_user(payload: NewUser, pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    payload.validate()?;

    let password = hash_password(&payload.password)
        .map_err(|_| RequestError::InternalServerError.new("Failed to hash password"))?;
    let name = payload.name.unwrap_or_default();

    let user = users::register_user(&payload.email, &name, &password, &pool).await?;

    match user {
        Some(user) => Ok(warp::reply::with_status(
            warp::reply::json(&user),
            StatusCode::CREATED,
        )),
        None => Err(RequestError::InvalidRequest
            .new("A user with that email already exists")
            .into()),
    }
}

async fn create_token(
    payload: Credentials,
    pool: Pool<Postgres>,
    config: Arc<Config>,
) -> Result<impl Reply, Rejection> {
    let token = users::login_user(&payload.email, &payload.password, &config.jwt_secret, &pool)
        .await?;

    Ok(warp::reply::json(&serde_json::json!({ "token": token })))
}

async fn me(session: SessionData, pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let user = users::get_user_by_id(&pool, session.user_id)
        .await?
        .ok_or(RequestError::Unauthorized.new("User no longer exists"))?;

    Ok(warp::reply::json(&PublicUser::from(user)))
}

async fn update_me(
    session: SessionData,
    payload: UserUpdate,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    payload.validate()?;

    let password = match payload.password {
        Some(password) => Some(
            hash_password(&password)
                .map_err(|_| RequestError::InternalServerError.new("Failed to hash password"))?,
        ),
        None => None,
    };

    let user = users::update_user(session.user_id, payload.name, password, &pool)
        .await?
        .ok_or(RequestError::Unauthorized.new("User no longer exists"))?;

    Ok(warp::reply::json(&user))
}
