use crate::{
    authentication::{cryptography::verify_password, jwt::generate_jwt_session},
    error::{ApiError, QueryError, RequestError},
    schema::{PublicUser, User},
};

use sqlx::{Pool, Postgres};

pub async fn get_user(pool: &Pool<Postgres>, email: &str) -> Result<Option<User>, ApiError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&*pool)
        .await
        .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}

pub async fn get_user_by_id(
    pool: &Pool<Postgres>,
    user_id: i32,
) -> Result<Option<User>, ApiError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&*pool)
        .await
        .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}

/// Creates a user with email and password, which is the hashed version of
/// their password. Returns `None` when the email is already taken.
pub async fn register_user(
    email: &str,
    name: &str,
    password: &str,
    pool: &Pool<Postgres>,
) -> Result<Option<PublicUser>, ApiError> {
    let row: Option<PublicUser> = sqlx::query_as(
        "
        INSERT INTO users (email, name, password)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING RETURNING id, email, name;
    ",
    )
    .bind(email)
    .bind(name)
    .bind(password)
    .fetch_optional(&*pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}

pub async fn login_user(
    email: &str,
    password: &str,
    secret: &str,
    pool: &Pool<Postgres>,
) -> Result<String, ApiError> {
    let user = get_user(pool, email).await?;
    if user.is_none() {
        return Err(RequestError::InvalidRequest.new("Invalid credentials"));
    }

    let user = user.unwrap();
    let authenticated = verify_password(password, &user.password).unwrap_or(false);
    if !authenticated {
        return Err(RequestError::InvalidRequest.new("Invalid credentials"));
    }

    let session = generate_jwt_session(&user, secret);

    Ok(session)
}

/// Updates the name and/or password hash of a user. Absent fields keep their
/// current value.
pub async fn update_user(
    user_id: i32,
    name: Option<String>,
    password: Option<String>,
    pool: &Pool<Postgres>,
) -> Result<Option<PublicUser>, ApiError> {
    let row: Option<PublicUser> = sqlx::query_as(
        "
        UPDATE users SET name = COALESCE($2, name), password = COALESCE($3, password)
        WHERE id = $1
        RETURNING id, email, name;
    ",
    )
    .bind(user_id)
    .bind(name)
    .bind(password)
    .fetch_optional(&*pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}
