use std::collections::HashMap;

use crate::{
    error::{ApiError, QueryError},
    schema::{LinkedAttribute, Tag, Uuid},
};

use sqlx::{Pool, Postgres};

/// Lists the tags owned by a user, newest name first. With `assigned_only`
/// set, only tags linked to at least one recipe are returned.
pub async fn list_tags(
    user_id: i32,
    assigned_only: bool,
    pool: &Pool<Postgres>,
) -> Result<Vec<Tag>, ApiError> {
    let list: Vec<Tag> = match assigned_only {
        true => {
            sqlx::query_as(
                "
                SELECT DISTINCT t.id, t.name FROM tags t
                INNER JOIN recipe_tags m ON m.tag_id = t.id
                WHERE t.author_id = $1
                ORDER BY t.name DESC
            ",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?
        }
        false => {
            sqlx::query_as("SELECT id, name FROM tags WHERE author_id = $1 ORDER BY name DESC")
                .bind(user_id)
                .fetch_all(pool)
                .await
                .map_err(|e| -> ApiError { QueryError::from(e).into() })?
        }
    };

    Ok(list)
}

/// Fetches a tag by name for a user, creating it first when absent.
pub async fn find_or_create_tag(
    user_id: i32,
    name: &str,
    pool: &Pool<Postgres>,
) -> Result<Tag, ApiError> {
    let existing: Option<Tag> =
        sqlx::query_as("SELECT id, name FROM tags WHERE author_id = $1 AND name = $2")
            .bind(user_id)
            .bind(name)
            .fetch_optional(pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    if let Some(tag) = existing {
        return Ok(tag);
    }

    let tag: Tag =
        sqlx::query_as("INSERT INTO tags (author_id, name) VALUES ($1, $2) RETURNING id, name")
            .bind(user_id)
            .bind(name)
            .fetch_one(pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(tag)
}

/// Renames a tag. Returns `None` for tags the user does not own.
pub async fn update_tag(
    id: i32,
    user_id: i32,
    name: &str,
    pool: &Pool<Postgres>,
) -> Result<Option<Tag>, ApiError> {
    let row: Option<Tag> = sqlx::query_as(
        "UPDATE tags SET name = $3 WHERE id = $1 AND author_id = $2 RETURNING id, name",
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}

pub async fn delete_tag(id: i32, user_id: i32, pool: &Pool<Postgres>) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND author_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_recipe_tags(recipe_id: i32, pool: &Pool<Postgres>) -> Result<Vec<Tag>, ApiError> {
    let list: Vec<Tag> = sqlx::query_as(
        "
        SELECT t.id, t.name FROM recipe_tags m
        INNER JOIN tags t ON t.id = m.tag_id
        WHERE m.recipe_id = $1
        ORDER BY t.id
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(list)
}

/// Tags of several recipes at once, grouped by recipe id.
pub async fn list_tags_for_recipes(
    recipe_ids: &[i32],
    pool: &Pool<Postgres>,
) -> Result<HashMap<Uuid, Vec<Tag>>, ApiError> {
    let rows: Vec<LinkedAttribute> = sqlx::query_as(
        "
        SELECT m.recipe_id AS recipe_id, t.id AS id, t.name AS name FROM recipe_tags m
        INNER JOIN tags t ON t.id = m.tag_id
        WHERE m.recipe_id = ANY($1)
        ORDER BY t.id
    ",
    )
    .bind(recipe_ids)
    .fetch_all(pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    let mut hashmap: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    rows.into_iter().for_each(|row| {
        hashmap.entry(row.recipe_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
        });
    });

    Ok(hashmap)
}

/// Replaces the tag links of a recipe with the given names, get-or-creating
/// each tag for the owning user.
pub async fn set_recipe_tags(
    recipe_id: i32,
    user_id: i32,
    names: &[String],
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(pool)
        .await
        .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    for name in names {
        let tag = find_or_create_tag(user_id, name, pool).await?;

        sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(recipe_id)
        .bind(tag.id)
        .execute(pool)
        .await
        .map_err(|e| -> ApiError { QueryError::from(e).into() })?;
    }

    Ok(())
}
