use std::collections::HashMap;

use crate::{
    error::{ApiError, QueryError},
    schema::{Ingredient, LinkedAttribute, Uuid},
};

use sqlx::{Pool, Postgres};

/// Lists the ingredients owned by a user, newest name first. With
/// `assigned_only` set, only ingredients linked to at least one recipe are
/// returned.
pub async fn list_ingredients(
    user_id: i32,
    assigned_only: bool,
    pool: &Pool<Postgres>,
) -> Result<Vec<Ingredient>, ApiError> {
    let list: Vec<Ingredient> = match assigned_only {
        true => {
            sqlx::query_as(
                "
                SELECT DISTINCT i.id, i.name FROM ingredients i
                INNER JOIN recipe_ingredients m ON m.ingredient_id = i.id
                WHERE i.author_id = $1
                ORDER BY i.name DESC
            ",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?
        }
        false => {
            sqlx::query_as(
                "SELECT id, name FROM ingredients WHERE author_id = $1 ORDER BY name DESC",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?
        }
    };

    Ok(list)
}

/// Fetches an ingredient by name for a user, creating it first when absent.
pub async fn find_or_create_ingredient(
    user_id: i32,
    name: &str,
    pool: &Pool<Postgres>,
) -> Result<Ingredient, ApiError> {
    let existing: Option<Ingredient> =
        sqlx::query_as("SELECT id, name FROM ingredients WHERE author_id = $1 AND name = $2")
            .bind(user_id)
            .bind(name)
            .fetch_optional(pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    if let Some(ingredient) = existing {
        return Ok(ingredient);
    }

    let ingredient: Ingredient = sqlx::query_as(
        "INSERT INTO ingredients (author_id, name) VALUES ($1, $2) RETURNING id, name",
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(ingredient)
}

/// Renames an ingredient. Returns `None` for ingredients the user does not
/// own.
pub async fn update_ingredient(
    id: i32,
    user_id: i32,
    name: &str,
    pool: &Pool<Postgres>,
) -> Result<Option<Ingredient>, ApiError> {
    let row: Option<Ingredient> = sqlx::query_as(
        "UPDATE ingredients SET name = $3 WHERE id = $1 AND author_id = $2 RETURNING id, name",
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}

pub async fn delete_ingredient(
    id: i32,
    user_id: i32,
    pool: &Pool<Postgres>,
) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM ingredients WHERE id = $1 AND author_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_recipe_ingredients(
    recipe_id: i32,
    pool: &Pool<Postgres>,
) -> Result<Vec<Ingredient>, ApiError> {
    let list: Vec<Ingredient> = sqlx::query_as(
        "
        SELECT i.id, i.name FROM recipe_ingredients m
        INNER JOIN ingredients i ON i.id = m.ingredient_id
        WHERE m.recipe_id = $1
        ORDER BY i.id
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(list)
}

/// Ingredients of several recipes at once, grouped by recipe id.
pub async fn list_ingredients_for_recipes(
    recipe_ids: &[i32],
    pool: &Pool<Postgres>,
) -> Result<HashMap<Uuid, Vec<Ingredient>>, ApiError> {
    let rows: Vec<LinkedAttribute> = sqlx::query_as(
        "
        SELECT m.recipe_id AS recipe_id, i.id AS id, i.name AS name FROM recipe_ingredients m
        INNER JOIN ingredients i ON i.id = m.ingredient_id
        WHERE m.recipe_id = ANY($1)
        ORDER BY i.id
    ",
    )
    .bind(recipe_ids)
    .fetch_all(pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    let mut hashmap: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
    rows.into_iter().for_each(|row| {
        hashmap.entry(row.recipe_id).or_default().push(Ingredient {
            id: row.id,
            name: row.name,
        });
    });

    Ok(hashmap)
}

/// Replaces the ingredient links of a recipe with the given names,
/// get-or-creating each ingredient for the owning user.
pub async fn set_recipe_ingredients(
    recipe_id: i32,
    user_id: i32,
    names: &[String],
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(pool)
        .await
        .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    for name in names {
        let ingredient = find_or_create_ingredient(user_id, name, pool).await?;

        sqlx::query(
            "
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id)
            VALUES ($1, $2) ON CONFLICT DO NOTHING
        ",
        )
        .bind(recipe_id)
        .bind(ingredient.id)
        .execute(pool)
        .await
        .map_err(|e| -> ApiError { QueryError::from(e).into() })?;
    }

    Ok(())
}
