use crate::{
    error::{ApiError, QueryError},
    payload::{NewRecipe, RecipeUpdate},
    schema::Recipe,
};

use sqlx::{Pool, Postgres};

/// Lists a user's recipes, newest id first. Optional tag/ingredient id lists
/// restrict the result to recipes linked to any of the given rows.
pub async fn fetch_recipes(
    user_id: i32,
    tag_ids: Option<Vec<i32>>,
    ingredient_ids: Option<Vec<i32>>,
    pool: &Pool<Postgres>,
) -> Result<Vec<Recipe>, ApiError> {
    let rows: Vec<Recipe> = match (tag_ids, ingredient_ids) {
        (Some(tag_ids), Some(ingredient_ids)) => {
            sqlx::query_as(
                "
                SELECT DISTINCT r.* FROM recipes r
                INNER JOIN recipe_tags mt ON mt.recipe_id = r.id AND mt.tag_id = ANY($2)
                INNER JOIN recipe_ingredients mi ON mi.recipe_id = r.id AND mi.ingredient_id = ANY($3)
                WHERE r.author_id = $1
                ORDER BY r.id DESC
            ",
            )
            .bind(user_id)
            .bind(tag_ids)
            .bind(ingredient_ids)
            .fetch_all(&*pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?
        }
        (Some(tag_ids), None) => {
            sqlx::query_as(
                "
                SELECT DISTINCT r.* FROM recipes r
                INNER JOIN recipe_tags mt ON mt.recipe_id = r.id AND mt.tag_id = ANY($2)
                WHERE r.author_id = $1
                ORDER BY r.id DESC
            ",
            )
            .bind(user_id)
            .bind(tag_ids)
            .fetch_all(&*pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?
        }
        (None, Some(ingredient_ids)) => {
            sqlx::query_as(
                "
                SELECT DISTINCT r.* FROM recipes r
                INNER JOIN recipe_ingredients mi ON mi.recipe_id = r.id AND mi.ingredient_id = ANY($2)
                WHERE r.author_id = $1
                ORDER BY r.id DESC
            ",
            )
            .bind(user_id)
            .bind(ingredient_ids)
            .fetch_all(&*pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?
        }
        (None, None) => {
            sqlx::query_as("SELECT * FROM recipes WHERE author_id = $1 ORDER BY id DESC")
                .bind(user_id)
                .fetch_all(&*pool)
                .await
                .map_err(|e| -> ApiError { QueryError::from(e).into() })?
        }
    };

    Ok(rows)
}

/// Fetches a recipe by id, filtered on the owning user. Foreign rows behave
/// as missing.
pub async fn get_recipe(
    id: i32,
    user_id: i32,
    pool: &Pool<Postgres>,
) -> Result<Option<Recipe>, ApiError> {
    let row: Option<Recipe> =
        sqlx::query_as("SELECT * FROM recipes WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&*pool)
            .await
            .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}

pub async fn create_recipe(
    user_id: i32,
    payload: &NewRecipe,
    pool: &Pool<Postgres>,
) -> Result<Recipe, ApiError> {
    let row: Recipe = sqlx::query_as(
        "
        INSERT INTO recipes (author_id, title, time_minutes, price, link, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
    ",
    )
    .bind(user_id)
    .bind(&payload.title)
    .bind(payload.time_minutes)
    .bind(payload.price)
    .bind(&payload.link)
    .bind(&payload.description)
    .fetch_one(&*pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}

/// Updates the scalar fields of a recipe; absent fields keep their current
/// value. Returns `None` for recipes the user does not own.
pub async fn update_recipe(
    id: i32,
    user_id: i32,
    payload: &RecipeUpdate,
    pool: &Pool<Postgres>,
) -> Result<Option<Recipe>, ApiError> {
    let row: Option<Recipe> = sqlx::query_as(
        "
        UPDATE recipes SET
        title = COALESCE($3, title),
        time_minutes = COALESCE($4, time_minutes),
        price = COALESCE($5, price),
        link = COALESCE($6, link),
        description = COALESCE($7, description)
        WHERE id = $1 AND author_id = $2
        RETURNING *
    ",
    )
    .bind(id)
    .bind(user_id)
    .bind(&payload.title)
    .bind(payload.time_minutes)
    .bind(payload.price)
    .bind(&payload.link)
    .bind(&payload.description)
    .fetch_optional(&*pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}

pub async fn delete_recipe(id: i32, user_id: i32, pool: &Pool<Postgres>) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND author_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&*pool)
        .await
        .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(result.rows_affected() > 0)
}

/// Records the stored media path of an uploaded recipe image.
pub async fn set_recipe_image(
    id: i32,
    user_id: i32,
    image: &str,
    pool: &Pool<Postgres>,
) -> Result<Option<Recipe>, ApiError> {
    let row: Option<Recipe> = sqlx::query_as(
        "UPDATE recipes SET image = $3 WHERE id = $1 AND author_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(image)
    .fetch_optional(&*pool)
    .await
    .map_err(|e| -> ApiError { QueryError::from(e).into() })?;

    Ok(row)
}
