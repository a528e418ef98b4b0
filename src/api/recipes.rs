use std::collections::HashMap;
use std::sync::Arc;

use bytes::BufMut;
use futures::TryStreamExt;
use sqlx::{Pool, Postgres};
use warp::multipart::{FormData, Part};
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

use crate::authentication::jwt::SessionData;
use crate::authentication::middleware::with_session;
use crate::config::Config;
use crate::constants::{ALLOWED_IMAGE_EXTENSIONS, MAX_IMAGE_BYTES, MEDIA_SUBDIR};
use crate::database::actions::{ingredients, recipes, tags};
use crate::database::error::{ApiError, RequestError};
use crate::database::payload::{params_to_ints, AttributeName, NewRecipe, RecipeUpdate};
use crate::database::schema::{Recipe, RecipeDetail, RecipeSummary};

use super::router::{with_config, with_pool};

pub fn routes(
    pool: Pool<Postgres>,
    config: Arc<Config>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let secret = config.jwt_secret.clone();

    let list = warp::path!("api" / "recipe" / "recipes")
        .and(warp::get())
        .and(with_session(secret.clone()))
        .and(warp::query::<HashMap<String, String>>())
        .and(with_pool(pool.clone()))
        .and_then(list_recipes);

    let create = warp::path!("api" / "recipe" / "recipes")
        .and(warp::post())
        .and(with_session(secret.clone()))
        .and(warp::body::json())
        .and(with_pool(pool.clone()))
        .and_then(create_recipe);

    let retrieve = warp::path!("api" / "recipe" / "recipes" / i32)
        .and(warp::get())
        .and(with_session(secret.clone()))
        .and(with_pool(pool.clone()))
        .and_then(retrieve_recipe);

    let update = warp::path!("api" / "recipe" / "recipes" / i32)
        .and(warp::put())
        .and(with_session(secret.clone()))
        .and(warp::body::json())
        .and(with_pool(pool.clone()))
        .and_then(full_update_recipe);

    let partial_update = warp::path!("api" / "recipe" / "recipes" / i32)
        .and(warp::patch())
        .and(with_session(secret.clone()))
        .and(warp::body::json())
        .and(with_pool(pool.clone()))
        .and_then(partial_update_recipe);

    let delete = warp::path!("api" / "recipe" / "recipes" / i32)
        .and(warp::delete())
        .and(with_session(secret.clone()))
        .and(with_pool(pool.clone()))
        .and_then(delete_recipe);

    let upload_image = warp::path!("api" / "recipe" / "recipes" / i32 / "upload-image")
        .and(warp::post())
        .and(with_session(secret))
        .and(warp::multipart::form().max_length(MAX_IMAGE_BYTES))
        .and(with_pool(pool))
        .and(with_config(config))
        .and_then(upload_image);

    list.or(create)
        .or(retrieve)
        .or(update)
        .or(partial_update)
        .or(delete)
        .or(upload_image)
}

async fn list_recipes(
    session: SessionData,
    params: HashMap<String, String>,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let tag_ids = match params.get("tags") {
        Some(value) => Some(params_to_ints(value)?),
        None => None,
    };
    let ingredient_ids = match params.get("ingredients") {
        Some(value) => Some(params_to_ints(value)?),
        None => None,
    };

    let rows = recipes::fetch_recipes(session.user_id, tag_ids, ingredient_ids, &pool).await?;
    let ids: Vec<i32> = rows.iter().map(|recipe| recipe.id).collect();

    let mut tag_map = tags::list_tags_for_recipes(&ids, &pool).await?;
    let mut ingredient_map = ingredients::list_ingredients_for_recipes(&ids, &pool).await?;

    let list: Vec<RecipeSummary> = rows
        .into_iter()
        .map(|recipe| {
            let id = recipe.id;
            RecipeSummary::from_parts(
                recipe,
                tag_map.remove(&id).unwrap_or_default(),
                ingredient_map.remove(&id).unwrap_or_default(),
            )
        })
        .collect();

    Ok(warp::reply::json(&list))
}

async fn create_recipe(
    session: SessionData,
    payload: NewRecipe,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    payload.validate()?;

    let recipe = recipes::create_recipe(session.user_id, &payload, &pool).await?;

    if let Some(attributes) = &payload.tags {
        let names = attribute_names(attributes);
        tags::set_recipe_tags(recipe.id, session.user_id, &names, &pool).await?;
    }
    if let Some(attributes) = &payload.ingredients {
        let names = attribute_names(attributes);
        ingredients::set_recipe_ingredients(recipe.id, session.user_id, &names, &pool).await?;
    }

    let detail = load_detail(recipe, &pool).await?;

    Ok(warp::reply::with_status(
        warp::reply::json(&detail),
        StatusCode::CREATED,
    ))
}

async fn retrieve_recipe(
    id: i32,
    session: SessionData,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let recipe = recipes::get_recipe(id, session.user_id, &pool)
        .await?
        .ok_or(RequestError::NotFound.new("No recipe exists with specified id"))?;

    let detail = load_detail(recipe, &pool).await?;

    Ok(warp::reply::json(&detail))
}

async fn full_update_recipe(
    id: i32,
    session: SessionData,
    payload: RecipeUpdate,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    payload.require_complete()?;

    apply_update(id, session, payload, pool).await
}

async fn partial_update_recipe(
    id: i32,
    session: SessionData,
    payload: RecipeUpdate,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    apply_update(id, session, payload, pool).await
}

async fn apply_update(
    id: i32,
    session: SessionData,
    payload: RecipeUpdate,
    pool: Pool<Postgres>,
) -> Result<warp::reply::Json, Rejection> {
    payload.validate()?;

    let recipe = recipes::update_recipe(id, session.user_id, &payload, &pool)
        .await?
        .ok_or(RequestError::NotFound.new("No recipe exists with specified id"))?;

    if let Some(attributes) = &payload.tags {
        let names = attribute_names(attributes);
        tags::set_recipe_tags(recipe.id, session.user_id, &names, &pool).await?;
    }
    if let Some(attributes) = &payload.ingredients {
        let names = attribute_names(attributes);
        ingredients::set_recipe_ingredients(recipe.id, session.user_id, &names, &pool).await?;
    }

    let detail = load_detail(recipe, &pool).await?;

    Ok(warp::reply::json(&detail))
}

async fn delete_recipe(
    id: i32,
    session: SessionData,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let deleted = recipes::delete_recipe(id, session.user_id, &pool).await?;
    if !deleted {
        return Err(RequestError::NotFound
            .new("No recipe exists with specified id")
            .into());
    }

    Ok(warp::reply::with_status(
        warp::reply(),
        StatusCode::NO_CONTENT,
    ))
}

async fn upload_image(
    id: i32,
    session: SessionData,
    form: FormData,
    pool: Pool<Postgres>,
    config: Arc<Config>,
) -> Result<impl Reply, Rejection> {
    recipes::get_recipe(id, session.user_id, &pool)
        .await?
        .ok_or(RequestError::NotFound.new("No recipe exists with specified id"))?;

    let (extension, data) = read_image_part(form).await?;

    let file_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);
    let directory = config.media_root.join(MEDIA_SUBDIR);

    tokio::fs::create_dir_all(&directory)
        .await
        .map_err(|_| RequestError::InternalServerError.new("Failed to store image"))?;
    tokio::fs::write(directory.join(&file_name), &data)
        .await
        .map_err(|_| RequestError::InternalServerError.new("Failed to store image"))?;

    let image = format!("{MEDIA_SUBDIR}/{file_name}");
    let recipe = recipes::set_recipe_image(id, session.user_id, &image, &pool)
        .await?
        .ok_or(RequestError::NotFound.new("No recipe exists with specified id"))?;

    Ok(warp::reply::json(&serde_json::json!({
        "id": recipe.id,
        "image": recipe.image,
    })))
}

/// Pulls the `image` part out of a multipart form and buffers its content.
async fn read_image_part(form: FormData) -> Result<(String, Vec<u8>), ApiError> {
    let parts: Vec<Part> = form
        .try_collect()
        .await
        .map_err(|_| RequestError::InvalidRequest.new("Malformed multipart body"))?;

    for part in parts {
        if part.name() != "image" {
            continue;
        }

        let extension = part
            .filename()
            .and_then(image_extension)
            .ok_or_else(|| RequestError::InvalidRequest.new("Unsupported image type"))?;

        let data = part
            .stream()
            .try_fold(Vec::new(), |mut acc, buf| async move {
                acc.put(buf);
                Ok(acc)
            })
            .await
            .map_err(|_| RequestError::InvalidRequest.new("Failed to read upload"))?;

        return Ok((extension, data));
    }

    Err(RequestError::InvalidRequest.new("No image was submitted"))
}

fn image_extension(filename: &str) -> Option<String> {
    let (_, extension) = filename.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();

    ALLOWED_IMAGE_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

fn attribute_names(attributes: &[AttributeName]) -> Vec<String> {
    attributes
        .iter()
        .map(|attribute| attribute.name.clone())
        .collect()
}

async fn load_detail(recipe: Recipe, pool: &Pool<Postgres>) -> Result<RecipeDetail, ApiError> {
    let tag_rows = tags::list_recipe_tags(recipe.id, pool).await?;
    let ingredient_rows = ingredients::list_recipe_ingredients(recipe.id, pool).await?;

    Ok(RecipeDetail::from_parts(recipe, tag_rows, ingredient_rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_image_extensions() {
        assert_eq!(image_extension("photo.jpg"), Some("jpg".to_string()));
        assert_eq!(image_extension("photo.JPEG"), Some("jpeg".to_string()));
        assert_eq!(image_extension("photo.png"), Some("png".to_string()));
    }

    #[test]
    fn rejects_other_extensions() {
        assert_eq!(image_extension("photo.gif"), None);
        assert_eq!(image_extension("photo"), None);
        assert_eq!(image_extension("photo.pdf"), None);
    }
}
