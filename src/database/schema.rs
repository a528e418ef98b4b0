use serde::{Deserialize, Serialize};

pub type Uuid = i32;

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub name: String,
}

/// User representation without the password hash.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<User> for PublicUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.name,
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: f64,
    pub link: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
}

/// Tag or ingredient row joined through a recipe link table.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct LinkedAttribute {
    pub recipe_id: Uuid,
    pub id: Uuid,
    pub name: String,
}

/// List representation of a recipe; omits `description` and `image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: f64,
    pub link: Option<String>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

impl RecipeSummary {
    pub fn from_parts(recipe: Recipe, tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags,
            ingredients,
        }
    }
}

/// Detail representation of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: f64,
    pub link: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

impl RecipeDetail {
    pub fn from_parts(recipe: Recipe, tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            description: recipe.description,
            image: recipe.image,
            tags,
            ingredients,
        }
    }
}
