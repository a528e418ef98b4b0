use serde::Deserialize;

use crate::constants::MIN_PASSWORD_LENGTH;

use super::error::TypeError;

/// Tag/ingredient reference inside a recipe payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeName {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i32,
    pub price: f64,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<AttributeName>>,
    #[serde(default)]
    pub ingredients: Option<Vec<AttributeName>>,
}

impl NewRecipe {
    pub fn validate(&self) -> Result<(), TypeError> {
        validate_title(&self.title)?;
        validate_time_minutes(self.time_minutes)?;
        validate_price(self.price)?;
        validate_attribute_names(self.tags.as_deref())?;
        validate_attribute_names(self.ingredients.as_deref())?;
        Ok(())
    }
}

/// Payload for PUT and PATCH on a recipe. PUT additionally requires the
/// mandatory fields through [`RecipeUpdate::require_complete`].
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time_minutes: Option<i32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<AttributeName>>,
    #[serde(default)]
    pub ingredients: Option<Vec<AttributeName>>,
}

impl RecipeUpdate {
    pub fn validate(&self) -> Result<(), TypeError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(time_minutes) = self.time_minutes {
            validate_time_minutes(time_minutes)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        validate_attribute_names(self.tags.as_deref())?;
        validate_attribute_names(self.ingredients.as_deref())?;
        Ok(())
    }

    pub fn require_complete(&self) -> Result<(), TypeError> {
        if self.title.is_none() || self.time_minutes.is_none() || self.price.is_none() {
            return Err(TypeError::new(
                "Fields title, time_minutes and price are required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeUpdate {
    pub name: String,
}

impl AttributeUpdate {
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.trim().is_empty() {
            return Err(TypeError::new("Name may not be blank"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), TypeError> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), TypeError> {
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), TypeError> {
    if title.trim().is_empty() {
        return Err(TypeError::new("Title may not be blank"));
    }
    Ok(())
}

fn validate_time_minutes(time_minutes: i32) -> Result<(), TypeError> {
    if time_minutes < 1 {
        return Err(TypeError::new("Time estimate must be at least one minute"));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), TypeError> {
    if !price.is_finite() || price < 0.0 {
        return Err(TypeError::new("Price may not be negative"));
    }
    Ok(())
}

fn validate_attribute_names(names: Option<&[AttributeName]>) -> Result<(), TypeError> {
    for attribute in names.unwrap_or_default() {
        if attribute.name.trim().is_empty() {
            return Err(TypeError::new("Name may not be blank"));
        }
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), TypeError> {
    let (local, domain) = email.split_once('@').unwrap_or_default();
    if local.is_empty() || domain.is_empty() {
        return Err(TypeError::new("Enter a valid email address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), TypeError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(TypeError::new("Password is too short"));
    }
    Ok(())
}

/// Parses a comma separated id list query parameter.
pub fn params_to_ints(value: &str) -> Result<Vec<i32>, TypeError> {
    value
        .split(',')
        .map(|id| {
            id.trim()
                .parse::<i32>()
                .map_err(|_| TypeError::new("Invalid id list"))
        })
        .collect()
}

/// Parses the `assigned_only` query parameter; absent means false.
pub fn parse_assigned_only(value: Option<&String>) -> Result<bool, TypeError> {
    match value {
        Some(value) => value
            .parse::<i32>()
            .map(|flag| flag != 0)
            .map_err(|_| TypeError::new("Invalid assigned_only value")),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_recipe() -> NewRecipe {
        NewRecipe {
            title: "Sample recipe".to_string(),
            time_minutes: 30,
            price: 5.99,
            link: None,
            description: None,
            tags: None,
            ingredients: None,
        }
    }

    #[test]
    fn new_recipe_accepts_valid_payload() {
        assert!(new_recipe().validate().is_ok());
    }

    #[test]
    fn new_recipe_rejects_blank_title() {
        let mut payload = new_recipe();
        payload.title = "   ".to_string();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn new_recipe_rejects_zero_time() {
        let mut payload = new_recipe();
        payload.time_minutes = 0;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn new_recipe_rejects_negative_price() {
        let mut payload = new_recipe();
        payload.price = -1.0;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn new_recipe_rejects_blank_tag_name() {
        let mut payload = new_recipe();
        payload.tags = Some(vec![AttributeName {
            name: "".to_string(),
        }]);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn recipe_update_requires_mandatory_fields_for_put() {
        let payload = RecipeUpdate {
            title: Some("New title".to_string()),
            time_minutes: None,
            price: None,
            link: None,
            description: None,
            tags: None,
            ingredients: None,
        };
        assert!(payload.validate().is_ok());
        assert!(payload.require_complete().is_err());
    }

    #[test]
    fn new_user_rejects_invalid_email() {
        let payload = NewUser {
            email: "example.com".to_string(),
            password: "testpass123".to_string(),
            name: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn new_user_rejects_short_password() {
        let payload = NewUser {
            email: "test@example.com".to_string(),
            password: "pw".to_string(),
            name: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn user_update_allows_partial_payload() {
        let payload = UserUpdate {
            name: Some("Updated name".to_string()),
            password: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn parses_id_list() {
        assert_eq!(params_to_ints("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(params_to_ints(" 4 , 5 ").unwrap(), vec![4, 5]);
    }

    #[test]
    fn rejects_non_numeric_id_list() {
        assert!(params_to_ints("1,two").is_err());
        assert!(params_to_ints("").is_err());
    }

    #[test]
    fn parses_assigned_only_flag() {
        assert!(!parse_assigned_only(None).unwrap());
        assert!(!parse_assigned_only(Some(&"0".to_string())).unwrap());
        assert!(parse_assigned_only(Some(&"1".to_string())).unwrap());
        assert!(parse_assigned_only(Some(&"yes".to_string())).is_err());
    }
}
