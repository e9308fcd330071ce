/*
 * Responsibility
 * - Drinks request/response DTO
 * - short form (public list) hides ingredient names; long form shows everything
 */
use serde::{Deserialize, Serialize};

use crate::repos::{Drink, Ingredient};

/// The frontend posts either one ingredient object or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_ingredients(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(items) => items,
            RecipeInput::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl CreateDrinkRequest {
    pub fn validate(self) -> Result<(String, Vec<Ingredient>), &'static str> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or("title is required")?;

        let recipe = self.recipe.ok_or("recipe is required")?.into_ingredients();
        validate_recipe(&recipe)?;

        Ok((title, recipe))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl UpdateDrinkRequest {
    pub fn validate(self) -> Result<(Option<String>, Option<Vec<Ingredient>>), &'static str> {
        if self.title.is_none() && self.recipe.is_none() {
            return Err("title or recipe is required");
        }

        let title = match self.title {
            Some(title) if title.trim().is_empty() => return Err("title cannot be empty"),
            Some(title) => Some(title.trim().to_string()),
            None => None,
        };

        let recipe = match self.recipe {
            Some(recipe) => {
                let recipe = recipe.into_ingredients();
                validate_recipe(&recipe)?;
                Some(recipe)
            }
            None => None,
        };

        Ok((title, recipe))
    }
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), &'static str> {
    if recipe.is_empty() {
        return Err("recipe needs at least one ingredient");
    }
    if recipe.iter().any(|i| i.name.trim().is_empty()) {
        return Err("ingredient name is required");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Serialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl From<Drink> for ShortDrink {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink
                .recipe
                .into_iter()
                .map(|i| ShortIngredient {
                    color: i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LongDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<Drink> for LongDrink {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink.recipe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).expect("dto")
    }

    #[test]
    fn create_accepts_single_ingredient() {
        let req: CreateDrinkRequest = parse(json!({
            "title": "Water",
            "recipe": {"name": "Water", "color": "blue", "parts": 1}
        }));
        let (title, recipe) = req.validate().expect("valid");
        assert_eq!(title, "Water");
        assert_eq!(recipe.len(), 1);
    }

    #[test]
    fn create_requires_title_and_recipe() {
        let req: CreateDrinkRequest = parse(json!({"recipe": []}));
        assert_eq!(req.validate().unwrap_err(), "title is required");

        let req: CreateDrinkRequest = parse(json!({"title": "Water"}));
        assert_eq!(req.validate().unwrap_err(), "recipe is required");

        let req: CreateDrinkRequest = parse(json!({"title": "Water", "recipe": []}));
        assert_eq!(
            req.validate().unwrap_err(),
            "recipe needs at least one ingredient"
        );
    }

    #[test]
    fn update_needs_some_field() {
        let req: UpdateDrinkRequest = parse(json!({}));
        assert_eq!(req.validate().unwrap_err(), "title or recipe is required");

        let req: UpdateDrinkRequest = parse(json!({"title": "  "}));
        assert_eq!(req.validate().unwrap_err(), "title cannot be empty");

        let req: UpdateDrinkRequest = parse(json!({"title": "Latte"}));
        let (title, recipe) = req.validate().expect("valid");
        assert_eq!(title.as_deref(), Some("Latte"));
        assert!(recipe.is_none());
    }

    #[test]
    fn short_form_hides_ingredient_names() {
        let drink = Drink {
            id: 7,
            title: "Matcha Shake".into(),
            recipe: vec![Ingredient {
                name: "matcha".into(),
                color: "#f7f7f7".into(),
                parts: 2,
            }],
        };

        let short = serde_json::to_value(ShortDrink::from(drink.clone())).expect("json");
        assert_eq!(
            short,
            json!({"id": 7, "title": "Matcha Shake", "recipe": [{"color": "#f7f7f7", "parts": 2}]})
        );

        let long = serde_json::to_value(LongDrink::from(drink)).expect("json");
        assert_eq!(long["recipe"][0]["name"], "matcha");
    }
}
