//! In-process drink store used when no `DATABASE_URL` is configured.
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::drink_repo::{Drink, DrinkRepo, Ingredient};
use crate::repos::error::RepoError;

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Drink>,
}

impl Table {
    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct MemoryDrinkRepo {
    table: RwLock<Table>,
}

impl MemoryDrinkRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrinkRepo for MemoryDrinkRepo {
    async fn list(&self) -> Result<Vec<Drink>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, RepoError> {
        let mut table = self.table.write().await;
        if table.title_taken(title, None) {
            return Err(RepoError::Conflict("title"));
        }

        table.last_id += 1;
        let drink = Drink {
            id: table.last_id,
            title: title.to_string(),
            recipe: recipe.to_vec(),
        };
        table.rows.insert(drink.id, drink.clone());

        Ok(drink)
    }

    async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Option<Drink>, RepoError> {
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(title) = title
            && table.title_taken(title, Some(id))
        {
            return Err(RepoError::Conflict("title"));
        }

        let Some(drink) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = title {
            drink.title = title.to_string();
        }
        if let Some(recipe) = recipe {
            drink.recipe = recipe.to_vec();
        }

        Ok(Some(drink.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}
