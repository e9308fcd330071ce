/*
 * Responsibility
 * - Drink model (title + recipe) and the storage contract handlers depend on
 * - Implementations: PostgreSQL (pg_drink_repo) and in-memory (memory_drink_repo)
 */
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[async_trait]
pub trait DrinkRepo: Send + Sync {
    /// All drinks ordered by id.
    async fn list(&self) -> Result<Vec<Drink>, RepoError>;

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, RepoError>;

    /// `None` fields are left untouched. Returns `Ok(None)` when `id` does not exist.
    async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Option<Drink>, RepoError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}
