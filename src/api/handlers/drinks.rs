/*
 * Responsibility
 * - /drinks CRUD handlers
 * - Permission checks already ran in the guard; handlers only see AuthCtx
 * - DTO validation failures => 422, missing drink => 404, storage failures => 500
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteDrinkResponse, DrinksResponse, LongDrink, ShortDrink,
            UpdateDrinkRequest,
        },
        extractors::{AuthCtxExtractor, DrinkId, JsonBody},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<ShortDrink>>, AppError> {
    let drinks = state.drinks.list().await?;

    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(ShortDrink::from).collect(),
    )))
}

pub async fn get_drinks_detail(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<DrinksResponse<LongDrink>>, AppError> {
    let drinks = state.drinks.list().await?;
    tracing::debug!(subject = %ctx.subject, count = drinks.len(), "drink details listed");

    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(LongDrink::from).collect(),
    )))
}

pub async fn create_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    JsonBody(req): JsonBody<CreateDrinkRequest>,
) -> Result<Json<DrinksResponse<LongDrink>>, AppError> {
    let (title, recipe) = req.validate().map_err(AppError::unprocessable)?;

    let drink = state.drinks.create(&title, &recipe).await?;
    tracing::info!(drink_id = drink.id, subject = %ctx.subject, "drink created");

    // respond with the full menu so the client can refresh in one round trip
    let drinks = state.drinks.list().await?;
    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(LongDrink::from).collect(),
    )))
}

pub async fn update_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    DrinkId(drink_id): DrinkId,
    JsonBody(req): JsonBody<UpdateDrinkRequest>,
) -> Result<Json<DrinksResponse<LongDrink>>, AppError> {
    let (title, recipe) = req.validate().map_err(AppError::unprocessable)?;

    let drink = state
        .drinks
        .update(drink_id, title.as_deref(), recipe.as_deref())
        .await?
        .ok_or(AppError::not_found("drink"))?;
    tracing::info!(drink_id, subject = %ctx.subject, "drink updated");

    Ok(Json(DrinksResponse::new(vec![LongDrink::from(drink)])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    DrinkId(drink_id): DrinkId,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    if !state.drinks.delete(drink_id).await? {
        return Err(AppError::not_found("drink"));
    }
    tracing::info!(drink_id, subject = %ctx.subject, "drink deleted");

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: drink_id,
    }))
}
