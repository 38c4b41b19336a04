use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{
    error::{AppError, AppResult},
    models::{ApiMessage, Item, ItemDraft, PageQuery},
    state::AppState,
};

pub async fn root() -> Json<ApiMessage> {
    Json(ApiMessage {
        message: "Hello, Worldi!".to_string(),
    })
}

pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let items = state.repo.read_all().await?;
    Ok(Json(items))
}

pub async fn list_items_paged(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<Vec<Item>>> {
    let Query(pairs) = query?;
    let page = PageQuery::from_pairs(pairs)
        .validate()
        .map_err(AppError::validation)?;

    let items = state.repo.list(page).await?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Item>> {
    let Path(id) = id?;
    let item_id = parse_item_id(&id)?;
    let item = state.repo.get_by_id(item_id).await?;
    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<ItemDraft>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let Json(draft) = payload?;

    let item = state.repo.create(draft).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ItemDraft>, JsonRejection>,
) -> AppResult<Json<Item>> {
    let Path(id) = id?;
    let item_id = parse_item_id(&id)?;
    let Json(draft) = payload?;

    let item = state.repo.update(item_id, draft).await?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    let item_id = parse_item_id(&id)?;
    state.repo.delete(item_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_item_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::unprocessable("El id del item debe ser un entero"))
}
