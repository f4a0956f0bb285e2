use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        GroupByCategoryResponse, GroupingQuery, MenuDraft, MenuFilters, MenuListResponse,
        MenuResponse, MessageResponse,
    },
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    page: Option<u32>,
    per_page: Option<u32>,
}

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid menu id '{}'", raw)))
}

pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    })
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query.map(|Query(value)| value).map_err(|rejection| {
        AppError::InvalidInput(format!("Invalid query parameters: {}", rejection.body_text()))
    })
}

/// POST /menu
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MenuDraft>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MenuResponse>)> {
    let menu = state.menu_service.create(json_body(body)?).await?;

    Ok((
        StatusCode::CREATED,
        Json(MenuResponse {
            message: Some("Menu created".to_string()),
            data: menu,
        }),
    ))
}

/// GET /menu
pub async fn list(
    State(state): State<Arc<AppState>>,
    filters: Result<Query<MenuFilters>, QueryRejection>,
) -> AppResult<Json<MenuListResponse>> {
    let filters = query_params(filters)?;
    let (menus, pagination) = state.menu_service.list(&filters).await?;

    Ok(Json(MenuListResponse {
        data: menus,
        pagination: Some(pagination),
    }))
}

/// GET /menu/search
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<MenuListResponse>> {
    let params = query_params(params)?;
    let (menus, pagination) = state
        .menu_service
        .search(&params.q, params.page, params.per_page)
        .await?;

    Ok(Json(MenuListResponse {
        data: menus,
        pagination: Some(pagination),
    }))
}

/// GET /menu/group-by-category
pub async fn group_by_category(
    State(state): State<Arc<AppState>>,
    params: Result<Query<GroupingQuery>, QueryRejection>,
) -> AppResult<Json<GroupByCategoryResponse>> {
    let params = query_params(params)?;
    let data = state.menu_service.group_by_category(&params).await?;
    Ok(Json(GroupByCategoryResponse { data }))
}

/// GET /menu/:id
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuResponse>> {
    let menu = state.menu_service.get(parse_id(&id)?).await?;
    Ok(Json(MenuResponse {
        message: None,
        data: menu,
    }))
}

/// PUT /menu/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<MenuDraft>, JsonRejection>,
) -> AppResult<Json<MenuResponse>> {
    let id = parse_id(&id)?;
    let menu = state.menu_service.update(id, json_body(body)?).await?;

    Ok(Json(MenuResponse {
        message: Some("Menu updated".to_string()),
        data: menu,
    }))
}

/// DELETE /menu/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.menu_service.delete(parse_id(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "Menu deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("abc"), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_id("0"), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_id("-3"), Err(AppError::InvalidInput(_))));
    }
}
