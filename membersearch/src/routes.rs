//! # REST API
//!
//! | route                | result                                        |
//! |----------------------|-----------------------------------------------|
//! | `GET /v1/members`    | every matching member with its team           |
//! | `GET /v2/members`    | one page with a total, counted only if needed |
//! | `GET /v3/members`    | one page without a total                      |
//! | `GET /members/{id}`  | one member entity                             |
//!
//! The list routes take the [`SearchCondition`] fields as query parameters;
//! the paged ones also take [`PageParams`].

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use utoipa::IntoParams;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::config::PagingConfig;
use crate::dto::MemberTeamDto;
use crate::entity::member;
use crate::errors::ApiError;
use crate::filtering::{SearchCondition, parse_sorting};
use crate::pagination::{Page, PageRequest, calculate_content_range};
use crate::repository::{SeaOrmExecutor, member_repository, member_search};

const RESOURCE_NAME_PLURAL: &str = "members";

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub paging: PagingConfig,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, paging: PagingConfig) -> Self {
        Self { db, paging }
    }
}

/// Paging query parameters. `page` is zero-based; `size` is capped at the
/// configured maximum.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    #[param(example = 0)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<i64>,
    #[param(example = 20)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub size: Option<i64>,
    /// `column`, `column,desc`, `a,desc;b,asc` or `["column", "DESC"]`.
    #[param(example = "username,desc")]
    #[serde(default)]
    pub sort: Option<String>,
}

impl PageParams {
    /// # Errors
    ///
    /// Fails validation for a negative page or a non-positive size.
    pub fn to_request(&self, paging: &PagingConfig) -> Result<PageRequest, ApiError> {
        let request = PageRequest::of(self.page.unwrap_or(0), paging.page_size(self.size))?;
        let sort = self.sort.as_deref().map(parse_sorting).unwrap_or_default();
        Ok(request.with_sort(sort))
    }
}

#[utoipa::path(
    get,
    path = "/v1/members",
    params(SearchCondition),
    responses(
        (status = axum::http::StatusCode::OK, description = "Matching members with their team", body = [MemberTeamDto]),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Malformed query string"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    ),
    summary = "Search members",
)]
pub async fn list_members(
    State(state): State<AppState>,
    condition: Result<Query<SearchCondition>, QueryRejection>,
) -> Result<Json<Vec<MemberTeamDto>>, ApiError> {
    let Query(condition) = condition?;
    let executor = SeaOrmExecutor::new(&state.db);
    Ok(Json(member_search::search(&executor, &condition).await?))
}

#[utoipa::path(
    get,
    path = "/v2/members",
    params(SearchCondition, PageParams),
    responses(
        (status = axum::http::StatusCode::OK, description = "One page of matching members", body = Page<MemberTeamDto>),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Malformed query string"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid page request"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    ),
    summary = "Search members, paged",
    description = "Returns one page and its total. The total is counted only when the page itself cannot prove it.",
)]
pub async fn page_members(
    State(state): State<AppState>,
    condition: Result<Query<SearchCondition>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<(HeaderMap, Json<Page<MemberTeamDto>>), ApiError> {
    let (Query(condition), Query(params)) = (condition?, params?);
    let request = params.to_request(&state.paging)?;
    let executor = SeaOrmExecutor::new(&state.db);
    let page = member_search::search_page(&executor, &condition, &request).await?;

    let total = page.total_count.unwrap_or_default();
    let len = u64::try_from(page.number_of_elements()).unwrap_or(u64::MAX);
    let headers = calculate_content_range(page.offset, len, total, RESOURCE_NAME_PLURAL);
    Ok((headers, Json(page)))
}

#[utoipa::path(
    get,
    path = "/v3/members",
    params(SearchCondition, PageParams),
    responses(
        (status = axum::http::StatusCode::OK, description = "One page of matching members without a total", body = Page<MemberTeamDto>),
        (status = axum::http::StatusCode::BAD_REQUEST, description = "Malformed query string"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid page request"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    ),
    summary = "Search members, sliced",
)]
pub async fn slice_members(
    State(state): State<AppState>,
    condition: Result<Query<SearchCondition>, QueryRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<MemberTeamDto>>, ApiError> {
    let (Query(condition), Query(params)) = (condition?, params?);
    let request = params.to_request(&state.paging)?;
    let executor = SeaOrmExecutor::new(&state.db);
    Ok(Json(
        member_search::search_slice(&executor, &condition, &request).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    responses(
        (status = axum::http::StatusCode::OK, description = "The requested member", body = member::Model),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Member not found"),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
    ),
    summary = "Get one member",
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<member::Model>, ApiError> {
    member_repository::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Member", Some(id.to_string())))
}

/// All member routes, documented.
pub fn router(state: AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_members))
        .routes(routes!(page_members))
        .routes(routes!(slice_members))
        .routes(routes!(get_member))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::{SortField, SortOrder};

    #[test]
    fn test_page_params_defaults() {
        let request = PageParams::default()
            .to_request(&PagingConfig::default())
            .unwrap();
        assert_eq!(request.offset(), 0);
        assert_eq!(request.limit(), 20);
        assert!(request.sort().is_empty());
    }

    #[test]
    fn test_page_params_clamp_and_sort() {
        let params = PageParams {
            page: Some(1),
            size: Some(10_000),
            sort: Some("username,desc".to_string()),
        };
        let request = params.to_request(&PagingConfig::default()).unwrap();
        assert_eq!(request.limit(), 2000);
        assert_eq!(request.offset(), 2000);
        assert_eq!(request.sort(), [SortOrder::desc(SortField::Username)]);
    }

    #[test]
    fn test_page_params_reject_bad_values() {
        let params = PageParams {
            page: Some(-1),
            size: Some(0),
            sort: None,
        };
        let err = params.to_request(&PagingConfig::default()).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
