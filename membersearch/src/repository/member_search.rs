//! Member search over a [`QueryExecutor`].
//!
//! Every operation composes the [`SearchCondition`] into one filter and runs
//! it as a single content query, plus at most one count query for the paged
//! variants.

use super::{JoinSpec, QueryExecutor};
use crate::dto::MemberTeamDto;
use crate::entity::member;
use crate::errors::ApiError;
use crate::filtering::{SearchCondition, compose, compose_with_between};
use crate::pagination::{Page, PageRequest, execute_page};

/// All matching members with their team.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn search<E: QueryExecutor + ?Sized>(
    executor: &E,
    condition: &SearchCondition,
) -> Result<Vec<MemberTeamDto>, ApiError> {
    let filter = compose(condition);
    executor
        .fetch_rows(&filter, None)
        .await
        .map_err(ApiError::database)
}

/// One page of matching members. The count query only runs when the fetched
/// content cannot prove the total.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the content or count query fails.
pub async fn search_page<E: QueryExecutor + ?Sized>(
    executor: &E,
    condition: &SearchCondition,
    request: &PageRequest,
) -> Result<Page<MemberTeamDto>, ApiError> {
    let filter = compose(condition);
    let content = executor
        .fetch_rows(&filter, Some(request))
        .await
        .map_err(ApiError::database)?;

    let join = JoinSpec::for_filter(&filter);
    execute_page(content, request, || executor.count(&filter, join))
        .await
        .map_err(ApiError::database)
}

/// Like [`search_page`] but always runs the count query.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the content or count query fails.
pub async fn search_page_with_count<E: QueryExecutor + ?Sized>(
    executor: &E,
    condition: &SearchCondition,
    request: &PageRequest,
) -> Result<Page<MemberTeamDto>, ApiError> {
    let filter = compose(condition);
    let content = executor
        .fetch_rows(&filter, Some(request))
        .await
        .map_err(ApiError::database)?;
    let total = executor
        .count(&filter, JoinSpec::for_filter(&filter))
        .await
        .map_err(ApiError::database)?;

    Ok(Page::new(content, request, total))
}

/// One page without a total. Fetches a single extra row to learn whether a
/// following page exists and never counts.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn search_slice<E: QueryExecutor + ?Sized>(
    executor: &E,
    condition: &SearchCondition,
    request: &PageRequest,
) -> Result<Page<MemberTeamDto>, ApiError> {
    let filter = compose(condition);
    let mut content = executor
        .fetch_rows(&filter, Some(&request.lookahead()))
        .await
        .map_err(ApiError::database)?;

    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
    let has_next = content.len() > limit;
    content.truncate(limit);

    Ok(Page::slice(content, request, has_next))
}

/// Matching member entities. Both age bounds together run as one `BETWEEN`,
/// and `team` is only joined when the team name is filtered on.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn search_members<E: QueryExecutor + ?Sized>(
    executor: &E,
    condition: &SearchCondition,
) -> Result<Vec<member::Model>, ApiError> {
    let filter = compose_with_between(condition);
    executor
        .fetch_members(&filter, JoinSpec::for_filter(&filter))
        .await
        .map_err(ApiError::database)
}
