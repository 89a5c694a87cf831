use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryOrder};

use crate::audit::{self, AuditorProvider};
use crate::entity::team;
use crate::errors::ApiError;
use crate::validation::validators::validate_required;

const RESOURCE: &str = "Team";

/// Insert a new team.
///
/// # Errors
///
/// Fails validation for a blank name, and with [`ApiError::Database`] when
/// the insert fails.
pub async fn save<C: ConnectionTrait>(
    db: &C,
    auditor: &dyn AuditorProvider,
    name: &str,
) -> Result<team::Model, ApiError> {
    validate_required("name", name)?;

    let mut model = team::ActiveModel::named(name);
    audit::before_insert(&mut model, auditor);
    Ok(model.insert(db).await?)
}

/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<team::Model>, ApiError> {
    Ok(team::Entity::find_by_id(id).one(db).await?)
}

/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<team::Model>, ApiError> {
    Ok(team::Entity::find()
        .order_by_asc(team::Column::Id)
        .all(db)
        .await?)
}

/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, ApiError> {
    Ok(team::Entity::find().count(db).await?)
}

/// Members of a deleted team stay, with their `team_id` cleared.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no team has `id`.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), ApiError> {
    let result = team::Entity::delete_by_id(id).exec(db).await?;
    match result.rows_affected {
        0 => Err(ApiError::not_found(RESOURCE, Some(id.to_string()))),
        _ => Ok(()),
    }
}
