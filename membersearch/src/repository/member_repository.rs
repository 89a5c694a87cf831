//! Member lookups and writes.
//!
//! Every function takes the connection explicitly; pass a
//! `DatabaseTransaction` to run it inside the caller's transaction. Inserts
//! and single-row updates go through the audit hooks first.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    sea_query::Expr,
};

use super::apply_sort;
use crate::audit::{self, AuditorProvider};
use crate::dto::{MemberDto, UsernameOnly, UsernameWithTeam};
use crate::entity::{member, team};
use crate::errors::ApiError;
use crate::filtering::SortField;
use crate::pagination::{Page, PageRequest, execute_page};
use crate::validation::{
    ValidationErrors,
    validators::{validate_range, validate_required},
};

const RESOURCE: &str = "Member";

fn validate_member(username: &str, age: i32) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validate_required("username", username));
    errors.check(validate_range("age", age, Some(0), None));
    errors.result()
}

/// Insert a new member.
///
/// # Errors
///
/// Fails validation for a blank username or a negative age, and with
/// [`ApiError::Database`] when the insert fails (e.g. an unknown `team_id`).
pub async fn save<C: ConnectionTrait>(
    db: &C,
    auditor: &dyn AuditorProvider,
    username: &str,
    age: i32,
    team_id: Option<i32>,
) -> Result<member::Model, ApiError> {
    validate_member(username, age)?;

    let mut model = member::ActiveModel::new_member(username, age, team_id);
    audit::before_insert(&mut model, auditor);
    Ok(model.insert(db).await?)
}

/// Change a member's age, stamping the modification columns.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
pub async fn update_age<C: ConnectionTrait>(
    db: &C,
    auditor: &dyn AuditorProvider,
    id: i32,
    age: i32,
) -> Result<member::Model, ApiError> {
    validate_range("age", age, Some(0), None)?;

    let existing = member::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found(RESOURCE, Some(id.to_string())))?;

    let mut model = existing.into_active_model();
    model.age = Set(age);
    audit::before_update(&mut model, auditor);
    Ok(model.update(db).await?)
}

/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<member::Model>, ApiError> {
    Ok(member::Entity::find_by_id(id).one(db).await?)
}

/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<member::Model>, ApiError> {
    Ok(member::Entity::find()
        .order_by_asc(member::Column::Id)
        .all(db)
        .await?)
}

/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Vec<member::Model>, ApiError> {
    Ok(member::Entity::find()
        .filter(member::Column::Username.eq(username))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await?)
}

/// Members whose username is any of `names`. An empty slice matches nothing.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_by_names<C: ConnectionTrait>(
    db: &C,
    names: &[&str],
) -> Result<Vec<member::Model>, ApiError> {
    Ok(member::Entity::find()
        .filter(member::Column::Username.is_in(names.iter().copied()))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await?)
}

/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_by_username_and_age_greater_than<C: ConnectionTrait>(
    db: &C,
    username: &str,
    age: i32,
) -> Result<Vec<member::Model>, ApiError> {
    Ok(member::Entity::find()
        .filter(member::Column::Username.eq(username))
        .filter(member::Column::Age.gt(age))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await?)
}

/// Every member together with its team, loaded in one joined query.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_with_team<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<(member::Model, Option<team::Model>)>, ApiError> {
    Ok(member::Entity::find()
        .find_also_related(team::Entity)
        .order_by_asc(member::Column::Id)
        .all(db)
        .await?)
}

/// Members that belong to a team, with the team's name. Members without a
/// team are left out.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_member_dtos<C: ConnectionTrait>(db: &C) -> Result<Vec<MemberDto>, ApiError> {
    Ok(member::Entity::find()
        .select_only()
        .column(member::Column::Id)
        .column(member::Column::Username)
        .column_as(team::Column::Name, "team_name")
        .join(JoinType::InnerJoin, member::Relation::Team.def())
        .order_by_asc(member::Column::Id)
        .into_model::<MemberDto>()
        .all(db)
        .await?)
}

/// Usernames of every member, in id order.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_username_list<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, ApiError> {
    Ok(member::Entity::find()
        .select_only()
        .column(member::Column::Username)
        .order_by_asc(member::Column::Id)
        .into_tuple::<String>()
        .all(db)
        .await?)
}

/// Members named `username`, reading only the username column.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_projection_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Vec<UsernameOnly>, ApiError> {
    Ok(member::Entity::find()
        .select_only()
        .column(member::Column::Username)
        .filter(member::Column::Username.eq(username))
        .order_by_asc(member::Column::Id)
        .into_model::<UsernameOnly>()
        .all(db)
        .await?)
}

/// Members named `username` with their team's name. Members without a team
/// are kept, with `team_name` left empty.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_nested_projection_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Vec<UsernameWithTeam>, ApiError> {
    Ok(member::Entity::find()
        .select_only()
        .column(member::Column::Username)
        .column_as(team::Column::Name, "team_name")
        .join(JoinType::LeftJoin, member::Relation::Team.def())
        .filter(member::Column::Username.eq(username))
        .order_by_asc(member::Column::Id)
        .into_model::<UsernameWithTeam>()
        .all(db)
        .await?)
}

fn by_age(age: i32, request: &PageRequest) -> Select<member::Entity> {
    let select = member::Entity::find().filter(member::Column::Age.eq(age));
    let select = if request
        .sort()
        .iter()
        .any(|order| order.field == SortField::TeamName)
    {
        select.join(JoinType::LeftJoin, member::Relation::Team.def())
    } else {
        select
    };
    apply_sort(select, request)
}

/// Page of members with exactly `age`. When a count is needed it projects
/// only `username`, without the sort or any join.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the content or count query fails.
pub async fn find_by_age_page<C: ConnectionTrait>(
    db: &C,
    age: i32,
    request: &PageRequest,
) -> Result<Page<member::Model>, ApiError> {
    let content = by_age(age, request)
        .offset(request.offset())
        .limit(request.limit())
        .all(db)
        .await?;

    let count = || {
        member::Entity::find()
            .select_only()
            .column(member::Column::Username)
            .filter(member::Column::Age.eq(age))
            .count(db)
    };
    Ok(execute_page(content, request, count).await?)
}

/// Slice of members with exactly `age`; never counts.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn find_slice_by_age<C: ConnectionTrait>(
    db: &C,
    age: i32,
    request: &PageRequest,
) -> Result<Page<member::Model>, ApiError> {
    let mut content = by_age(age, request)
        .offset(request.offset())
        .limit(request.lookahead().limit())
        .all(db)
        .await?;

    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
    let has_next = content.len() > limit;
    content.truncate(limit);
    Ok(Page::slice(content, request, has_next))
}

/// Add one year to every member aged `age` or older, in a single statement.
/// Audit columns are not touched. Returns the number of rows changed.
///
/// # Errors
///
/// Returns [`ApiError::Database`] when the store fails.
pub async fn bulk_age_plus<C: ConnectionTrait>(db: &C, age: i32) -> Result<u64, ApiError> {
    let result = member::Entity::update_many()
        .col_expr(member::Column::Age, Expr::col(member::Column::Age).add(1))
        .filter(member::Column::Age.gte(age))
        .exec(db)
        .await?;
    tracing::debug!(age, rows = result.rows_affected, "bulk age increment");
    Ok(result.rows_affected)
}

/// # Errors
///
/// Returns [`ApiError::NotFound`] when no member has `id`.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), ApiError> {
    let result = member::Entity::delete_by_id(id).exec(db).await?;
    match result.rows_affected {
        0 => Err(ApiError::not_found(RESOURCE, Some(id.to_string()))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_member() {
        assert!(validate_member("member1", 10).is_ok());

        let errors = validate_member("  ", -1).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[0].field, "username");
        assert_eq!(errors.errors()[1].field, "age");
    }
}
