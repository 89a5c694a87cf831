//! Schema bootstrap and sample data for local runs and tests.

use sea_orm::{ConnectionTrait, DbErr, Schema};

use crate::audit::AuditorProvider;
use crate::errors::ApiError;
use crate::repository::{member_repository, team_repository};

/// Number of members [`init_members`] inserts.
pub const SAMPLE_MEMBERS: i32 = 100;

/// Create the `team` and `member` tables from the entity definitions, if
/// they do not exist yet.
///
/// # Errors
///
/// Returns the store error when a `CREATE TABLE` fails.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut team = schema.create_table_from_entity(crate::entity::Team);
    team.if_not_exists();
    db.execute(backend.build(&team)).await?;

    let mut member = schema.create_table_from_entity(crate::entity::Member);
    member.if_not_exists();
    db.execute(backend.build(&member)).await?;

    tracing::debug!("tables ready");
    Ok(())
}

/// Insert `teamA`, `teamB` and members `member0`..`member99`, where
/// `member{i}` is `i` years old and belongs to `teamA` for even `i`, `teamB`
/// otherwise.
///
/// # Errors
///
/// Propagates the first failed insert.
pub async fn init_members<C: ConnectionTrait>(
    db: &C,
    auditor: &dyn AuditorProvider,
) -> Result<(), ApiError> {
    let team_a = team_repository::save(db, auditor, "teamA").await?;
    let team_b = team_repository::save(db, auditor, "teamB").await?;

    for i in 0..SAMPLE_MEMBERS {
        let team = if i % 2 == 0 { &team_a } else { &team_b };
        member_repository::save(db, auditor, &format!("member{i}"), i, Some(team.id)).await?;
    }

    tracing::info!(teams = 2, members = SAMPLE_MEMBERS, "sample data loaded");
    Ok(())
}
