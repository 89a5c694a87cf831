//! # Data access
//!
//! [`QueryExecutor`] is the only seam between search logic and the store: it
//! fetches projected rows, raw member entities, and id-only counts for a
//! [`FilterExpr`]. [`SeaOrmExecutor`] implements it over any Sea-ORM
//! connection, so passing a `DatabaseTransaction` runs every query inside the
//! caller's transaction.
//!
//! The search operations live in [`member_search`]; derived lookups and
//! writes in [`member_repository`] and [`team_repository`].

pub mod member_repository;
pub mod member_search;
pub mod team_repository;

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, JoinType, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};

use crate::dto::MemberTeamDto;
use crate::entity::{member, team};
use crate::filtering::{FilterExpr, SortField};
use crate::pagination::PageRequest;

/// Whether a member query joins `team`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSpec {
    None,
    LeftTeam,
}

impl JoinSpec {
    /// The cheapest join that can still evaluate `filter`.
    #[must_use]
    pub fn for_filter(filter: &FilterExpr) -> Self {
        if filter.references_team() {
            Self::LeftTeam
        } else {
            Self::None
        }
    }

    fn apply(self, select: Select<member::Entity>) -> Select<member::Entity> {
        match self {
            Self::None => select,
            Self::LeftTeam => select.join(JoinType::LeftJoin, member::Relation::Team.def()),
        }
    }
}

/// Query and count capability the search operations run on.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Rows of `member LEFT JOIN team` matching `filter`, windowed and sorted
    /// by `page` when given.
    async fn fetch_rows(
        &self,
        filter: &FilterExpr,
        page: Option<&PageRequest>,
    ) -> Result<Vec<MemberTeamDto>, DbErr>;

    /// Member entities matching `filter`, ordered by id.
    async fn fetch_members(
        &self,
        filter: &FilterExpr,
        join: JoinSpec,
    ) -> Result<Vec<member::Model>, DbErr>;

    /// Number of members matching `filter`. Projects only `member.id`.
    async fn count(&self, filter: &FilterExpr, join: JoinSpec) -> Result<u64, DbErr>;
}

/// [`QueryExecutor`] over a borrowed Sea-ORM connection or transaction.
#[derive(Debug, Clone, Copy)]
pub struct SeaOrmExecutor<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmExecutor<'c, C> {
    pub const fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn member_team_projection() -> Select<member::Entity> {
    member::Entity::find()
        .select_only()
        .column_as(member::Column::Id, "member_id")
        .column(member::Column::Username)
        .column(member::Column::Age)
        .column_as(team::Column::Id, "team_id")
        .column_as(team::Column::Name, "team_name")
        .join(JoinType::LeftJoin, member::Relation::Team.def())
}

/// Adds `filter` as the WHERE clause; `FilterExpr::All` leaves the query
/// unrestricted.
fn filtered(select: Select<member::Entity>, filter: &FilterExpr) -> Select<member::Entity> {
    if filter.is_all() {
        select
    } else {
        select.filter(filter.clone().into_condition())
    }
}

fn rows_select(filter: &FilterExpr, page: Option<&PageRequest>) -> Select<member::Entity> {
    let select = filtered(member_team_projection(), filter);
    match page {
        Some(page) => apply_sort(select, page)
            .offset(page.offset())
            .limit(page.limit()),
        None => select.order_by(SortField::Id.expr(), Order::Asc),
    }
}

fn members_select(filter: &FilterExpr, join: JoinSpec) -> Select<member::Entity> {
    filtered(join.apply(member::Entity::find()), filter).order_by_asc(member::Column::Id)
}

fn count_select(filter: &FilterExpr, join: JoinSpec) -> Select<member::Entity> {
    filtered(
        join.apply(member::Entity::find())
            .select_only()
            .column(member::Column::Id),
        filter,
    )
}

/// Requested orders first, then `member.id` so equal keys keep a stable order.
pub(crate) fn apply_sort(mut select: Select<member::Entity>, page: &PageRequest) -> Select<member::Entity> {
    for order in page.sort() {
        select = select.order_by(order.field.expr(), Order::from(order.direction));
    }
    if !page.sort().iter().any(|order| order.field == SortField::Id) {
        select = select.order_by(SortField::Id.expr(), Order::Asc);
    }
    select
}

#[async_trait]
impl<C: ConnectionTrait> QueryExecutor for SeaOrmExecutor<'_, C> {
    async fn fetch_rows(
        &self,
        filter: &FilterExpr,
        page: Option<&PageRequest>,
    ) -> Result<Vec<MemberTeamDto>, DbErr> {
        rows_select(filter, page)
            .into_model::<MemberTeamDto>()
            .all(self.conn)
            .await
    }

    async fn fetch_members(
        &self,
        filter: &FilterExpr,
        join: JoinSpec,
    ) -> Result<Vec<member::Model>, DbErr> {
        members_select(filter, join).all(self.conn).await
    }

    async fn count(&self, filter: &FilterExpr, join: JoinSpec) -> Result<u64, DbErr> {
        count_select(filter, join).count(self.conn).await
    }
}
