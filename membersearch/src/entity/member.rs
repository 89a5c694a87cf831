use chrono::{DateTime, Utc};
use sea_orm::{Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "member")]
#[schema(as = Member)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub age: i32,
    /// A member may exist without a team.
    pub team_id: Option<i32>,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: String,
    pub last_modified_date: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_delete = "SetNull"
    )]
    Team,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Unsaved member. Audit columns are filled by the pre-insert hook.
    #[must_use]
    pub fn new_member(username: impl Into<String>, age: i32, team_id: Option<i32>) -> Self {
        Self {
            username: Set(username.into()),
            age: Set(age),
            team_id: Set(team_id),
            ..Default::default()
        }
    }
}
