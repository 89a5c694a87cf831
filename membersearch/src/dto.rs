use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of `member LEFT JOIN team`. Team columns are `None` for a member
/// without a team.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct MemberTeamDto {
    pub member_id: i32,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i32>,
    pub team_name: Option<String>,
}

/// Member with the name of its team, read through an inner join.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct MemberDto {
    pub id: i32,
    pub username: String,
    pub team_name: String,
}

/// Just the username of a member.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct UsernameOnly {
    pub username: String,
}

/// Username with the name of the member's team, if any.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct UsernameWithTeam {
    pub username: String,
    pub team_name: Option<String>,
}
