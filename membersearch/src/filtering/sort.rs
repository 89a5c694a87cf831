use sea_orm::{Order, sea_query::SimpleExpr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::expr::FilterField;

const DEFAULT_SORT_ORDER: &str = "ASC";

/// Columns the paged search can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Username,
    Age,
    TeamName,
}

impl SortField {
    /// Accepts snake_case and camelCase spellings.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "id" | "member_id" | "memberId" => Some(Self::Id),
            "username" => Some(Self::Username),
            "age" => Some(Self::Age),
            "team_name" | "teamName" => Some(Self::TeamName),
            _ => None,
        }
    }

    #[must_use]
    pub const fn filter_field(self) -> FilterField {
        match self {
            Self::Id => FilterField::MemberId,
            Self::Username => FilterField::MemberUsername,
            Self::Age => FilterField::MemberAge,
            Self::TeamName => FilterField::TeamName,
        }
    }

    #[must_use]
    pub fn expr(self) -> SimpleExpr {
        self.filter_field().column()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Self::Asc,
            Direction::Desc => Self::Desc,
        }
    }
}

/// Any non-ASC value is treated as DESC.
fn parse_direction(sort_order: &str) -> Direction {
    if sort_order.trim().eq_ignore_ascii_case("ASC") {
        Direction::Asc
    } else {
        Direction::Desc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    #[must_use]
    pub const fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    #[must_use]
    pub const fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Parse `["column", "DESC"]` (JSON array) into column and order strings
fn parse_json_sort(json: &str) -> Option<(String, String)> {
    let sort_vec: Vec<String> = serde_json::from_str(json).ok()?;
    let column = sort_vec.first()?.clone();
    let order = sort_vec
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string());
    Some((column, order))
}

/// Parse `column` or `column,desc`
fn parse_plain_sort(sort: &str) -> (String, String) {
    sort.split_once(',').map_or_else(
        || (sort.to_string(), DEFAULT_SORT_ORDER.to_string()),
        |(column, order)| (column.to_string(), order.to_string()),
    )
}

/// Parse a `sort` query value into an ordered list of sort orders.
///
/// Supported formats:
/// - `username` (ascending)
/// - `username,desc`
/// - `username,desc;age,asc` (several orders, applied left to right)
/// - `["username", "DESC"]` (JSON array)
///
/// Unknown columns are skipped.
#[must_use]
pub fn parse_sorting(sort: &str) -> Vec<SortOrder> {
    let sort = sort.trim();
    if sort.starts_with('[') {
        return parse_json_sort(sort)
            .and_then(|(column, order)| resolve(&column, &order))
            .into_iter()
            .collect();
    }

    sort.split(';')
        .filter(|part| !part.trim().is_empty())
        .filter_map(|part| {
            let (column, order) = parse_plain_sort(part);
            resolve(&column, &order)
        })
        .collect()
}

fn resolve(column: &str, order: &str) -> Option<SortOrder> {
    let Some(field) = SortField::parse(column) else {
        tracing::debug!(column = %column, "ignoring sort on unknown column");
        return None;
    };
    Some(SortOrder {
        field,
        direction: parse_direction(order),
    })
}
