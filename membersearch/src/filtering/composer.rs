//! Turns a [`SearchCondition`] into the smallest [`FilterExpr`] that
//! enforces it.
//!
//! Each helper yields one leaf when its input is meaningful and
//! [`FilterExpr::All`] otherwise, so they can be combined freely with
//! [`FilterExpr::all_of`]. Strings count only when they have text: `None`,
//! `""` and `"   "` all mean "no constraint".

use super::condition::SearchCondition;
use super::expr::{FilterExpr, FilterField};

/// Filter for the projected member search.
#[must_use]
pub fn compose(condition: &SearchCondition) -> FilterExpr {
    FilterExpr::all_of([
        username_eq(condition.username.as_deref()),
        team_name_eq(condition.team_name.as_deref()),
        age_goe(condition.age_goe),
        age_loe(condition.age_loe),
    ])
}

/// Same constraints as [`compose`], with the two age bounds folded into a
/// single `BETWEEN` when both are set.
#[must_use]
pub fn compose_with_between(condition: &SearchCondition) -> FilterExpr {
    FilterExpr::all_of([
        username_eq(condition.username.as_deref()),
        team_name_eq(condition.team_name.as_deref()),
        age_between(condition.age_goe, condition.age_loe),
    ])
}

fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[must_use]
pub fn username_eq(username: Option<&str>) -> FilterExpr {
    has_text(username).map_or(FilterExpr::All, |username| {
        FilterExpr::Eq(FilterField::MemberUsername, username.into())
    })
}

#[must_use]
pub fn team_name_eq(team_name: Option<&str>) -> FilterExpr {
    has_text(team_name).map_or(FilterExpr::All, |team_name| {
        FilterExpr::Eq(FilterField::TeamName, team_name.into())
    })
}

#[must_use]
pub fn age_goe(age_goe: Option<i32>) -> FilterExpr {
    age_goe.map_or(FilterExpr::All, |age| {
        FilterExpr::Gte(FilterField::MemberAge, age.into())
    })
}

#[must_use]
pub fn age_loe(age_loe: Option<i32>) -> FilterExpr {
    age_loe.map_or(FilterExpr::All, |age| {
        FilterExpr::Lte(FilterField::MemberAge, age.into())
    })
}

/// `BETWEEN goe AND loe` when both bounds are present, otherwise whichever
/// single bound exists.
#[must_use]
pub fn age_between(age_goe: Option<i32>, age_loe: Option<i32>) -> FilterExpr {
    match (age_goe, age_loe) {
        (Some(goe), Some(loe)) => {
            FilterExpr::Between(FilterField::MemberAge, goe.into(), loe.into())
        }
        (goe, loe) => self::age_goe(goe).and(self::age_loe(loe)),
    }
}
