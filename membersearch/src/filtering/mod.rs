//! # Dynamic Search Conditions
//!
//! Optional search fields become a WHERE clause in three steps:
//!
//! 1. [`SearchCondition`] holds what the caller asked for. Every field is
//!    optional.
//! 2. [`compose`] turns the present fields into a [`FilterExpr`] tree. Absent
//!    or blank fields contribute nothing, and an empty condition yields
//!    [`FilterExpr::All`] rather than an `Option`.
//! 3. [`FilterExpr::into_condition`] compiles the tree into a Sea-ORM
//!    [`Condition`](sea_orm::Condition), one SQL predicate per leaf.
//!
//! ```rust,ignore
//! // GET /v1/members?team_name=teamB&age_goe=35&age_loe=40
//! let filter = compose(&condition);
//! // "team"."name" = 'teamB' AND "member"."age" >= 35 AND "member"."age" <= 40
//! ```
//!
//! Sorting for paged queries is parsed by [`parse_sorting`].

pub mod composer;
pub mod condition;
pub mod expr;
pub mod sort;

pub use composer::{compose, compose_with_between};
pub use condition::SearchCondition;
pub use expr::{FilterExpr, FilterField};
pub use sort::{Direction, SortField, SortOrder, parse_sorting};
