//! # membersearch
//!
//! Member/team search on Sea-ORM: optional search fields compose into a
//! single WHERE clause, and paged results only pay for a `COUNT` query when
//! the page itself cannot prove the total.
//!
//! ```rust,ignore
//! let executor = SeaOrmExecutor::new(&db);
//! let condition = SearchCondition::new().with_team_name("teamB").with_age_goe(35);
//! let page = member_search::search_page(&executor, &condition, &PageRequest::of(0, 3)?).await?;
//! ```

pub mod audit;
pub mod config;
pub mod dto;
pub mod entity;
pub mod errors;
pub mod filtering;
pub mod fixtures;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod validation;

pub use config::AppConfig;
pub use dto::{MemberDto, MemberTeamDto, UsernameOnly, UsernameWithTeam};
pub use errors::ApiError;
pub use filtering::{FilterExpr, SearchCondition};
pub use pagination::{Page, PageRequest};
pub use repository::{JoinSpec, QueryExecutor, SeaOrmExecutor, member_search};
pub use validation::{ValidationError, ValidationErrors};
