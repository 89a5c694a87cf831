//! Sea-ORM entities for the `member` and `team` tables.
//!
//! Both tables carry the same four audit columns, stamped explicitly by
//! [`crate::audit`] before every insert or update.

pub mod member;
pub mod team;

pub use member::Entity as Member;
pub use team::Entity as Team;
