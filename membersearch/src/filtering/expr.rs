//! Filter expression tree and its compiler.
//!
//! Search logic builds a [`FilterExpr`] without touching Sea-ORM; only
//! [`FilterExpr::into_condition`] knows how the tree maps onto SQL. Every
//! leaf becomes exactly one table-qualified predicate, so a tree always runs
//! as a single query.

use sea_orm::{
    Condition, Value,
    sea_query::{Expr, IntoColumnRef, SimpleExpr},
};

use crate::entity::{member, team};

/// Columns a filter may reference on the `member LEFT JOIN team` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    MemberId,
    MemberUsername,
    MemberAge,
    TeamName,
}

impl FilterField {
    /// Whether the column lives on the joined `team` table.
    #[must_use]
    pub const fn is_team_field(self) -> bool {
        matches!(self, Self::TeamName)
    }

    /// Table-qualified column reference, e.g. `"member"."age"`.
    #[must_use]
    pub fn column(self) -> SimpleExpr {
        let column_ref = match self {
            Self::MemberId => (member::Entity, member::Column::Id).into_column_ref(),
            Self::MemberUsername => (member::Entity, member::Column::Username).into_column_ref(),
            Self::MemberAge => (member::Entity, member::Column::Age).into_column_ref(),
            Self::TeamName => (team::Entity, team::Column::Name).into_column_ref(),
        };
        SimpleExpr::Column(column_ref)
    }
}

/// Boolean filter over a member row and its (possibly missing) team.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// Matches every row. Executors add no WHERE clause for it.
    All,
    Eq(FilterField, Value),
    /// Inclusive on both ends.
    Between(FilterField, Value, Value),
    Gte(FilterField, Value),
    Lte(FilterField, Value),
    And(Vec<FilterExpr>),
}

impl FilterExpr {
    /// AND of `self` and `other`, dropping `All` operands and flattening
    /// nested conjunctions.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::All, expr) | (expr, Self::All) => expr,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), expr) => {
                left.push(expr);
                Self::And(left)
            }
            (expr, Self::And(right)) => {
                let mut parts = Vec::with_capacity(right.len() + 1);
                parts.push(expr);
                parts.extend(right);
                Self::And(parts)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }

    /// AND of every expression; `All` for an empty input.
    pub fn all_of(exprs: impl IntoIterator<Item = Self>) -> Self {
        exprs.into_iter().fold(Self::All, Self::and)
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether evaluating the filter needs the `team` join.
    #[must_use]
    pub fn references_team(&self) -> bool {
        match self {
            Self::All => false,
            Self::Eq(field, _)
            | Self::Between(field, _, _)
            | Self::Gte(field, _)
            | Self::Lte(field, _) => field.is_team_field(),
            Self::And(parts) => parts.iter().any(Self::references_team),
        }
    }

    /// Number of atomic predicates in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::All => 0,
            Self::And(parts) => parts.iter().map(Self::leaf_count).sum(),
            _ => 1,
        }
    }

    /// Compile into a Sea-ORM condition.
    #[must_use]
    pub fn into_condition(self) -> Condition {
        self.add_to(Condition::all())
    }

    fn add_to(self, condition: Condition) -> Condition {
        match self {
            Self::All => condition,
            Self::And(parts) => parts
                .into_iter()
                .fold(condition, |condition, part| part.add_to(condition)),
            Self::Eq(field, value) => condition.add(Expr::expr(field.column()).eq(value)),
            Self::Between(field, low, high) => {
                condition.add(Expr::expr(field.column()).between(low, high))
            }
            Self::Gte(field, value) => condition.add(Expr::expr(field.column()).gte(value)),
            Self::Lte(field, value) => condition.add(Expr::expr(field.column()).lte(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn sql_for(filter: FilterExpr) -> String {
        member::Entity::find()
            .filter(filter.into_condition())
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_and_drops_all_operands() {
        let leaf = FilterExpr::Gte(FilterField::MemberAge, 10.into());
        assert_eq!(FilterExpr::All.and(leaf.clone()), leaf);
        assert_eq!(leaf.clone().and(FilterExpr::All), leaf);
        assert_eq!(FilterExpr::all_of([]), FilterExpr::All);
    }

    #[test]
    fn test_and_flattens_nested_conjunctions() {
        let a = FilterExpr::Gte(FilterField::MemberAge, 10.into());
        let b = FilterExpr::Lte(FilterField::MemberAge, 20.into());
        let c = FilterExpr::Eq(FilterField::TeamName, "teamA".into());

        let combined = FilterExpr::all_of([a.clone(), b.clone(), c.clone()]);
        assert_eq!(combined, FilterExpr::And(vec![a, b, c]));
        assert_eq!(combined.leaf_count(), 3);
    }

    #[test]
    fn test_references_team() {
        assert!(!FilterExpr::All.references_team());
        assert!(!FilterExpr::Eq(FilterField::MemberUsername, "member1".into()).references_team());
        assert!(
            FilterExpr::Gte(FilterField::MemberAge, 1.into())
                .and(FilterExpr::Eq(FilterField::TeamName, "teamB".into()))
                .references_team()
        );
    }

    #[test]
    fn test_leaves_compile_to_qualified_predicates() {
        let sql = sql_for(FilterExpr::all_of([
            FilterExpr::Eq(FilterField::MemberUsername, "member1".into()),
            FilterExpr::Gte(FilterField::MemberAge, 35.into()),
            FilterExpr::Lte(FilterField::MemberAge, 40.into()),
        ]));
        assert!(sql.contains(r#""member"."username" = 'member1'"#), "{sql}");
        assert!(sql.contains(r#""member"."age" >= 35"#), "{sql}");
        assert!(sql.contains(r#""member"."age" <= 40"#), "{sql}");
        assert_eq!(sql.matches(" AND ").count(), 2, "{sql}");
    }

    #[test]
    fn test_between_compiles() {
        let sql = sql_for(FilterExpr::Between(
            FilterField::MemberAge,
            20.into(),
            30.into(),
        ));
        assert!(sql.contains(r#""member"."age" BETWEEN 20 AND 30"#), "{sql}");
    }

    #[test]
    fn test_team_field_is_qualified_with_team_table() {
        let sql = sql_for(FilterExpr::Eq(FilterField::TeamName, "teamB".into()));
        assert!(sql.contains(r#""team"."name" = 'teamB'"#), "{sql}");
    }
}
