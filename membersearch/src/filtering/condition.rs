use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use utoipa::IntoParams;

/// Optional member search filters.
///
/// Every field is optional and an absent field places no constraint on the
/// result. Empty query values (`?age_goe=`) deserialize as absent.
///
/// ```rust,ignore
/// let condition = SearchCondition::new()
///     .with_team_name("teamB")
///     .with_age_goe(35)
///     .with_age_loe(40);
/// ```
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchCondition {
    /// Exact member username. Blank values are ignored.
    #[param(example = "member1")]
    #[serde(default)]
    pub username: Option<String>,
    /// Exact team name. Blank values are ignored.
    #[param(example = "teamA")]
    #[serde(default)]
    pub team_name: Option<String>,
    /// Minimum age (inclusive).
    #[param(example = 10)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub age_goe: Option<i32>,
    /// Maximum age (inclusive).
    #[param(example = 40)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub age_loe: Option<i32>,
}

impl SearchCondition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_username(self, username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_team_name(self, team_name: impl Into<String>) -> Self {
        Self {
            team_name: Some(team_name.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_age_goe(self, age_goe: i32) -> Self {
        Self {
            age_goe: Some(age_goe),
            ..self
        }
    }

    #[must_use]
    pub fn with_age_loe(self, age_loe: i32) -> Self {
        Self {
            age_loe: Some(age_loe),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_only_requested_fields() {
        let condition = SearchCondition::new().with_team_name("teamB").with_age_goe(35);
        assert_eq!(condition.username, None);
        assert_eq!(condition.team_name.as_deref(), Some("teamB"));
        assert_eq!(condition.age_goe, Some(35));
        assert_eq!(condition.age_loe, None);
    }

    #[test]
    fn test_deserialize_empty_numbers_as_absent() {
        let condition: SearchCondition =
            serde_json::from_str(r#"{"username": "member1", "age_goe": "", "age_loe": "40"}"#)
                .unwrap();
        assert_eq!(condition.username.as_deref(), Some("member1"));
        assert_eq!(condition.age_goe, None);
        assert_eq!(condition.age_loe, Some(40));
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let condition: SearchCondition = serde_json::from_str("{}").unwrap();
        assert_eq!(condition, SearchCondition::default());
    }
}
