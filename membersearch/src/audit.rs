//! # Auditing
//!
//! Every row records who created it, who touched it last, and when. Nothing
//! here runs implicitly: repositories call [`before_insert`] or
//! [`before_update`] on the active model right before writing it.
//!
//! ```rust,ignore
//! let mut team = team::ActiveModel::named("teamA");
//! audit::before_insert(&mut team, &UuidAuditor);
//! let team = team.insert(db).await?;
//! ```

use chrono::{DateTime, Utc};
use sea_orm::Set;
use uuid::Uuid;

use crate::entity::{member, team};

/// Supplies the actor recorded in `created_by` / `last_modified_by`.
pub trait AuditorProvider: Send + Sync {
    fn current_auditor(&self) -> String;
}

/// Records a fresh random UUID per write. Used when there is no
/// authenticated user to attribute changes to.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidAuditor;

impl AuditorProvider for UuidAuditor {
    fn current_auditor(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Always records the same actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedAuditor(pub String);

impl FixedAuditor {
    #[must_use]
    pub fn new(actor: impl Into<String>) -> Self {
        Self(actor.into())
    }
}

impl AuditorProvider for FixedAuditor {
    fn current_auditor(&self) -> String {
        self.0.clone()
    }
}

/// Active models that carry the four audit columns.
pub trait Auditable {
    /// Sets creation and modification columns alike.
    fn stamp_created(&mut self, actor: &str, now: DateTime<Utc>);

    /// Sets only `last_modified_by` / `last_modified_date`.
    fn stamp_modified(&mut self, actor: &str, now: DateTime<Utc>);
}

macro_rules! impl_auditable {
    ($($active_model:ty),+ $(,)?) => {
        $(
            impl Auditable for $active_model {
                fn stamp_created(&mut self, actor: &str, now: DateTime<Utc>) {
                    self.created_by = Set(actor.to_owned());
                    self.created_date = Set(now);
                    self.stamp_modified(actor, now);
                }

                fn stamp_modified(&mut self, actor: &str, now: DateTime<Utc>) {
                    self.last_modified_by = Set(actor.to_owned());
                    self.last_modified_date = Set(now);
                }
            }
        )+
    };
}

impl_auditable!(member::ActiveModel, team::ActiveModel);

/// Pre-insert hook.
pub fn before_insert<A: Auditable + ?Sized>(model: &mut A, auditor: &dyn AuditorProvider) {
    let actor = auditor.current_auditor();
    tracing::trace!(actor = %actor, "stamping created audit columns");
    model.stamp_created(&actor, Utc::now());
}

/// Pre-update hook.
pub fn before_update<A: Auditable + ?Sized>(model: &mut A, auditor: &dyn AuditorProvider) {
    let actor = auditor.current_auditor();
    tracing::trace!(actor = %actor, "stamping modified audit columns");
    model.stamp_modified(&actor, Utc::now());
}
