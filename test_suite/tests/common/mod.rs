#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use membersearch::{
    FilterExpr, JoinSpec, MemberTeamDto, PageRequest, QueryExecutor, SeaOrmExecutor,
    audit::FixedAuditor,
    entity::{member, team},
    fixtures,
    repository::{member_repository, team_repository},
};
use sea_orm::{Database, DatabaseConnection, DbErr};

pub const ACTOR: &str = "tester";

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    fixtures::create_tables(&db).await?;
    Ok(db)
}

pub fn auditor() -> FixedAuditor {
    FixedAuditor::new(ACTOR)
}

pub struct Teams {
    pub team_a: team::Model,
    pub team_b: team::Model,
}

/// teamA: member1 (10), member2 (20); teamB: member3 (30), member4 (40)
pub async fn seed_members(db: &DatabaseConnection) -> Teams {
    let auditor = auditor();
    let team_a = team_repository::save(db, &auditor, "teamA").await.unwrap();
    let team_b = team_repository::save(db, &auditor, "teamB").await.unwrap();

    for (name, age, team) in [
        ("member1", 10, &team_a),
        ("member2", 20, &team_a),
        ("member3", 30, &team_b),
        ("member4", 40, &team_b),
    ] {
        member_repository::save(db, &auditor, name, age, Some(team.id))
            .await
            .unwrap();
    }

    Teams { team_a, team_b }
}

/// The four seeded members plus member5 (50) without a team.
pub async fn seed_members_with_loner(db: &DatabaseConnection) -> Teams {
    let teams = seed_members(db).await;
    member_repository::save(db, &auditor(), "member5", 50, None)
        .await
        .unwrap();
    teams
}

pub fn usernames(rows: &[MemberTeamDto]) -> Vec<&str> {
    rows.iter().map(|row| row.username.as_str()).collect()
}

/// Delegates to [`SeaOrmExecutor`] and records every call.
pub struct RecordingExecutor<'c> {
    inner: SeaOrmExecutor<'c, DatabaseConnection>,
    fetches: AtomicUsize,
    counts: AtomicUsize,
    joins: Mutex<Vec<JoinSpec>>,
}

impl<'c> RecordingExecutor<'c> {
    pub fn new(db: &'c DatabaseConnection) -> Self {
        Self {
            inner: SeaOrmExecutor::new(db),
            fetches: AtomicUsize::new(0),
            counts: AtomicUsize::new(0),
            joins: Mutex::new(Vec::new()),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn counts(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    pub fn joins(&self) -> Vec<JoinSpec> {
        self.joins.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor<'_> {
    async fn fetch_rows(
        &self,
        filter: &FilterExpr,
        page: Option<&PageRequest>,
    ) -> Result<Vec<MemberTeamDto>, DbErr> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_rows(filter, page).await
    }

    async fn fetch_members(
        &self,
        filter: &FilterExpr,
        join: JoinSpec,
    ) -> Result<Vec<member::Model>, DbErr> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.joins.lock().unwrap().push(join);
        self.inner.fetch_members(filter, join).await
    }

    async fn count(&self, filter: &FilterExpr, join: JoinSpec) -> Result<u64, DbErr> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.joins.lock().unwrap().push(join);
        self.inner.count(filter, join).await
    }
}

/// Fetches normally, but every count query fails.
pub struct FailingCountExecutor<'c> {
    inner: SeaOrmExecutor<'c, DatabaseConnection>,
}

impl<'c> FailingCountExecutor<'c> {
    pub fn new(db: &'c DatabaseConnection) -> Self {
        Self {
            inner: SeaOrmExecutor::new(db),
        }
    }
}

#[async_trait]
impl QueryExecutor for FailingCountExecutor<'_> {
    async fn fetch_rows(
        &self,
        filter: &FilterExpr,
        page: Option<&PageRequest>,
    ) -> Result<Vec<MemberTeamDto>, DbErr> {
        self.inner.fetch_rows(filter, page).await
    }

    async fn fetch_members(
        &self,
        filter: &FilterExpr,
        join: JoinSpec,
    ) -> Result<Vec<member::Model>, DbErr> {
        self.inner.fetch_members(filter, join).await
    }

    async fn count(&self, _filter: &FilterExpr, _join: JoinSpec) -> Result<u64, DbErr> {
        Err(DbErr::Custom("count unavailable".to_string()))
    }
}
