//! Member search API server.
//!
//! ```bash
//! SEED_SAMPLE_DATA=true cargo run --bin membersearch
//! ```
//!
//! Then visit:
//! - **API**: <http://localhost:3000/v2/members?team_name=teamA&size=5>
//! - **Documentation**: <http://localhost:3000/docs>

use membersearch::{
    AppConfig,
    audit::UuidAuditor,
    fixtures,
    routes::{self, AppState},
};
use sea_orm::{Database, DatabaseConnection};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "membersearch", description = "Member/team search"))]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("membersearch=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    let db: DatabaseConnection = Database::connect(&config.database_url).await?;
    fixtures::create_tables(&db).await?;
    if config.seed_sample_data {
        fixtures::init_members(&db, &UuidAuditor).await?;
    }

    let state = AppState::new(db, config.paging);
    let (router, apidocs) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::router(state))
        .split_for_parts();
    let app = router
        .merge(Scalar::with_url("/docs", apidocs))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening, docs at /docs");
    axum::serve(listener, app).await?;
    Ok(())
}
