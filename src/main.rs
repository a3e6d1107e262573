use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use fieldtrack::api::{self, admin, helpers, middleware as api_middleware, mobile, owner, seed};
use fieldtrack::app_state::AppState;
use fieldtrack::config::Config;
use fieldtrack::database::{self, models, schema, types};
use fieldtrack::errors::ErrorResponse;
use fieldtrack::services::{auth::AuthService, dashboard};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let db = database::connect().await?;
    schema::create_tables(&db)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to create tables: {}", e)))?;

    let auth = AuthService::from_config(&config)
        .map_err(|e| std::io::Error::other(format!("Failed to initialise auth: {}", e)))?;

    #[derive(OpenApi)]
    #[openapi(
        paths(
            // Admin
            admin::get_system_stats,
            admin::get_system_logs,
            admin::get_broadcasts,
            admin::post_broadcast,
            admin::get_owners,
            admin::patch_owner_subscription,
            // Owner
            owner::get_live_dashboard,
            owner::get_employees,
            owner::post_employee,
            owner::get_shops,
            owner::post_shop,
            // Mobile
            mobile::mobile_auth,
            mobile::get_me,
            mobile::post_duty,
            mobile::post_location,
            mobile::post_collection,
            mobile::get_active_broadcasts,
            // Seed
            seed::seed_admin,
        ),
        components(
            schemas(
                // --- Models ---
                models::shops::Model,
                models::broadcasts::Model,
                types::Role,
                types::LogLevel,
                types::SubscriptionStatus,

                // --- DTOs ---
                ErrorResponse,
                helpers::UserView,
                admin::SystemStats,
                admin::SystemLogView,
                admin::LogActor,
                admin::CreateBroadcastRequest,
                admin::OwnerOverview,
                admin::UpdateSubscriptionRequest,
                owner::CreateEmployeeRequest,
                owner::CreateShopRequest,
                mobile::AuthRequest,
                mobile::AuthResponse,
                mobile::DutyRequest,
                mobile::DutyResponse,
                mobile::LocationPing,
                mobile::LocationAck,
                mobile::CollectionRequest,
                mobile::CollectionReceipt,
                seed::SeedResponse,

                // --- Live dashboard ---
                dashboard::LiveDashboard,
                dashboard::EmployeePosition,
                dashboard::CollectionPoint,
                dashboard::ShopSummary,
                dashboard::EmployeeSummary,
            )
        ),
        tags(
            (name = "Admin", description = "Platform administration: stats, system log, broadcasts, owners"),
            (name = "Owner", description = "Owner dashboard, employees and shops"),
            (name = "Mobile", description = "Endpoints used by the employee mobile app"),
            (name = "Seed", description = "Deployment bootstrap")
        )
    )]
    struct ApiDoc;

    let host = config.host.clone();
    let port = config.port;
    let workers = config.effective_workers();
    let body_limit = config.effective_max_body_bytes();

    log::info!("Starting FieldTrack at http://{}:{} with {} workers", host, port, workers);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    let state = AppState { db, config, auth };

    HttpServer::new(move || {
        App::new()
            .wrap(api_middleware::Authentication)
            .wrap(api_middleware::RequestId)
            .wrap(middleware::NormalizePath::new(middleware::TrailingSlash::MergeOnly))
            .wrap(middleware::Logger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .app_data(helpers::json_config(body_limit))
            .app_data(helpers::query_config())
            .configure(api::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
