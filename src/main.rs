//! Minimall admin server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::path::PathBuf;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpServer, Result as ActixResult, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use minimall_admin_lib::api;
use minimall_admin_lib::config::Config;
use minimall_admin_lib::db::DbPool;
use minimall_admin_lib::middleware::{AdminPageGate, AdminRoleGate, ApiAuthGate, RequestLogger};
use minimall_admin_lib::services::Storage;

/// SPA fallback handler - serves the admin panel shell for client-side
/// routing. The page gate has already run by the time this executes.
async fn spa_fallback(static_dir: web::Data<PathBuf>) -> ActixResult<NamedFile> {
    Ok(NamedFile::open(static_dir.join("index.html"))?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL, MALL_TOKEN_SECRET and S3 credentials must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Minimall Admin Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    if config.auth.used_fallback_secret {
        // Production validation refuses this combination, so only
        // development deployments ever reach here.
        warn!(
            "MALL_TOKEN_SECRET is not set - admin session tokens are signed with the \
             development fallback secret"
        );
    }

    // Initialize database
    let pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");
    info!("Database connection established");

    // Run migrations
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    info!("Database migrations complete");

    // Initialize S3 storage for product images
    let storage = Storage::new(&config.storage)
        .await
        .expect("Failed to initialize S3 storage");

    // Prepare shared state
    let bind_address = config.bind_address();
    let static_dir = config.static_dir.clone();
    let max_image_size = config.max_image_size;
    let is_development = config.is_development();

    if static_dir.is_some() {
        info!("Admin panel serving enabled from {:?}", static_dir);
    }

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
                .supports_credentials()
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
                .supports_credentials()
                .max_age(3600)
        };

        let mut app = App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            // Cookie gate for /admin page navigation
            .wrap(AdminPageGate)
            // Add request logging middleware
            .wrap(RequestLogger)
            // Add shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(storage.clone()))
            // Multipart framing overhead on top of the image itself; the
            // upload handler enforces the real limit while streaming.
            .app_data(web::PayloadConfig::new(max_image_size * 2))
            // Session endpoints; /me wraps its own auth gate
            .service(web::scope("/api/admin/auth").configure(api::configure_auth_routes))
            // Image management behind both gates
            .service(
                web::scope("/api/admin/images")
                    .wrap(AdminRoleGate)
                    .wrap(ApiAuthGate)
                    .configure(api::configure_admin_image_routes),
            )
            // Health endpoints
            .service(web::scope("/api").configure(api::configure_health_routes))
            // Public image serving
            .configure(api::configure_public_image_routes);

        // Swagger UI in development
        if is_development {
            app = app.service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
            );
        }

        // Serve the admin panel when MALL_STATIC_DIR is set
        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(dir.clone()))
                // Hashed build assets
                .service(Files::new("/admin/assets", dir.join("assets")).prefer_utf8(true))
                // Admin panel shell for all other routes
                .default_service(web::route().to(spa_fallback));
        }

        app
    });

    // Set worker count
    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
