pub mod application;
pub mod auth;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod invoice;
pub mod models;
pub mod schema;

use std::path::PathBuf;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::OrderService;
use infrastructure::DieselOrderRepository;
use invoice::{FileInvoiceStore, PdfInvoiceRenderer};

pub use auth::AuthSettings;
pub use db::{create_pool, DbPool};

/// The workflow stack the HTTP layer is wired against.
pub type AppOrderService = OrderService<DieselOrderRepository, PdfInvoiceRenderer, FileInvoiceStore>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::users::sign_up,
        handlers::users::sign_in,
        handlers::users::list_users,
        handlers::categories::list_categories,
        handlers::categories::create_category,
        handlers::catalog::list_items,
        handlers::catalog::list_items_by_category,
        handlers::catalog::create_item,
        handlers::catalog::update_item,
        handlers::catalog::delete_item,
        handlers::catalog::search_items,
        handlers::addresses::list_addresses_by_user,
        handlers::addresses::create_address,
        handlers::addresses::update_address,
        handlers::addresses::delete_address,
        handlers::payments::list_payments,
        handlers::payments::get_payment,
        handlers::payments::create_payment,
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::get_order_items,
        handlers::orders::list_orders,
        handlers::orders::list_orders_by_customer,
        handlers::orders::list_orders_by_customer_range,
        handlers::orders::delete_order,
        handlers::reports::sales_by_range,
        handlers::reports::sales_by_year,
        handlers::reports::order_count_by_year,
    ),
    components(schemas(
        auth::Role,
        handlers::users::SignUpRequest,
        handlers::users::SignInRequest,
        handlers::users::UserInfo,
        handlers::categories::CreateCategoryRequest,
        models::category::Category,
        handlers::catalog::UpsertItemRequest,
        handlers::catalog::SearchRequest,
        handlers::catalog::ItemResponse,
        handlers::addresses::CreateAddressRequest,
        handlers::addresses::UpdateAddressRequest,
        models::address::Address,
        handlers::payments::CreatePaymentRequest,
        models::payment::Payment,
        handlers::orders::CreateOrderRequest,
        handlers::orders::CreateOrderLineRequest,
        handlers::orders::OrderResponse,
        handlers::orders::OrderLineResponse,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderSummaryRow,
        handlers::reports::SalesRow,
    ))
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    auth: AuthSettings,
    invoice_dir: PathBuf,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let store = FileInvoiceStore::new(invoice_dir)?;
    let service = web::Data::new(OrderService::new(
        DieselOrderRepository::new(pool.clone()),
        PdfInvoiceRenderer,
        store,
    ));
    let auth = web::Data::new(auth);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(service.clone())
            .app_data(auth.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/users")
                    .route("/sign-up", web::post().to(handlers::users::sign_up))
                    .route("/sign-in", web::post().to(handlers::users::sign_in))
                    .route("", web::get().to(handlers::users::list_users)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(handlers::categories::list_categories))
                    .route("", web::post().to(handlers::categories::create_category)),
            )
            .service(
                web::scope("/catalog")
                    .route("", web::get().to(handlers::catalog::list_items))
                    .route(
                        "/category/{category_id}",
                        web::get().to(handlers::catalog::list_items_by_category),
                    )
                    .route("/search", web::post().to(handlers::catalog::search_items))
                    .route("", web::post().to(handlers::catalog::create_item))
                    .route("/{id}", web::patch().to(handlers::catalog::update_item))
                    .route("/{id}", web::delete().to(handlers::catalog::delete_item)),
            )
            .service(
                web::scope("/addresses")
                    .route(
                        "/user/{user_id}",
                        web::get().to(handlers::addresses::list_addresses_by_user),
                    )
                    .route("", web::post().to(handlers::addresses::create_address))
                    .route("/{id}", web::patch().to(handlers::addresses::update_address))
                    .route("/{id}", web::delete().to(handlers::addresses::delete_address)),
            )
            .service(
                web::scope("/payments")
                    .route("", web::get().to(handlers::payments::list_payments))
                    .route("", web::post().to(handlers::payments::create_payment))
                    .route("/{id}", web::get().to(handlers::payments::get_payment)),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route(
                        "/customer/{customer_id}/range",
                        web::get().to(handlers::orders::list_orders_by_customer_range),
                    )
                    .route(
                        "/customer/{customer_id}",
                        web::get().to(handlers::orders::list_orders_by_customer),
                    )
                    .route("/{id}/items", web::get().to(handlers::orders::get_order_items))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}", web::delete().to(handlers::orders::delete_order)),
            )
            .service(
                web::scope("/reports")
                    .route("/sales/{year}", web::get().to(handlers::reports::sales_by_year))
                    .route("/sales", web::get().to(handlers::reports::sales_by_range))
                    .route(
                        "/orders/{year}",
                        web::get().to(handlers::reports::order_count_by_year),
                    ),
            )
            .service(
                SwaggerUi::new("/docs/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
