use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use nexus_commerce::{build_server, create_pool, run_migrations, AuthSettings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let invoice_dir: PathBuf = env::var("INVOICE_DIR")
        .unwrap_or_else(|_| "invoices".to_string())
        .into();
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");

    let pool = create_pool(&database_url);
    run_migrations(&pool);

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(pool, AuthSettings::new(jwt_secret), invoice_dir, &host, port)?.await
}
