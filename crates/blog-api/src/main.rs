//! Blog API server
//!
//! ```bash
//! cargo run -p blog-api
//! ```
//!
//! Configuration comes from environment variables, with `.env` loaded first
//! when present. `APP_ENV` picks the log format.

use blog_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Logging depends on APP_ENV, so config errors can only go to stderr
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        admin_user_id = config.blog.admin_user_id,
        website_url = %config.blog.website_url,
        "Starting blog API"
    );

    if let Err(e) = blog_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }

    info!("Server stopped");
}
