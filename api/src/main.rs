mod ask_payload;
mod ask_response;
mod routes;

use askdocs::{Config, TypesenseClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!("Proxying {} (collection {})", config.base_url, config.collection);

    let client = TypesenseClient::new(&config)?;
    let app = routes::router(client);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
