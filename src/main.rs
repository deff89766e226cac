use anyhow::Result;
use clap::Parser;
use config::Config;
use log::{error, info};
use persistence::get_db_context;
use service::create_service_context;
use tokio::spawn;

mod client;
mod config;
mod constants;
mod persistence;
mod service;
mod util;
mod web;

// MAIN
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Parse command line arguments and env vars with clap
    let conf = Config::parse();

    let db = get_db_context(&conf).await?;
    let service_context = create_service_context(conf.clone(), db).await?;

    if conf.terminal_client {
        let api_base_url = format!("{}/api", conf.http_listen_url());
        spawn(async move {
            if let Err(e) = client::terminal::run_terminal_client(&api_base_url).await {
                error!("Terminal client stopped with error: {e}");
            }
        });
    }

    info!("HTTP Server Listening on {}", conf.http_listen_url());
    if let Err(e) = web::rocket_main(service_context).launch().await {
        error!("Web server stopped with error: {e}");
    }

    Ok(())
}
