#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use crew_schedule::logging::init_logging;
    use crew_schedule::{IngestOptions, SchedulerConfig, http_api, parse_wide_csv_path};

    init_logging(None);

    let addr: SocketAddr = std::env::var("CREW_SCHEDULE_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = match std::env::var("CREW_SCHEDULE_CONFIG") {
        Ok(path) => SchedulerConfig::load(path)?,
        Err(_) => SchedulerConfig::default(),
    };
    let tasks = match std::env::var("CREW_SCHEDULE_CSV") {
        Ok(path) => {
            let options = IngestOptions {
                auto_chain: config.auto_chain,
            };
            parse_wide_csv_path(path, &options)?.tasks
        }
        Err(_) => Vec::new(),
    };

    println!("crew-schedule HTTP API listening on http://{addr}");
    http_api::serve(addr, http_api::AppState::new(tasks, config)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
