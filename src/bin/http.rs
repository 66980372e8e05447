#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use course_planner::{AppConfig, http_api, logging};

    logging::init_logging("info")?;

    let addr: SocketAddr = std::env::var("COURSE_PLANNER_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = match std::env::var("COURSE_PLANNER_CONFIG") {
        Ok(path) if !path.trim().is_empty() => AppConfig::load(path.trim())?,
        _ => AppConfig::default(),
    };

    println!("course-planner HTTP API listening on http://{addr}");
    http_api::serve(addr, config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
