#[path = "cv-reader/app.rs"]
mod app;
#[path = "cv-reader/args.rs"]
mod args;
#[path = "cv-reader/logging.rs"]
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
