use clap::Parser;
use postbox::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    postbox::init_tracing();
    postbox::run(config).await
}
