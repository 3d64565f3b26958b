//! daprbundle - offline release bundler for Dapr.
//!
//! Downloads the runtime, dashboard and CLI release archives for one
//! OS/architecture pair, saves the runtime container image and packages
//! everything into a single archive.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match daprbundle::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            println!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
