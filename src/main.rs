//! Planner Bundler - packages the Smart Class Planner for Windows.
//!
//! Prepares the Python environment, bundles the application with PyInstaller
//! and builds the Inno Setup installer, stopping at the first fatal stage.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match planner_bundler::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
