mod app;

use anyhow::Result;
use log::info;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Gridterm");
    info!("Esc quits, F1 toggles frame statistics, F5 forces a resize");

    // Load configuration
    let config = gridterm_core::Config::load(None)?;
    info!("Loaded configuration: {:?}", config);

    // Create and run the application
    let app = app::App::new(config)?;
    app.run()?;

    Ok(())
}
