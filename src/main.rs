//! Binary entry point: load configuration, open the catalog store, kick off
//! first-launch seeding in the background, and drive the Ratatui event loop
//! until the user leaves.
use anyhow::Context;
use peripheral_store::logging::init_tracing;
use peripheral_store::{open_catalog, run_app, App, AppConfig, Navigator, RouteArgs, SeedTask};
use tracing::info;

/// Fatal initialization problems (unreadable config, no async runtime) are
/// returned to the terminal. Store failures are not: they only leave the
/// catalog empty.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(config.log_file.as_deref());

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let db_path = config.database_path()?;
    info!(path = %db_path.display(), "opening product store");

    let catalog = open_catalog(&db_path)?;
    let seeding = catalog
        .persistent
        .then(|| SeedTask::spawn(runtime.handle(), db_path));

    let mut navigator = Navigator::new();
    navigator.start(&config.start_route, &RouteArgs::new())?;

    let mut app = App::new(
        catalog.conn,
        catalog.products,
        navigator,
        runtime.handle().clone(),
        seeding,
    )?;
    run_app(&mut app, config.tick_rate())
}
