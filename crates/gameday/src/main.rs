mod bootstrap;

use std::time::Duration;

use anyhow::Result;
use gameday_core::models::FilterSelection;
use gameday_core::settings::Settings;
use gameday_core::time_utils::{resolve_timezone, today_in};
use gameday_runtime::orchestrator::ReloadOrchestrator;
use gameday_runtime::session::{resolve_season_range, DashboardView};
use gameday_runtime::table_manager::TableManager;
use gameday_ui::app::{App, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = match settings.view.as_str() {
        "report" => settings.log_file.clone(),
        _ => Some(
            settings
                .log_file
                .clone()
                .unwrap_or_else(bootstrap::default_log_file),
        ),
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Game Day Insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data file: {}, View: {}, Theme: {}, Timezone: {}",
        settings.data_file.display(),
        settings.view,
        settings.theme,
        settings.timezone
    );

    let timezone = resolve_timezone(&settings.timezone);
    let criterion = settings.explore_criterion()?;
    let manager = TableManager::load(&settings.data_file)?;

    match settings.view.as_str() {
        "report" => {
            let table = manager.table();
            let range = resolve_season_range(
                &table,
                settings.start_season.as_deref(),
                settings.end_season.as_deref(),
            )?;
            let selection = FilterSelection::new(range)
                .with_criterion(criterion)
                .with_opponent(settings.opponent.clone());
            let view = DashboardView::build(&table, &selection, today_in(timezone));
            println!("{}", serde_json::to_string_pretty(&view)?);
        }

        _ => {
            tracing::info!("Starting dashboard...");

            let app = App::new(
                manager.table(),
                manager.metadata().clone(),
                AppConfig {
                    theme_name: settings.theme.clone(),
                    timezone,
                    start_season: settings.start_season.clone(),
                    end_season: settings.end_season.clone(),
                    criterion,
                    opponent: settings.opponent.clone(),
                },
            )?;

            let orchestrator = ReloadOrchestrator::new(
                Duration::from_secs(u64::from(settings.reload_interval)),
                manager,
            );
            let (rx, handle) = orchestrator.start();

            // Ctrl+C is also caught at the OS level for signals delivered
            // outside raw mode.
            tokio::select! {
                result = app.run(rx, &handle) => {
                    handle.abort();
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; stopping reload task");
                    handle.abort();
                }
            }
        }
    }

    Ok(())
}
