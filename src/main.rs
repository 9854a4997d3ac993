//! Interval Timer - A state-managed HTTP server for interval workouts
//! 
//! This is the main entry point for the interval-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use interval_timer::{
    config::Config,
    state::{AppState, Workout},
    api::create_router,
    tasks::tick_driver_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("interval_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting interval-timer server v1.0.0");
    info!("Configuration: host={}, port={}, tick={}ms, cue={:?}",
          config.host, config.port, config.tick_millis, config.cue);

    let cue = config.cue_player()?;

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.tick_period(),
        cue,
        Workout::default(),
    ));

    // Start the tick driver background task
    let tick_state = Arc::clone(&state);
    let tick_task = tokio::spawn(async move {
        tick_driver_task(tick_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /presets            - List presets");
    info!("  POST   /presets            - Create a preset");
    info!("  GET    /presets/:id        - Show a preset");
    info!("  PUT    /presets/:id        - Update a preset");
    info!("  DELETE /presets/:id        - Delete a preset");
    info!("  POST   /presets/:id/select - Select the active preset");
    info!("  GET    /session            - Current countdown");
    info!("  POST   /session/toggle     - Start or pause");
    info!("  POST   /session/reset      - Reset the session");
    info!("  GET    /status             - Status and uptime");
    info!("  GET    /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);
    
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    tick_task.abort();

    info!("Server shutdown complete");
    Ok(())
}
