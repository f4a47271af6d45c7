// Periodic dashboard refresh - pulls latest reading and history into the session
use crate::application::activity_sink::{ActivitySink, Severity};
use crate::domain::sensor::Timescale;
use crate::presentation::app_state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// One refresh cycle. An explicit timescale becomes the selection before
/// anything is fetched. Failures are reported to the activity log, never returned.
pub async fn refresh_once(state: &AppState, timescale: Option<Timescale>) {
    let timescale = {
        let mut session = state.session.lock().await;
        if let Some(t) = timescale {
            session.select_timescale(t);
        }
        session.timescale()
    };
    let device_ip = state.device_ip.as_deref();

    let (latest, history) = tokio::join!(
        state.sensor_service.latest(device_ip),
        state
            .sensor_service
            .history(device_ip, timescale, state.history_limit),
    );

    // the lock is only taken once both fetches finished
    let mut session = state.session.lock().await;

    match latest {
        Ok(Some(reading)) => session.apply_latest(reading),
        Ok(None) => state
            .activity
            .alert("No data found for any device", Severity::Warning),
        Err(e) => {
            tracing::warn!("Latest reading fetch failed: {}", e);
            state.activity.alert("Unable to reach the API", Severity::Error);
        }
    }

    match history {
        // selection changed while this refresh was in flight
        Ok(_) if session.timescale() != timescale => {
            tracing::debug!(
                "Dropping stale {} history, {} is selected",
                timescale,
                session.timescale()
            );
        }
        Ok(history) => session.apply_history(history, timescale),
        Err(e) => {
            tracing::warn!("History fetch failed: {}", e);
            state
                .activity
                .alert("Error fetching historical data", Severity::Error);
        }
    }
}

/// Spawns a refresh per tick. Slow refreshes may overlap; the session lock serialises them.
pub fn spawn_auto_refresh(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let state = state.clone();
            tokio::spawn(async move {
                refresh_once(&state, None).await;
            });
        }
    })
}
