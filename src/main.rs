use drowsiness_monitor::config::Config;
use drowsiness_monitor::estimator::DrowsinessEstimator;
use drowsiness_monitor::logging::{init_tracing, LogConfig};
use drowsiness_monitor::replay::{self, ReplaySession};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig {
        log_level: config.log_level.clone(),
        enable_file_logs: config.enable_file_logs,
        log_dir: config.log_dir.clone(),
    });
    tracing::info!(input = ?config.replay.input, "Starting drowsiness-monitor replay");

    if let Err(e) = config.estimator.validate() {
        panic!("FATAL: invalid estimator config: {e}");
    }

    let input = replay::open_input(config.replay.input.as_deref())
        .await
        .expect("Failed to open replay input");

    let mut session = ReplaySession::new(
        DrowsinessEstimator::new(config.estimator.clone()),
        config.replay.highlight_hold_ms,
    );

    let outcome = tokio::select! {
        res = replay::run(input, tokio::io::stdout(), &mut session, config.replay.channel_capacity) => Some(res),
        _ = shutdown_signal() => None,
    };

    match outcome {
        Some(Ok(summary)) => tracing::info!(?summary, "Replay finished"),
        Some(Err(e)) => {
            tracing::error!(error = %e, "Replay failed");
            std::process::exit(1);
        }
        None => tracing::info!(summary = ?session.summary(), "Replay interrupted"),
    }

    let counts = session.estimator().counts();
    tracing::info!(
        drowsy = counts.drowsy,
        yawn = counts.yawn,
        sleep = counts.sleep,
        "Shutdown complete"
    );
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}
