use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` is honored; the crate's own
/// level follows `debug`.
pub fn init(debug: bool, json: bool) {
    let log_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("spa_devgate={log_level}")
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
