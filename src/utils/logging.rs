//! Logger setup.

use chrono::Local;
use env_logger::Env;
use std::io::Write;

/// Initialize the global logger
///
/// Lines are written as `<timestamp> - <message>`. `RUST_LOG` still
/// overrides the level picked here.
pub fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.args()
            )
        })
        .init();
}
