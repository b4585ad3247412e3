use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Points logging at a file, taking precedence over the config key.
pub const LOG_ENV_VAR: &str = "PERIPHERAL_STORE_LOG";

/// Initialize tracing with file output.
///
/// The terminal belongs to the TUI, so nothing is ever written to stdout.
/// Logging stays disabled unless `PERIPHERAL_STORE_LOG` or the `log_file`
/// config key names a file. `RUST_LOG` filters as usual (default `info`).
pub fn init_tracing(configured: Option<&Path>) {
    let Some(log_path) = env::var_os(LOG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| configured.map(Path::to_path_buf))
    else {
        return;
    };

    let Some(file) = open_log_file(&log_path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
}

/// Create the log file and any missing parent directories. Failures are
/// reported on stderr and leave logging disabled.
fn open_log_file(log_path: &Path) -> Option<File> {
    if let Some(parent) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if let Err(err) = fs::create_dir_all(parent) {
            eprintln!(
                "Warning: failed to create log directory {}: {err}",
                parent.display()
            );
            return None;
        }
    }

    match File::create(log_path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("Warning: failed to create log file {}: {err}", log_path.display());
            None
        }
    }
}
