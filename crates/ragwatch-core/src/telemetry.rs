//! Centralised tracing initialisation for RAGWATCH binaries.
//!
//! Call [`init_tracing`] once at program start to configure the global
//! subscriber with an `EnvFilter`, a stderr layer and an optional log file.
//!
//! Safe to call more than once; subsequent calls are silently ignored
//! (the global subscriber can only be set once per process).

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// * `json`: when `true`, emit newline-delimited JSON log lines on stderr.
/// * `level`: default verbosity when `RUST_LOG` is not set.
/// * `log_file`: when set, also append plain log lines to this file.
///
/// Respects the `RUST_LOG` environment variable for fine-grained filtering.
///
/// The returned guard flushes the file writer on drop; hold it for the
/// lifetime of the program.
pub fn init_tracing(json: bool, level: Level, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let (file_writer, guard) = match log_file.and_then(open_log_file) {
        Some((writer, guard)) => (Some(writer), Some(guard)),
        None => (None, None),
    };

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .with(file_writer.map(file_layer))
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(file_writer.map(file_layer))
            .try_init()
            .ok();
    }

    guard
}

fn open_log_file(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    let file_name = path.file_name()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(dir)
        .ok()?;
    Some(tracing_appender::non_blocking(appender))
}

type FileLayer<S> = fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, NonBlocking>;

fn file_layer<S>(writer: NonBlocking) -> FileLayer<S> {
    fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
}
