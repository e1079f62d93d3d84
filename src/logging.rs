use indicatif::MultiProgress;
use std::io::{self, Write};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber. Call **once** near the start of `main`.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
/// `--verbose`. Log lines are written with `root` suspended so they never
/// tear a toast that is on screen.
pub fn init(verbose: bool, root: MultiProgress) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(move || SuspendedStderr { root: root.clone() })
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

/// Writes to stderr while the toast display root is cleared.
struct SuspendedStderr {
    root: MultiProgress,
}

impl Write for SuspendedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.root.suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.root.suspend(|| io::stderr().lock().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
