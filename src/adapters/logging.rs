//! Logger backend.
//!
//! `env_logger` formats timestamped, leveled lines; a [`TeeWriter`] sends
//! each line to the persistent log file and to stderr. `RUST_LOG` overrides
//! the default `info` level.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target, WriteStyle};

/// Writes every buffer to the log file and then to stderr.
pub struct TeeWriter {
    file: File,
}

impl TeeWriter {
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A full disk must not silence the console.
        let to_file = self.file.write_all(buf);
        io::stderr().write_all(buf)?;
        to_file.map(|()| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder
}

/// Install the global logger, appending to `log_path` and mirroring to the
/// console. If the file cannot be opened the logger is installed console-only
/// and the open error is returned in `Ok(Some(..))` so it can be logged.
pub fn init(log_path: &Path) -> anyhow::Result<Option<io::Error>> {
    let mut builder = builder();
    let open_error = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => {
            builder
                .target(Target::Pipe(Box::new(TeeWriter::new(file))))
                .write_style(WriteStyle::Never);
            None
        }
        Err(e) => {
            builder.target(Target::Stderr);
            Some(e)
        }
    };
    builder.try_init()?;
    Ok(open_error)
}
