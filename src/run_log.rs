use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::Local;

/// Operator-facing run log: every line goes to stdout and, when a file is configured, is
/// appended to it as `[YYYY-MM-DD HH:MM:SS] message`.
#[derive(Debug, Clone)]
pub struct RunLogger {
    file: Option<PathBuf>,
}

impl RunLogger {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn format_line(message: &str) -> String {
        format!("[{}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message)
    }

    /// Logs a durable status line. A failing log file never aborts the caller.
    pub fn log(&self, message: &str) {
        let line = Self::format_line(message);
        println!("{}", line);

        if let Some(path) = &self.file {
            if let Err(e) = append_line(path, &line) {
                println!("Error writing to log file: {}", e);
                log::warn!("log file {} is not writable: {}", path.display(), e);
            }
        }
    }

    /// Prints a transient status on the current console line. Never written to the log file.
    pub fn status(&self, message: &str) {
        print!("{}\r", message);
        let _ = io::stdout().flush();
    }
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}
