//! Locating and running the external recommendation engine

use std::{
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::instrument;

use crate::error::{AppError, AppResult};

const BUILD_HINT: &str = "Build it first with: cd cpp/build && cmake --build .";

/// Ordered list of candidate engine locations
///
/// Each entry is a path template. `{data_dir}` expands to the data directory
/// and `{exe_suffix}` to the platform executable suffix (`.exe` on Windows).
/// The first candidate that exists is used.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineLocator {
    templates: Vec<String>,
}

impl EngineLocator {
    pub fn new(templates: Vec<String>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Expands every template against `data_dir`, preserving order
    pub fn candidates(&self, data_dir: &Path) -> Vec<PathBuf> {
        let data_dir = data_dir.to_string_lossy();
        self.templates
            .iter()
            .map(|template| {
                PathBuf::from(
                    template
                        .replace("{data_dir}", &data_dir)
                        .replace("{exe_suffix}", std::env::consts::EXE_SUFFIX),
                )
            })
            .collect()
    }

    /// Returns the absolute path of the first existing candidate
    pub fn locate(&self, data_dir: &Path) -> AppResult<PathBuf> {
        let candidates = self.candidates(data_dir);

        for candidate in &candidates {
            if candidate.is_file() {
                return Ok(std::path::absolute(candidate)?);
            }
            tracing::debug!(path = %candidate.display(), "Engine candidate not present");
        }

        let searched: Vec<String> = candidates
            .iter()
            .map(|c| c.display().to_string())
            .collect();

        Err(AppError::EngineNotFound {
            hint: format!(
                "{} Searched: [{}]. Override with ENGINE_PATHS.",
                BUILD_HINT,
                searched.join(", ")
            ),
        })
    }
}

/// Runs the engine to completion
///
/// The child runs in the executable's own directory, with stderr merged into
/// stdout. Its output is logged line by line while it runs. There is no
/// timeout: a hung engine blocks the caller.
#[instrument(skip_all, fields(engine = %executable.display()))]
pub fn run(executable: &Path) -> AppResult<()> {
    let working_dir = executable.parent().unwrap_or_else(|| Path::new("."));
    tracing::info!(working_dir = %working_dir.display(), "Launching recommendation engine");

    let (reader, writer) = io::pipe()?;
    let mut child = {
        let mut command = Command::new(executable);
        command
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        // Dropping the command closes our copies of the write end, so the
        // reader sees EOF once the child exits.
        command.spawn()?
    };

    drain_output(reader);

    // std already retries `wait` on EINTR, so this arm only fires on
    // platforms that surface the interruption.
    let status = child.wait().map_err(|e| match e.kind() {
        io::ErrorKind::Interrupted => AppError::EngineInterrupted,
        _ => AppError::Io(e),
    })?;

    if !status.success() {
        tracing::error!(exit_code = ?status.code(), "Recommendation engine failed");
        return Err(AppError::EngineFailure {
            code: status.code(),
        });
    }

    tracing::info!("Recommendation engine completed successfully");
    Ok(())
}

/// Logs the merged output stream until EOF
///
/// Lines are decoded lossily. The stream is always read to the end: closing
/// it early would kill the engine with SIGPIPE on its next write.
fn drain_output(reader: impl Read) {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                tracing::info!(target: "engine", "{}", text.trim_end_matches(['\r', '\n']));
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read engine output, discarding the rest");
                if let Err(e) = io::copy(&mut reader, &mut io::sink()) {
                    tracing::warn!(error = %e, "Failed to drain engine output");
                }
                break;
            }
        }
    }
}
