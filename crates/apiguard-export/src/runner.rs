//! Exporter process invocation.
//!
//! The exporter is an external toolchain command that writes the raw symbol
//! export for one target to a file. apiguard only defines the boundary: a
//! command template, a target name, an output path, and a deadline. The
//! invocation either produces a complete export file or fails loudly;
//! there is no retry (a failed build will not succeed on an identical
//! re-run, and a timeout already waited as long as a full module build).

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, debug_span};

use crate::error::ExportError;

/// How often the child process is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration for invoking the exporter command.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Command template as argv. `{target}` and `{output}` placeholders are
    /// substituted per invocation; when the template contains neither, the
    /// target name and output path are appended as trailing arguments.
    pub command: Vec<String>,

    /// Upper bound on one exporter invocation. Exceeding it kills the
    /// child and fails the invocation; there is no partial result.
    pub timeout: Duration,
}

impl ExporterConfig {
    /// Builds a config from a whitespace-split command template.
    ///
    /// Arguments with embedded spaces need a wrapper script; the template
    /// syntax is deliberately simple.
    pub fn from_template(template: &str, timeout: Duration) -> Self {
        Self {
            command: template.split_whitespace().map(str::to_owned).collect(),
            timeout,
        }
    }
}

/// Substitutes placeholders into the command template.
fn build_argv(
    command: &[String],
    target: &str,
    output: &Path,
) -> Vec<String> {
    let output_str = output.display().to_string();
    let mut argv: Vec<String> = command
        .iter()
        .map(|arg| {
            arg.replace("{target}", target).replace("{output}", &output_str)
        })
        .collect();
    if !command.iter().any(|arg| arg.contains("{target}")) {
        argv.push(target.to_owned());
    }
    if !command.iter().any(|arg| arg.contains("{output}")) {
        argv.push(output_str);
    }
    argv
}

/// Runs the exporter for one target, expecting it to write the export
/// document to `output`.
///
/// The child's stderr is captured as diagnostic output and included in the
/// error when the exporter fails or times out. Stdout is discarded: the
/// contract is the output file, not a pipe.
pub(crate) fn run_exporter(
    config: &ExporterConfig,
    target: &str,
    output: &Path,
) -> Result<(), ExportError> {
    let _span = debug_span!("run_exporter", target = %target).entered();

    let argv = build_argv(&config.command, target, output);
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| ExportError::unavailable("empty exporter command"))?;
    debug!(program = %program, args = ?args, "exporter.spawn");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| {
            ExportError::unavailable(format!(
                "failed to spawn exporter `{program}`: {err}"
            ))
        })?;

    // Drain stderr on its own thread so a chatty exporter cannot fill the
    // pipe buffer and deadlock against our wait loop.
    let stderr = child.stderr.take();
    let drain = std::thread::spawn(move || {
        let mut diagnostic = String::new();
        if let Some(mut stderr) = stderr {
            let _ = stderr.read_to_string(&mut diagnostic);
        }
        diagnostic
    });

    let deadline = Instant::now() + config.timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                // Fatal for this invocation, not a silent partial result.
                let _ = child.kill();
                let _ = child.wait();
                let diagnostic = drain.join().unwrap_or_default();
                return Err(ExportError::unavailable(format!(
                    "exporter timed out after {:.0?}: {}",
                    config.timeout,
                    diagnostic.trim()
                )));
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    };

    let diagnostic = drain.join().unwrap_or_default();
    if !status.success() {
        return Err(ExportError::unavailable(format!(
            "exporter exited with {status}: {}",
            diagnostic.trim()
        )));
    }

    debug!(target = %target, "exporter.complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Config that runs `sh -c` with the given script and timeout.
    fn sh(script: &str, timeout: Duration) -> ExporterConfig {
        ExporterConfig {
            command: vec![
                "sh".to_string(),
                "-c".to_string(),
                script.to_string(),
            ],
            timeout,
        }
    }

    #[test]
    fn placeholders_are_substituted() {
        let command = vec![
            "exporter".to_string(),
            "--module".to_string(),
            "{target}".to_string(),
            "-o".to_string(),
            "{output}".to_string(),
        ];
        let argv = build_argv(&command, "Widgets", Path::new("/tmp/e.json"));
        assert_eq!(
            argv,
            vec!["exporter", "--module", "Widgets", "-o", "/tmp/e.json"]
        );
    }

    #[test]
    fn missing_placeholders_append_trailing_args() {
        let command = vec!["exporter".to_string()];
        let argv = build_argv(&command, "Widgets", Path::new("/tmp/e.json"));
        assert_eq!(argv, vec!["exporter", "Widgets", "/tmp/e.json"]);
    }

    #[test]
    fn successful_exporter_writes_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("export.json");
        let config =
            sh("printf '{}' > {output}", Duration::from_secs(10));

        run_exporter(&config, "M", &output).expect("exporter should succeed");
        assert!(output.exists());
    }

    #[test]
    fn nonzero_exit_reports_unavailable_with_diagnostics() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("export.json");
        let config =
            sh("echo boom >&2; exit 3", Duration::from_secs(10));

        let err = run_exporter(&config, "M", &output)
            .expect_err("exporter should fail");
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn timeout_kills_the_child() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("export.json");
        let config = sh("sleep 30", Duration::from_millis(200));

        let started = Instant::now();
        let err = run_exporter(&config, "M", &output)
            .expect_err("exporter should time out");
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("timed out"));
        // The invocation must end with the timeout, not the child's sleep.
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn unspawnable_program_reports_unavailable() {
        let config = ExporterConfig {
            command: vec!["/nonexistent/exporter-binary".to_string()],
            timeout: Duration::from_secs(1),
        };
        let err = run_exporter(&config, "M", Path::new("/tmp/out.json"))
            .expect_err("spawn should fail");
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[test]
    fn empty_command_is_rejected() {
        let config = ExporterConfig {
            command: Vec::new(),
            timeout: Duration::from_secs(1),
        };
        let err = run_exporter(&config, "M", Path::new("/tmp/out.json"))
            .expect_err("empty command should fail");
        assert!(err.is_unavailable());
    }

    #[test]
    fn from_template_splits_on_whitespace() {
        let config = ExporterConfig::from_template(
            "exporter  --module {target}",
            Duration::from_secs(1),
        );
        assert_eq!(config.command, vec!["exporter", "--module", "{target}"]);
    }
}
