//! `PlantUML` subprocess invocation.
//!
//! Diagrams are rendered by the external `plantuml` executable in `-pipe`
//! mode: source text goes to the child's stdin, rendered bytes come back on
//! its stdout. The output format is selected with a flag (`-tsvg`, `-teps`),
//! the input encoding with `-charset`. PDF output is a two-step pipeline:
//! render EPS, then convert with `epstopdf`.
//!
//! One subprocess per diagram, invoked inline and sequentially during
//! post-processing. There is no timeout beyond the child's own exit.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::cache::{DiagramCache, DiagramKey};
use crate::consts::{DEFAULT_CHARSET, DEFAULT_EPSTOPDF, DEFAULT_PLANTUML};
use crate::format::OutputFormat;

/// Diagram rendering error.
///
/// All variants are non-fatal to the surrounding build: the processor
/// reports them as warnings and skips the affected diagram.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("renderer command is empty")]
    EmptyCommand,
    #[error("failed to start '{program}': {message}")]
    Spawn { program: String, message: String },
    #[error("'{program}' failed ({status}): {stderr}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("renderer produced no output")]
    EmptyOutput,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// External renderer configuration.
///
/// Both executables are configurable as full argv vectors, so wrappers like
/// `["java", "-jar", "plantuml.jar"]` work without a shell.
#[derive(Debug, Clone)]
pub struct PlantUmlCommand {
    plantuml: Vec<String>,
    epstopdf: Vec<String>,
    charset: String,
}

impl Default for PlantUmlCommand {
    fn default() -> Self {
        Self {
            plantuml: vec![DEFAULT_PLANTUML.to_owned()],
            epstopdf: vec![DEFAULT_EPSTOPDF.to_owned()],
            charset: DEFAULT_CHARSET.to_owned(),
        }
    }
}

impl PlantUmlCommand {
    /// Set the renderer argv (program plus leading arguments).
    #[must_use]
    pub fn plantuml(mut self, argv: Vec<String>) -> Self {
        self.plantuml = argv;
        self
    }

    /// Set the EPS-to-PDF converter argv.
    #[must_use]
    pub fn epstopdf(mut self, argv: Vec<String>) -> Self {
        self.epstopdf = argv;
        self
    }

    /// Set the charset passed via `-charset`.
    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Run the renderer in `-pipe` mode and return its stdout bytes.
    fn invoke(&self, source: &str, format: OutputFormat) -> Result<Vec<u8>, RenderError> {
        let (program, args) = self.plantuml.split_first().ok_or(RenderError::EmptyCommand)?;

        let mut command = Command::new(program);
        command
            .args(args)
            .arg("-pipe")
            .args(["-charset", &self.charset]);
        if let Some(flag) = format.pipe_flag() {
            command.arg(flag);
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!("rendering {} via '{program}'", format.as_str());
        let mut child = command.spawn().map_err(|e| RenderError::Spawn {
            program: program.clone(),
            message: e.to_string(),
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(source.as_bytes()) {
                // A child that exited before reading closes the pipe; its
                // exit status carries the actual failure.
                if err.kind() != io::ErrorKind::BrokenPipe {
                    return Err(RenderError::Io(err));
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(RenderError::Exit {
                program: program.clone(),
                status: output.status.to_string(),
                stderr: stderr_excerpt(&output.stderr),
            });
        }
        Ok(output.stdout)
    }

    /// Convert a rendered EPS file to PDF via `epstopdf`.
    fn convert_eps(&self, eps: &Path, pdf: &Path) -> Result<(), RenderError> {
        let (program, args) = self.epstopdf.split_first().ok_or(RenderError::EmptyCommand)?;

        tracing::debug!("converting {} via '{program}'", eps.display());
        let output = Command::new(program)
            .args(args)
            .arg(format!("--outfile={}", pdf.display()))
            .arg(eps)
            .output()
            .map_err(|e| RenderError::Spawn {
                program: program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RenderError::Exit {
                program: program.clone(),
                status: output.status.to_string(),
                stderr: stderr_excerpt(&output.stderr),
            });
        }
        if !pdf.exists() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(())
    }
}

fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "(no stderr)".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Cache-first diagram renderer.
///
/// Computes the content-addressed cache path for a diagram and invokes the
/// external renderer only when the file is absent. Entries are never
/// rewritten: a matching filename is a valid render of the same source.
#[derive(Debug)]
pub struct DiagramRenderer {
    command: PlantUmlCommand,
    cache: DiagramCache,
}

impl DiagramRenderer {
    /// Create a renderer writing into `cache`.
    #[must_use]
    pub fn new(command: PlantUmlCommand, cache: DiagramCache) -> Self {
        Self { command, cache }
    }

    /// The underlying cache.
    #[must_use]
    pub fn cache(&self) -> &DiagramCache {
        &self.cache
    }

    /// Render `source` at `format`, returning the cached file path.
    ///
    /// A present cache file short-circuits the subprocess entirely. PDF is
    /// derived by rendering EPS first and converting the result; both files
    /// end up in the cache.
    pub fn render(&self, source: &str, format: OutputFormat) -> Result<PathBuf, RenderError> {
        let key = DiagramKey { source, format };
        let path = self.cache.path_for(&key);
        if path.exists() {
            tracing::debug!("cache hit for {}", key.filename());
            return Ok(path);
        }

        if format == OutputFormat::Pdf {
            let eps = self.render(source, OutputFormat::Eps)?;
            self.command.convert_eps(&eps, &path)?;
            return Ok(path);
        }

        let bytes = self.command.invoke(source, format)?;
        if bytes.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        self.cache.store(&path, &bytes)?;
        tracing::debug!("rendered {}", key.filename());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_rejected() {
        let command = PlantUmlCommand::default().plantuml(Vec::new());
        let result = command.invoke("Alice -> Bob", OutputFormat::Png);
        assert!(matches!(result, Err(RenderError::EmptyCommand)));
    }

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let command =
            PlantUmlCommand::default().plantuml(vec!["plum-no-such-renderer".to_owned()]);
        let result = command.invoke("Alice -> Bob", OutputFormat::Png);
        match result {
            Err(RenderError::Spawn { program, .. }) => {
                assert_eq!(program, "plum-no-such-renderer");
            }
            other => panic!("expected Spawn error, got {other:?}"),
        }
    }

    #[test]
    fn test_stderr_excerpt_empty() {
        assert_eq!(stderr_excerpt(b""), "(no stderr)");
        assert_eq!(stderr_excerpt(b"  \n"), "(no stderr)");
    }

    #[test]
    fn test_stderr_excerpt_trims() {
        assert_eq!(stderr_excerpt(b"boom\n"), "boom");
    }
}
