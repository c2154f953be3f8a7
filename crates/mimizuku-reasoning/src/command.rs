//! Adapter for reasoners that run as external programs

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use mimizuku_formats::{builtin_registry, RdfFormat};
use tracing::{debug, info};

use crate::engine::{ReasoningEngine, ReasoningOptions};
use crate::error::ReasonerError;
use crate::ontology::OntologyContext;

/// Argument replaced by the path of the serialized ontology
pub const INPUT_PLACEHOLDER: &str = "{input}";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs a reasoner program on a temporary copy of the ontology.
///
/// Output mentioning "inconsistent" or a non-zero exit is an error. When an
/// output format is set, stdout is parsed in it and added as inferred triples.
/// The inference options reach the program as `MIMIZUKU_INFER_PROPERTY_VALUES`
/// and `MIMIZUKU_INFER_DATA_PROPERTY_VALUES` (`1` or `0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReasoner {
    program: String,
    args: Vec<String>,
    input_format: String,
    output_format: Option<String>,
    timeout: Option<Duration>,
}

impl CommandReasoner {
    pub fn new<P: Into<String>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            input_format: RdfFormat::RdfXml.name().to_string(),
            output_format: None,
            timeout: None,
        }
    }

    /// Arguments; `{input}` marks where the ontology path goes, otherwise it is appended
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn input_format<S: Into<String>>(mut self, format: S) -> Self {
        self.input_format = format.into();
        self
    }

    pub fn output_format<S: Into<String>>(mut self, format: S) -> Self {
        self.output_format = Some(format.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command_line(&self, input: &Path) -> Vec<OsString> {
        let mut placed = false;
        let mut line: Vec<OsString> = self
            .args
            .iter()
            .map(|arg| {
                if arg == INPUT_PLACEHOLDER {
                    placed = true;
                    input.as_os_str().to_os_string()
                } else {
                    OsString::from(arg)
                }
            })
            .collect();
        if !placed {
            line.push(input.as_os_str().to_os_string());
        }
        line
    }

    fn run(&self, input: &Path, options: &ReasoningOptions) -> Result<Output, ReasonerError> {
        let mut child = Command::new(&self.program)
            .args(self.command_line(input))
            .env("MIMIZUKU_INFER_PROPERTY_VALUES", flag(options.infer_property_values))
            .env(
                "MIMIZUKU_INFER_DATA_PROPERTY_VALUES",
                flag(options.infer_data_property_values),
            )
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    ReasonerError::Unavailable(format!("{}: {}", self.program, err))
                }
                _ => ReasonerError::Io(err),
            })?;

        let Some(timeout) = self.timeout else {
            return Ok(child.wait_with_output()?);
        };

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);
        let deadline = Instant::now() + timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ReasonerError::Timeout(timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok(Output {
            status,
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }
}

impl ReasoningEngine for CommandReasoner {
    fn name(&self) -> &str {
        &self.program
    }

    fn reason(
        &self,
        context: &mut OntologyContext<'_>,
        options: &ReasoningOptions,
    ) -> Result<(), ReasonerError> {
        let registry = builtin_registry();
        let text = registry.serialize(context.graph(), &self.input_format)?;
        let extension = RdfFormat::from_name(&self.input_format)
            .map(RdfFormat::extension)
            .unwrap_or("rdf");

        let mut file = tempfile::Builder::new()
            .prefix("mimizuku-ontology-")
            .suffix(&format!(".{}", extension))
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        info!("Running {} on {}", self.program, file.path().display());
        let output = self.run(file.path(), options)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if let Some(line) = stdout
            .lines()
            .chain(stderr.lines())
            .find(|line| line.to_lowercase().contains("inconsistent"))
        {
            return Err(ReasonerError::Inconsistent(line.trim().to_string()));
        }
        if !output.status.success() {
            return Err(ReasonerError::Internal(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        if let Some(format) = &self.output_format {
            if !stdout.trim().is_empty() {
                let inferred = registry.parse_with_source(&stdout, format, &self.program)?;
                for triple in inferred {
                    context.add_inferred(triple);
                }
            }
        }
        debug!(
            "{} finished, {} inferred triples added",
            self.program,
            context.inferred_count()
        );
        Ok(())
    }
}

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "1"
    } else {
        "0"
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
