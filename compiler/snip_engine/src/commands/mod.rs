//! Command handlers for the `snip` CLI.
//!
//! Argument parsing is kept apart from execution so both can be tested
//! without spawning the binary.

use snip_eval::Value;

use crate::{ArgumentBinding, Engine, ExecutionRecord};

/// Errors from parsing the command line or reading input.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing value for {flag}")]
    MissingValue { flag: &'static str },
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("expected name=<json> for --arg, got '{0}'")]
    MalformedArg(String),
    #[error("invalid JSON for {what}: {source}")]
    InvalidJson {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no script file given")]
    MissingFile,
    #[error("cannot find file '{0}'")]
    NotFound(String),
    #[error("permission denied reading '{0}'")]
    PermissionDenied(String),
    #[error("'{0}' contains invalid UTF-8 data")]
    InvalidUtf8(String),
    #[error("error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Options of `snip run` and `snip eval`.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Script path for `run`, inline source for `eval`.
    pub input: String,
    pub bindings: Vec<ArgumentBinding>,
    pub context: Option<Value>,
    /// Print the execution statistics view after the result.
    pub stats: bool,
}

/// Parse `<input> [--arg name=<json>]... [--context <json>] [--stats]`.
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, CliError> {
    let mut options = RunOptions::default();
    let mut input = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--arg" => {
                let spec = iter.next().ok_or(CliError::MissingValue { flag: "--arg" })?;
                options.bindings.push(parse_binding(spec)?);
            }
            "--context" => {
                let json = iter
                    .next()
                    .ok_or(CliError::MissingValue { flag: "--context" })?;
                options.context = Some(parse_json("--context", json)?);
            }
            "--stats" => options.stats = true,
            other if other.starts_with("--") => {
                return Err(CliError::UnknownOption(other.to_string()));
            }
            other => {
                if input.is_some() {
                    return Err(CliError::UnknownOption(other.to_string()));
                }
                input = Some(other.to_string());
            }
        }
    }

    options.input = input.ok_or(CliError::MissingFile)?;
    Ok(options)
}

fn parse_binding(spec: &str) -> Result<ArgumentBinding, CliError> {
    let Some((name, json)) = spec.split_once('=') else {
        return Err(CliError::MalformedArg(spec.to_string()));
    };
    if name.is_empty() {
        return Err(CliError::MalformedArg(spec.to_string()));
    }
    let value = parse_json(&format!("argument '{name}'"), json)?;
    Ok(ArgumentBinding::new(name, value))
}

fn parse_json(what: &str, json: &str) -> Result<Value, CliError> {
    serde_json::from_str::<serde_json::Value>(json)
        .map(|json| Value::from_json(&json))
        .map_err(|source| CliError::InvalidJson {
            what: what.to_string(),
            source,
        })
}

/// Read a script from disk.
pub fn read_source(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::NotFound(path.to_string()),
        std::io::ErrorKind::PermissionDenied => CliError::PermissionDenied(path.to_string()),
        std::io::ErrorKind::InvalidData => CliError::InvalidUtf8(path.to_string()),
        _ => CliError::Io {
            path: path.to_string(),
            source: e,
        },
    })
}

/// The `app` binding the CLI hands to scripts.
pub fn cli_host() -> Value {
    Value::object([
        ("name", Value::string("snip")),
        ("version", Value::string(env!("CARGO_PKG_VERSION"))),
    ])
}

/// What a finished execution prints.
#[derive(Debug, PartialEq, Eq)]
pub struct Report {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Execute `source` and render its outcome.
pub async fn execute_source(engine: &Engine, source: &str, options: RunOptions) -> Report {
    let record = engine
        .execute(source, options.bindings, options.context)
        .await;
    report(engine, &record, options.stats)
}

fn report(engine: &Engine, record: &ExecutionRecord, stats: bool) -> Report {
    let mut stdout = String::new();
    let mut stderr = String::new();
    let success = record.succeeded();

    match record.result() {
        Some(result) if success => {
            stdout.push_str(&result.render());
            stdout.push('\n');
        }
        Some(result) => {
            stderr.push_str(&result.render());
            stderr.push('\n');
        }
        None => {}
    }
    if stats {
        stdout.push_str(&engine.open_execution_stats(record));
    }

    Report {
        stdout,
        stderr,
        success,
    }
}

/// `snip run <file> ...`
pub async fn run_file(args: &[String]) -> Result<Report, CliError> {
    let options = parse_run_options(args)?;
    let source = read_source(&options.input)?;
    let engine = Engine::new(cli_host());
    Ok(execute_source(&engine, &source, options).await)
}

/// `snip eval '<source>' ...`
pub async fn eval_source(args: &[String]) -> Result<Report, CliError> {
    let mut options = parse_run_options(args)?;
    let source = std::mem::take(&mut options.input);
    let engine = Engine::new(cli_host());
    Ok(execute_source(&engine, &source, options).await)
}

#[cfg(test)]
mod tests;
