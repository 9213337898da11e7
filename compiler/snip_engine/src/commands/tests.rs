#![allow(clippy::unwrap_used, reason = "tests unwrap parsed options")]

use pretty_assertions::assert_eq;

use super::*;

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn parses_bindings_context_and_stats() {
    let options = parse_run_options(&strings(&[
        "script.snip",
        "--arg",
        "x=5",
        "--arg",
        "names=[\"a\",\"b\"]",
        "--context",
        "{\"user\":\"ada\"}",
        "--stats",
    ]))
    .unwrap();

    assert_eq!(options.input, "script.snip");
    assert!(options.stats);
    let names: Vec<&str> = options.bindings.iter().map(|b| &*b.name).collect();
    assert_eq!(names, vec!["x", "names"]);
    assert_eq!(options.bindings[0].value.as_number(), Some(5.0));
    assert_eq!(options.bindings[1].value.inspect(), "[\"a\", \"b\"]");
    assert_eq!(
        options.context.unwrap().inspect(),
        "{ user: \"ada\" }"
    );
}

#[test]
fn rejects_malformed_options() {
    let err = parse_run_options(&strings(&["s.snip", "--arg", "novalue"])).unwrap_err();
    assert!(matches!(err, CliError::MalformedArg(_)));

    let err = parse_run_options(&strings(&["s.snip", "--arg", "x={"])).unwrap_err();
    assert!(matches!(err, CliError::InvalidJson { .. }));
    assert!(err.to_string().starts_with("invalid JSON for argument 'x'"));

    let err = parse_run_options(&strings(&["s.snip", "--context"])).unwrap_err();
    assert_eq!(err.to_string(), "missing value for --context");

    let err = parse_run_options(&strings(&["s.snip", "--fast"])).unwrap_err();
    assert_eq!(err.to_string(), "unknown option '--fast'");

    let err = parse_run_options(&strings(&["--stats"])).unwrap_err();
    assert!(matches!(err, CliError::MissingFile));
}

#[test]
fn missing_file_is_reported() {
    let err = read_source("/definitely/not/here.snip").unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot find file '/definitely/not/here.snip'"
    );
}

#[tokio::test]
async fn successful_eval_prints_the_result() {
    let report = eval_source(&strings(&["return x * 2", "--arg", "x=21"]))
        .await
        .unwrap();
    assert_eq!(
        report,
        Report {
            stdout: "42\n".to_string(),
            stderr: String::new(),
            success: true,
        }
    );
}

#[tokio::test]
async fn scripts_see_the_cli_host() {
    let report = eval_source(&strings(&["return app.name"])).await.unwrap();
    assert_eq!(report.stdout, "\"snip\"\n");
}

#[tokio::test]
async fn failures_go_to_stderr() {
    let report = eval_source(&strings(&["throw new Error(\"boom\")"]))
        .await
        .unwrap();
    assert!(!report.success);
    assert!(report.stdout.is_empty());
    assert!(report.stderr.starts_with("[error] Failed to execute script"));
    assert!(report.stderr.contains("Error: boom"));
}

#[tokio::test]
async fn stats_are_appended() {
    let report = eval_source(&strings(&["return 1", "--stats"])).await.unwrap();
    assert!(report.stdout.starts_with("1\nExecution "));
    assert!(report.stdout.contains("status:     succeeded"));
}
