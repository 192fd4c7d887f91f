//! CLI command implementations
//!
//! The CLI is a host for the engine: it reads schema and values files,
//! supplies a simulated submit effect and prints JSON responses. All form
//! semantics live in the library; commands only wire them together.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::{json, Value};
use tokio::runtime::Runtime;

use crate::form::{FormStateController, SubmitEffect, SubmitOutcome};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::render::render_form;
use crate::schema::{SchemaLoader, SchemaModel};
use crate::validation::{validate_form, FieldErrors};

use super::args::Command;
use super::config::Config;
use super::effect::effect_from_config;
use super::errors::{CliError, CliResult};
use super::io::{read_events, read_text, read_values, write_error, write_response};

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check { schema } => check(&schema),
        Command::Validate { schema, values } => validate(&schema, &values),
        Command::Render { schema, values } => render(&schema, values.as_deref()),
        Command::Submit {
            schema,
            values,
            config,
        } => submit(&schema, &values, config.as_deref()),
        Command::Session { config } => session(config.as_deref()),
    }
}

/// Load a schema and print it back in normalized form
pub fn check(schema_path: &Path) -> CliResult<()> {
    let schema = load_schema_file(schema_path)?;
    write_response(&mut io::stdout(), serde_json::to_value(&schema)?)
}

/// Validate a values file against a schema
pub fn validate(schema_path: &Path, values_path: &Path) -> CliResult<()> {
    let schema = load_schema_file(schema_path)?;
    let values = read_values(values_path)?;

    let errors = validate_form(&schema, &values);
    write_response(
        &mut io::stdout(),
        json!({ "valid": errors.is_valid(), "errors": errors }),
    )
}

/// Render a schema as text, with values and their errors when given
pub fn render(schema_path: &Path, values_path: Option<&Path>) -> CliResult<()> {
    let schema = load_schema_file(schema_path)?;

    let (values, errors) = match values_path {
        Some(path) => {
            let values = read_values(path)?;
            let errors = validate_form(&schema, &values);
            (values, errors)
        }
        None => (Default::default(), FieldErrors::new()),
    };

    let mut stdout = io::stdout();
    write!(stdout, "{}", render_form(&schema, &values, &errors))?;
    stdout.flush()?;
    Ok(())
}

/// Fill a form from a values file and run one submission
pub fn submit(schema_path: &Path, values_path: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = init_config(config_path)?;
    let schema = load_schema_file(schema_path)?;
    let values = read_values(values_path)?;

    let mut form = FormStateController::new(schema);
    for (field_id, value) in values {
        form.on_value_change(&field_id, value)?;
    }

    let runtime = build_runtime()?;
    let effect = effect_from_config(&config);
    let outcome = runtime.block_on(form.submit_with(&effect))?;

    write_response(&mut io::stdout(), outcome_json(&outcome))
}

/// Drive a form with line-delimited JSON events from stdin
pub fn session(config_path: Option<&Path>) -> CliResult<()> {
    let config = init_config(config_path)?;
    let runtime = build_runtime()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(stdin.lock(), &mut stdout, &config, &runtime)
}

/// Session loop over any reader/writer pair.
///
/// Events:
/// - `{"op":"load","schema":<object or string>}`
/// - `{"op":"change","field":<id>,"value":<string>}`
/// - `{"op":"submit"}`
/// - `{"op":"snapshot"}`
/// - `{"op":"render"}`
///
/// Each event gets exactly one response line. A bad event is answered with
/// an error line and the session continues.
pub fn run_session<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    config: &Config,
    runtime: &Runtime,
) -> CliResult<()> {
    let mut form = FormStateController::default();
    let effect = effect_from_config(config);

    for event in read_events(reader) {
        let result = event.and_then(|event| handle_event(&mut form, &effect, runtime, &event));

        match result {
            Ok(data) => write_response(writer, data)?,
            Err(e) => write_error(writer, e.code_str(), e.message())?,
        }
    }

    Ok(())
}

fn handle_event<E: SubmitEffect>(
    form: &mut FormStateController,
    effect: &E,
    runtime: &Runtime,
    event: &Value,
) -> CliResult<Value> {
    let op = event
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| CliError::invalid_request("event needs a string 'op'"))?;

    match op {
        "load" => {
            let raw = match event.get("schema") {
                Some(Value::String(text)) => text.clone(),
                Some(document) => document.to_string(),
                None => return Err(CliError::invalid_request("load needs a 'schema'")),
            };

            form.load_schema(&raw)?;
            Ok(json!({
                "title": form.schema().title,
                "fields": form.schema().fields.len(),
                "epoch": form.epoch(),
            }))
        }
        "change" => {
            let field = string_member(event, "field")?;
            let value = string_member(event, "value")?;

            let error = form.on_value_change(field, value)?;
            Ok(json!({ "field": field, "error": error }))
        }
        "submit" => {
            let outcome = runtime.block_on(form.submit_with(effect))?;
            Ok(outcome_json(&outcome))
        }
        "snapshot" => Ok(json!({
            "form": form.snapshot(),
            "metrics": form.metrics().snapshot(),
        })),
        "render" => Ok(json!({
            "text": render_form(form.schema(), form.values(), form.errors()),
        })),
        other => Err(CliError::invalid_request(format!("unknown op '{}'", other))),
    }
}

fn string_member<'a>(event: &'a Value, key: &str) -> CliResult<&'a str> {
    event
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| CliError::invalid_request(format!("event needs a string '{}'", key)))
}

fn outcome_json(outcome: &SubmitOutcome) -> Value {
    match outcome {
        SubmitOutcome::Rejected(errors) => json!({ "outcome": "rejected", "errors": errors }),
        SubmitOutcome::AlreadySubmitting => json!({ "outcome": "already_submitting" }),
        SubmitOutcome::Succeeded {
            submission_id,
            values,
        } => json!({
            "outcome": "succeeded",
            "submission_id": submission_id,
            "values": values,
        }),
    }
}

fn load_schema_file(path: &Path) -> CliResult<SchemaModel> {
    let raw = read_text(path)?;
    Ok(SchemaLoader::load(&raw)?)
}

fn init_config(path: Option<&Path>) -> CliResult<Config> {
    let config = Config::load_or_default(path)?;
    Logger::set_min_severity(config.severity());

    let delay = config.submit_delay_ms.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("log_level", config.log_level.as_str()), ("submit_delay_ms", delay.as_str())],
    );

    Ok(config)
}

fn build_runtime() -> CliResult<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime_error(format!("Failed to start runtime: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SCHEMA: &str = r#"{"formTitle":"Contact","formDescription":"Say hi","fields":[
        {"id":"name","type":"text","label":"Name","required":true},
        {"id":"email","type":"email","label":"Email","required":false}
    ]}"#;

    fn fast_config() -> Config {
        Config {
            submit_delay_ms: 0,
            ..Config::default()
        }
    }

    fn run_lines(lines: &[String], config: &Config) -> Vec<Value> {
        let runtime = build_runtime().unwrap();
        let input = Cursor::new(lines.join("\n"));
        let mut output = Vec::new();

        run_session(input, &mut output, config, &runtime).unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn load_line() -> String {
        json!({ "op": "load", "schema": SCHEMA }).to_string()
    }

    #[test]
    fn test_session_full_cycle() {
        let lines = vec![
            load_line(),
            r#"{"op":"submit"}"#.to_string(),
            r#"{"op":"change","field":"name","value":"Ada"}"#.to_string(),
            r#"{"op":"submit"}"#.to_string(),
            r#"{"op":"snapshot"}"#.to_string(),
        ];

        let responses = run_lines(&lines, &fast_config());
        assert_eq!(responses.len(), 5);
        assert_eq!(responses[0]["data"]["fields"], 2);
        assert_eq!(responses[1]["data"]["outcome"], "rejected");
        assert_eq!(responses[1]["data"]["errors"]["name"], "This field is required");
        assert_eq!(responses[2]["data"]["error"], Value::Null);
        assert_eq!(responses[3]["data"]["outcome"], "succeeded");
        assert_eq!(responses[3]["data"]["values"]["name"], "Ada");
        assert_eq!(responses[4]["data"]["form"]["phase"], "Idle");
        assert_eq!(responses[4]["data"]["form"]["values"], json!({}));
        assert_eq!(responses[4]["data"]["metrics"]["submits_succeeded"], 1);
    }

    #[test]
    fn test_session_bad_load_keeps_schema() {
        let lines = vec![
            load_line(),
            r#"{"op":"load","schema":"{ nope"}"#.to_string(),
            r#"{"op":"snapshot"}"#.to_string(),
        ];

        let responses = run_lines(&lines, &fast_config());
        assert_eq!(responses[1]["status"], "error");
        assert_eq!(responses[1]["code"], "FORM_CLI_SCHEMA_REJECTED");
        assert_eq!(responses[2]["data"]["form"]["schema"]["formTitle"], "Contact");
        assert!(responses[2]["data"]["form"]["load_error"].is_string());
    }

    #[test]
    fn test_session_submit_failure_keeps_values() {
        let config = Config {
            fail_submissions: true,
            ..fast_config()
        };
        let lines = vec![
            load_line(),
            r#"{"op":"change","field":"name","value":"Ada"}"#.to_string(),
            r#"{"op":"submit"}"#.to_string(),
            r#"{"op":"snapshot"}"#.to_string(),
        ];

        let responses = run_lines(&lines, &config);
        assert_eq!(responses[2]["status"], "error");
        assert!(responses[2]["message"]
            .as_str()
            .unwrap()
            .contains("FORM_SUBMIT_FAILED"));
        assert_eq!(responses[3]["data"]["form"]["values"]["name"], "Ada");
    }

    #[test]
    fn test_session_rejects_bad_events() {
        let lines = vec![
            "not json".to_string(),
            r#"{"op":"dance"}"#.to_string(),
            r#"{"op":"change","field":"ghost","value":"x"}"#.to_string(),
        ];

        let responses = run_lines(&lines, &fast_config());
        assert_eq!(responses.len(), 3);
        assert!(responses.iter().all(|r| r["status"] == "error"));
        assert_eq!(responses[0]["code"], "FORM_CLI_INVALID_REQUEST");
        assert_eq!(responses[1]["code"], "FORM_CLI_INVALID_REQUEST");
        assert_eq!(responses[2]["code"], "FORM_CLI_FORM_ERROR");
    }

    #[test]
    fn test_outcome_json_shapes() {
        let mut errors = FieldErrors::new();
        errors.set("name", Some("This field is required".into()));
        let rejected = outcome_json(&SubmitOutcome::Rejected(errors));
        assert_eq!(rejected["outcome"], "rejected");
        assert_eq!(rejected["errors"]["name"], "This field is required");

        assert_eq!(
            outcome_json(&SubmitOutcome::AlreadySubmitting)["outcome"],
            "already_submitting"
        );
    }
}
