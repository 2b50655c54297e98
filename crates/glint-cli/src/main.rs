use clap::{Parser, Subcommand};
use serde::Serialize;

use glint_cache::ParseCache;
use glint_data::{DataContext, Value};
use glint_expr::{Evaluate, ParseResult};

#[derive(Parser)]
#[command(name = "glint")]
#[command(about = "Glint — inline expression engine for data-bound templates")]
#[command(version)]
struct Cli {
    /// Emit diagnostics as JSON (for editor tooling)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check an expression for parse errors without evaluating it
    Check {
        /// The expression source
        expression: String,
    },

    /// Parse and evaluate an expression
    Eval {
        /// The expression source
        expression: String,

        /// Context variable, as name=value (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
    },
}

#[derive(Serialize)]
struct Diagnostic<'a> {
    message: &'a str,
    start: usize,
    end: usize,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { expression } => cmd_check(&expression, cli.json),
        Command::Eval { expression, vars } => cmd_eval(&expression, &vars, cli.json),
    }
}

fn cmd_check(expression: &str, json: bool) {
    // Surrounding whitespace never parses; shell quoting adds it easily.
    let expression = expression.trim();
    let result = ParseCache::global().get_or_parse(expression);
    report_parse_errors(&result, json);
    eprintln!("OK: {expression}");
}

fn cmd_eval(expression: &str, vars: &[String], json: bool) {
    let context = DataContext::root();
    for var in vars {
        let Some((name, value)) = var.split_once('=') else {
            eprintln!("Error: --var expects name=value, got `{var}`");
            std::process::exit(1);
        };
        context.set_local(name, parse_value(value));
    }

    let result = ParseCache::global().get_or_parse(expression.trim());
    report_parse_errors(&result, json);

    let expr = result
        .expression()
        .expect("a successful parse has a root expression");
    match expr.evaluate(&context) {
        Ok(value) => println!("{value}"),
        Err(e) => {
            eprintln!("Evaluation error: {e}");
            std::process::exit(1);
        }
    }
}

/// Print parse diagnostics and exit unless the parse succeeded.
fn report_parse_errors(result: &ParseResult, json: bool) {
    let Some(exception) = result.exception() else {
        return;
    };

    if json {
        let diagnostics: Vec<_> = exception
            .messages()
            .iter()
            .map(|m| Diagnostic {
                message: &m.message,
                start: m.start,
                end: m.end,
            })
            .collect();
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("Error serializing diagnostics: {e}"),
        }
    } else {
        for m in exception.messages() {
            eprintln!("Parse error at {}..{}: {}", m.start, m.end, m.message);
        }
    }
    std::process::exit(1);
}

/// Interpret a --var value the way a literal would parse: booleans and
/// numbers get their native kind, anything else stays a string.
fn parse_value(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(int) = text.parse::<i64>() {
        return match i32::try_from(int) {
            Ok(narrowed) => Value::I32(narrowed),
            Err(_) => Value::I64(int),
        };
    }
    if let Ok(float) = text.parse::<f64>() {
        return Value::F64(float);
    }
    Value::Str(text.to_string())
}
