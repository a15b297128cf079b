use clap::{CommandFactory, Parser};
use clap_complete::generate;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use quill::cli::{Args, Commands};
use quill::config::AppConfig;
use quill::diagnostic::render_diagnostics;
use quill::format::display_value;
use quill::interpreter::builtins;
use quill::interpreter::evaluator::parse_and_eval_with_diagnostics;
use quill::interpreter::parser;
use quill::lexer;
use quill::value::Value;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = AppConfig::from_args(&args);

    let outcome = if let Some(source) = &args.eval {
        run_source(source, "<eval>", &config)
    } else if let Some(path) = &args.file {
        match std::fs::read_to_string(path) {
            Ok(source) => run_source(&source, &path.display().to_string(), &config),
            Err(error) => {
                eprintln!("error: cannot read {}: {}", path.display(), error);
                Err(())
            }
        }
    } else {
        repl(&config)
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn run_source(source: &str, origin: &str, config: &AppConfig) -> Result<(), ()> {
    if config.show_tokens {
        return dump_tokens(source, origin, config);
    }

    if config.show_ast {
        return match parser::parse_source(source) {
            Ok(program) => {
                println!("{:#?}", program);
                Ok(())
            }
            Err(error) => {
                report(source, origin, &[error.to_diagnostic()], config);
                Err(())
            }
        };
    }

    let env = match builtins::global_environment() {
        Ok(env) => env,
        Err(error) => {
            eprintln!("error: {}", error);
            return Err(());
        }
    };

    match parse_and_eval_with_diagnostics(source, env) {
        Ok((value, _)) => {
            if value != Value::Unit {
                println!("{}", display_value(&value));
            }
            Ok(())
        }
        Err(diagnostics) => {
            report(source, origin, &diagnostics, config);
            Err(())
        }
    }
}

fn dump_tokens(source: &str, origin: &str, config: &AppConfig) -> Result<(), ()> {
    let lexed = lexer::tokenize(source);
    for spanned in &lexed.tokens {
        println!(
            "{:?} @ {}..{}",
            spanned.token, spanned.span.start, spanned.span.end
        );
    }
    match lexed.error {
        Some(error) => {
            report(source, origin, &[error.to_diagnostic()], config);
            Err(())
        }
        None => Ok(()),
    }
}

fn repl(config: &AppConfig) -> Result<(), ()> {
    let mut env = match builtins::global_environment() {
        Ok(env) => env,
        Err(error) => {
            eprintln!("error: {}", error);
            return Err(());
        }
    };

    println!("quill {} (type `exit` to leave)", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if config.color_enabled {
            print!("{} ", ">".green().bold());
        } else {
            print!("> ");
        }
        if io::stdout().flush().is_err() {
            return Err(());
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" {
            break;
        }

        // Declarations survive to the next line; a failed line leaves the
        // environment as it was.
        match parse_and_eval_with_diagnostics(&line, env.clone()) {
            Ok((value, next)) => {
                env = next;
                if value != Value::Unit {
                    println!("{}", display_value(&value));
                }
            }
            Err(diagnostics) => report(&line, "repl", &diagnostics, config),
        }
    }

    Ok(())
}

fn report(
    source: &str,
    origin: &str,
    diagnostics: &[quill::diagnostic::Diagnostic],
    config: &AppConfig,
) {
    eprint!(
        "{}",
        render_diagnostics(source, origin, diagnostics, config.color_enabled)
    );
}
