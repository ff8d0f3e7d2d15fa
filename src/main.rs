use anyhow::{Context, Result};
use jwt_cli::clipboard::SystemClipboard;
use jwt_cli::config::{Args, Config};
use jwt_cli::env::Environment;
use jwt_cli::io_adapters::EditorLines;
use jwt_cli::token::UnsecuredJwt;
use jwt_cli::{Outcome, Session};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let env = Environment::new();
    let config = Config::resolve(argh::from_env::<Args>(), &env);

    // Diagnostics go to stderr so the prompts on stdout stay readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&config, &env) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, env: &Environment) -> Result<ExitCode> {
    let mut stdout = std::io::stdout();

    if let Some(token) = &config.decode {
        let claims = UnsecuredJwt::decode(token).context("cannot decode token")?;
        serde_json::to_writer_pretty(&mut stdout, &claims)?;
        println!();
        return Ok(ExitCode::SUCCESS);
    }

    let clipboard = SystemClipboard::detect(env, config.clipboard_command.as_deref())?;
    let lines = EditorLines::new()?;
    let outcome = Session::new(Box::new(lines), Box::new(UnsecuredJwt), Box::new(clipboard))
        .print_token(config.print_token)
        .run(&mut stdout)?;

    Ok(match outcome {
        Outcome::Copied(_) => ExitCode::SUCCESS,
        Outcome::Aborted => ExitCode::FAILURE,
    })
}
