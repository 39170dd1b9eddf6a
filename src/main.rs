use anyhow::Context;
use argh::FromArgs;
use log::LevelFilter;
use pipesh::Interpreter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::io;

#[derive(FromArgs)]
/// Interactive shell with built-in commands and sequential pipelines.
struct Options {
    #[argh(option, short = 'c')]
    /// run a single line and exit instead of starting the interactive loop.
    command: Option<String>,

    #[argh(option, default = "LevelFilter::Warn")]
    /// log verbosity on stderr: off, error, warn, info, debug or trace.
    log_level: LevelFilter,

    #[argh(switch)]
    /// do not keep line history in the interactive loop.
    no_history: bool,
}

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();

    TermLogger::init(
        options.log_level,
        ConfigBuilder::new().set_time_level(LevelFilter::Off).build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to install logger")?;

    let mut shell = Interpreter::default();
    match options.command {
        Some(line) => {
            if let Err(err) = shell.run_line(&line, &mut io::stdout()) {
                eprintln!("{err:#}");
                std::process::exit(1);
            }
        }
        None => shell.repl(!options.no_history)?,
    }
    Ok(())
}
