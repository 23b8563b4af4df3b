use icsh::core::config::Config;
use icsh::flags::Flags;
use icsh::shell::Shell;
use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<(), icsh::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("icsh {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::from_flags(&flags)?;

    // RUST_LOG wins unless --debug asks for everything from the shell
    let filter = if config.debug {
        EnvFilter::new("icsh=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut shell = Shell::new(config)?;
    shell.run()
}
