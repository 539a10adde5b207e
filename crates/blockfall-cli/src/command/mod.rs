use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use self::simulate::SimulateArg;

mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play headless games with random input and report the results as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    crate::util::init_logging(verbosity_level(args.verbose));
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

fn verbosity_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_args_are_consistent() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_level(0), Level::WARN);
        assert_eq!(verbosity_level(1), Level::INFO);
        assert_eq!(verbosity_level(2), Level::DEBUG);
        assert_eq!(verbosity_level(9), Level::TRACE);
    }

    #[test]
    fn test_verbose_flag_after_subcommand() {
        let args = CommandArgs::try_parse_from(["blockfall", "simulate", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }
}
