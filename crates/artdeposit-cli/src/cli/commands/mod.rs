use super::args::*;
use crate::exit_codes::SUCCESS;

pub mod build;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Build(args) => build::cmd_build(args),
        Command::Check(args) => build::cmd_check(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
