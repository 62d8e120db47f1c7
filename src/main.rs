mod cli;
mod jq_exec;

use std::process::ExitCode;

use colored::Colorize;

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.init_logging();
    match command_line_interface.run() {
        Ok(true) => ExitCode::SUCCESS,
        // some documents were rejected; details already on stderr
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}
