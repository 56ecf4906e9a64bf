use std::process;
use log::error;

use cogify::commands::{build_cli, CogifyCommandFactory, CommandFactory};
use cogify::utils::logger::init_logging;

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_flag("verbose"));

    let factory = CogifyCommandFactory::new();

    let command_result = factory.create_command(&matches);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
