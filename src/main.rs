mod args;
mod rcv;

use clap::{ErrorKind, Parser};
use log::{debug, error};
use std::process::exit;

use crate::args::Args;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                // Clap exits with 2, which is reserved for too many candidates.
                let _ = e.print();
                exit(rcv::EXIT_BAD_ARGUMENTS);
            }
        },
    };

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
    debug!("args: {:?}", args);

    match rcv::run_election(&args) {
        Ok(_) => exit(rcv::EXIT_SUCCESS),
        Err(e) => {
            error!("The election could not be resolved: {:?}", e);
            eprintln!("{}", e);
            exit(e.exit_code());
        }
    }
}
