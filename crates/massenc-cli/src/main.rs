use clap::Parser;
use massenc_core::logging;

mod cli;

fn main() {
    let args = cli::Cli::parse();

    // Initialize logging as early as possible.
    if args.log_file {
        if logging::init_file().is_err() {
            logging::init_stderr();
        }
    } else {
        logging::init_stderr();
    }

    if let Err(err) = cli::run(args) {
        eprintln!("massenc error: {:#}", err);
        std::process::exit(1);
    }
}
