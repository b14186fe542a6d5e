use clap::Parser;
use std::io;
use std::process;

use minftp::{CliArgs, ClientConfig, Session, Terminal};

fn main() {
    // Initialize logging
    env_logger::init();

    let args = CliArgs::parse();
    let config = match ClientConfig::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            process::exit(1);
        }
    };
    log::info!("{config}");

    let session = Session::new(
        &config.host,
        config.port,
        config.session_options(),
        config.local_store(),
    );

    let mut terminal = Terminal::new(session, config);
    let stdin = io::stdin();
    if let Err(e) = terminal.run(stdin.lock(), io::stdout()) {
        eprintln!("Terminal error: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("Usage: minftp -i <ip_address> [-p <port>] [-c <config>] [-d <local_dir>]");
    println!("Environment Variables:");
    println!("  MINFTP_HOST=127.0.0.1");
    println!("  MINFTP_PORT=21");
    println!("  MINFTP_LOCAL_DIRECTORY=./downloads");
    println!("  MINFTP_TIMEOUT_SECS=0");
    println!("  MINFTP_REPLY_MODE=complete");
    println!("  RUST_LOG=info");
}
