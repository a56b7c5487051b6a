/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

use shoaldb::config::Config;
use shoaldb::executor::Executor;
use std::env;
use std::process;

fn main() {
    #[cfg(feature = "cli-logging")]
    env_logger::init();

    println!("Shoal DB (2026)");

    let dir = match env::args().nth(1) {
        Some(dir) => dir,
        None => {
            eprintln!("usage: shoaldb <environment-directory>");
            process::exit(2);
        }
    };

    let config = Config::new(&dir);
    match Executor::new(&config) {
        Ok(_executor) => {
            println!("opened environment at {dir}");
            println!("(SQL text parsing is outside this crate's scope; see the executor module for the statement-tree API)");
        }
        Err(err) => {
            eprintln!("failed to open environment at {dir}: {err}");
            process::exit(1);
        }
    }
}
