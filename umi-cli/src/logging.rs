//! Logging setup: everything goes to a `UMIClusterer.log` file in the current
//! directory, matching the reference tool's log destination, with verbosity
//! controlled by `--debug`.

use std::fs::OpenOptions;
use std::io;

use env_logger::{Builder, Env, Target};

pub fn init_logging(debug: bool) -> io::Result<()> {
    let level = if debug { "debug" } else { "info" };
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("UMIClusterer.log")?;

    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder.target(Target::Pipe(Box::new(log_file)));
    builder.init();
    Ok(())
}
