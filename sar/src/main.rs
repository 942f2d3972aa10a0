mod application;
mod logging;
mod presentation {
    pub mod cli;
}

use std::process::ExitCode;

fn main() -> ExitCode {
    application::run()
}
