pub mod completion;
pub mod config;

use colored::Colorize;

pub fn print_version() {
    println!(
        "{} {}",
        "slidekit".bold().cyan(),
        env!("CARGO_PKG_VERSION").bold()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION").dimmed());
}
