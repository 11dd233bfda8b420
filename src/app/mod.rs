pub mod commands;
pub mod oneshot;
pub mod printer;
pub mod repl;

#[cfg(test)]
mod test_utils;

pub use oneshot::run_command;
pub use printer::EventPrinter;
pub use repl::Repl;
