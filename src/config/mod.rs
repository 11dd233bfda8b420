#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub mod constants;
pub(crate) mod defaults;
pub mod models;
pub mod utils;

pub use models::*;
pub use utils::*;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit the binary was built from, when the build exports `GIT_SHA`.
pub const GIT_SHA: Option<&str> = option_env!("GIT_SHA");

/// Sent with every backend request, e.g. `llmlocal/0.1.0 (linux; x86_64)`.
pub fn user_agent() -> String {
    format!(
        "{}/{} ({}; {})",
        APP_NAME,
        VERSION,
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

pub fn version() -> String {
    match GIT_SHA {
        Some(sha) => format!("{} {} ({})", APP_NAME, VERSION, sha),
        None => format!("{} {}", APP_NAME, VERSION),
    }
}

/// Startup progress on stderr, printed only with `general.verbose`.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::config::Configuration::instance().general.verbose {
            eprintln!("[{}] {}", $crate::config::APP_NAME, format_args!($($arg)*));
        }
    };
}

pub use verbose;
