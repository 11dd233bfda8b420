#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use eyre::{Context, Result};
use log::{LevelFilter, Record};
use regex::{Captures, Regex};

use super::{APP_NAME, Configuration, LogConfig, LogFile};

pub fn load_configuration(path: impl AsRef<Path>) -> Result<Configuration> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).wrap_err(format!("reading {}", path.display()))?;
    toml::from_str(&raw).wrap_err("parsing configuration")
}

/// Route the `log` facade into the configured file. Stdout and stderr stay
/// free for the chat itself.
pub fn init_logger(config: &LogConfig) -> Result<()> {
    let level = parse_level(config.level.as_deref())?;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    for filter in config.filters.iter().flatten() {
        let module_level = match filter.level.as_deref() {
            Some(raw) => parse_level(Some(raw))?,
            None => level,
        };
        builder.filter(filter.module.as_deref(), module_level);
    }

    let file = open_log_file(&config.file)?;
    builder
        .format(|buf, record| writeln!(buf, "{}", format_record(record)))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .wrap_err("installing logger")?;
    Ok(())
}

fn parse_level(raw: Option<&str>) -> Result<LevelFilter> {
    let raw = raw.unwrap_or("info");
    LevelFilter::from_str(raw).wrap_err(format!("invalid log level {:?}", raw))
}

/// `module/file:line timestamp [LEVEL] - message`
fn format_record(record: &Record) -> String {
    format!(
        "{}/{}:{} {} [{}] - {}",
        record.module_path().unwrap_or("unknown"),
        basename(record.file().unwrap_or("unknown")),
        record.line().unwrap_or(0),
        Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.level(),
        record.args()
    )
}

fn open_log_file(config: &LogFile) -> Result<File> {
    let path = resolve_path(&config.path)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).wrap_err(format!("creating directory {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(config.append)
        .truncate(!config.append)
        .open(&path)
        .wrap_err(format!("opening log file {}", path.display()))
}

pub(crate) fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

/// Expand `$VAR` and `${VAR}` and make the path absolute. Unset variables
/// expand to nothing.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let re = Regex::new(r"\$\{?([A-Za-z_][A-Za-z0-9_]*)\}?").wrap_err("compiling regex")?;
    let expanded = re.replace_all(path, |caps: &Captures| {
        std::env::var(&caps[1]).unwrap_or_default()
    });
    std::path::absolute(expanded.as_ref()).wrap_err(format!("resolving path {}", expanded))
}

/// First existing configuration file, in order:
/// `$XDG_CONFIG_HOME/llmlocal/config.toml`,
/// `$HOME/.config/llmlocal/config.toml`, `$HOME/.llmlocal.toml`.
pub fn lookup_config_path() -> Option<PathBuf> {
    config_candidates(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .into_iter()
    .find(|path| path.is_file())
}

fn config_candidates(xdg_config: Option<PathBuf>, home: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = xdg_config {
        paths.push(dir.join(APP_NAME).join("config.toml"));
    }
    if let Some(home) = home {
        paths.push(home.join(".config").join(APP_NAME).join("config.toml"));
        paths.push(home.join(format!(".{}.toml", APP_NAME)));
    }
    paths
}
