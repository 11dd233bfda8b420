use std::sync::Arc;

use eyre::{Context, Result};
use llmlocal::api::new_api;
use llmlocal::app::{EventPrinter, Repl, run_command};
use llmlocal::cli::{Command, Commands};
use llmlocal::config::{Configuration, init_logger, verbose};
use llmlocal::models::{ChatParameters, Event};
use llmlocal::store::Store;
use tokio::io::BufReader;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.get_config()?;
    init_logger(&config.log)?;
    Configuration::init(config.clone())?;
    verbose!("Logging to {}", config.log.file.path);

    verbose!("Connecting to {}", config.server.endpoint);
    let api = new_api(&config.server).wrap_err("initializing api client")?;

    let command = cmd.command();
    if command != Commands::Chat {
        let mut stdout = std::io::stdout();
        return run_command(&api, &config.chat, command, &mut stdout).await;
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let store = Store::new(api.clone(), api.clone())
        .with_event_tx(Arc::new(event_tx))
        .with_page_size(config.chat.page_size);

    let params = ChatParameters::from(&config.chat);
    if let Err(err) = params.validate() {
        eprintln!("Invalid chat configuration: {}", err);
    }
    verbose!(
        "Chatting with {}",
        params.model.as_deref().unwrap_or_default()
    );

    let mut repl = Repl::new(Arc::new(store), event_rx, EventPrinter::stdio(), params);
    repl.run(BufReader::new(tokio::io::stdin())).await?;
    log::debug!("Bye");
    Ok(())
}
