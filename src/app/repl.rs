#[cfg(test)]
#[path = "repl_test.rs"]
mod tests;

use eyre::{Context, Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::models::{ChatParameters, Conversation, ConversationId, Event, Role};
use crate::store::{ArcConversationActions, SendOutcome};

use super::commands::{HELP, ReplCommand, parse_command};
use super::printer::EventPrinter;

/// Interactive chat loop. All state lives in the store; the REPL only keeps
/// the generation parameters for the next turn.
pub struct Repl {
    store: ArcConversationActions,
    events: mpsc::UnboundedReceiver<Event>,
    printer: EventPrinter,
    params: ChatParameters,
}

impl Repl {
    pub fn new(
        store: ArcConversationActions,
        events: mpsc::UnboundedReceiver<Event>,
        printer: EventPrinter,
        params: ChatParameters,
    ) -> Self {
        Self {
            store,
            events,
            printer,
            params,
        }
    }

    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.store.load_models().await;
        self.store.load_conversations().await;
        self.flush_events()?;
        self.printer
            .line("Type /help for the list of commands, /quit to exit.")?;

        let mut lines = input.lines();
        loop {
            let prompt = self.prompt();
            self.printer.prompt(&prompt)?;

            let Some(line) = lines.next_line().await.wrap_err("reading input")? else {
                self.printer.line("")?;
                break;
            };

            match parse_command(&line) {
                Ok(ReplCommand::Quit) => break,
                Ok(command) => {
                    if let Err(err) = self.handle(command).await {
                        log::error!("Command failed: {:#}", err);
                        self.flush_events()?;
                        self.printer.error(format!("Error: {:#}", err))?;
                    }
                }
                Err(err) => self.printer.error(format!("Error: {}", err))?,
            }
            self.flush_events()?;
        }
        Ok(())
    }

    async fn handle(&mut self, command: ReplCommand) -> Result<()> {
        match command {
            ReplCommand::Empty | ReplCommand::Quit => {}
            ReplCommand::Send(text) => self.send(&text).await?,
            ReplCommand::New(None) => {
                self.store.select_conversation(None).await;
                self.printer
                    .line("New conversation, it is created with your first message.")?;
            }
            ReplCommand::New(Some(title)) => {
                let model = self.model_name();
                let conversation = self.store.create_conversation(&title, &model).await?;
                self.store.select_conversation(Some(conversation)).await;
            }
            ReplCommand::List => {
                self.store.load_conversations().await;
                self.flush_events()?;
                self.print_conversations()?;
            }
            ReplCommand::Open(id) => self.open(id).await?,
            ReplCommand::Delete(id) => self.store.delete_conversation(id).await?,
            ReplCommand::Models => {
                self.store.load_models().await;
                self.flush_events()?;
                self.print_models()?;
            }
            ReplCommand::Model(name) => {
                let known = self.store.snapshot().models().iter().any(|m| m.name() == name);
                self.update_params(self.params.clone().with_model(&name))?;
                if !known {
                    self.printer
                        .error(format!("Model {} is not in the model list", name))?;
                }
                self.printer.line(format!("Model set to {}", name))?;
            }
            ReplCommand::Temperature(value) => {
                self.update_params(self.params.clone().with_temperature(value))?;
                self.printer.line(format!("Temperature set to {}", value))?;
            }
            ReplCommand::TopP(value) => {
                self.update_params(self.params.clone().with_top_p(value))?;
                self.printer.line(format!("Top p set to {}", value))?;
            }
            ReplCommand::MaxTokens(value) => {
                self.update_params(self.params.clone().with_max_tokens(value))?;
                match value {
                    Some(value) => self.printer.line(format!("Max tokens set to {}", value))?,
                    None => self.printer.line("Max tokens disabled")?,
                }
            }
            ReplCommand::System(prompt) => {
                let enabled = prompt.is_some();
                self.update_params(self.params.clone().with_system_prompt(prompt))?;
                self.printer.line(if enabled {
                    "System prompt set"
                } else {
                    "System prompt disabled"
                })?;
            }
            ReplCommand::Help => self.printer.line(HELP)?,
        }
        Ok(())
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        self.params.validate()?;
        let had_conversation = self.store.snapshot().active_id().is_some();

        let outcome = {
            let send = self.store.send_message(text, self.params.clone());
            tokio::pin!(send);
            loop {
                tokio::select! {
                    outcome = &mut send => break outcome,
                    Some(event) = self.events.recv() => self.printer.print(&event)?,
                }
            }
        };
        self.flush_events()?;
        log::debug!("Send finished: {:?}", outcome);

        match outcome {
            SendOutcome::Completed if !had_conversation => self.continue_newest().await?,
            SendOutcome::Rejected => {
                self.printer.error("A response is still streaming, try again later")?
            }
            _ => {}
        }
        Ok(())
    }

    /// The backend created a conversation for the first turn; switch to it so
    /// the next message continues there.
    async fn continue_newest(&mut self) -> Result<()> {
        let newest = self
            .store
            .snapshot()
            .conversations()
            .iter()
            .max_by_key(|c| (c.created_at(), c.id()))
            .cloned();
        let Some(conversation) = newest else {
            log::warn!("No conversation found after the first turn");
            return Ok(());
        };

        self.store
            .select_conversation(Some(conversation.clone()))
            .await;
        self.printer.line(format!(
            "Continuing in conversation #{}: {}",
            conversation.id(),
            conversation.title()
        ))
    }

    async fn open(&mut self, id: ConversationId) -> Result<()> {
        let mut conversation = self.find_conversation(id);
        if conversation.is_none() {
            self.store.load_conversations().await;
            conversation = self.find_conversation(id);
        }
        let Some(conversation) = conversation else {
            bail!("conversation #{} not found", id);
        };

        self.store.select_conversation(Some(conversation)).await;
        self.flush_events()?;
        self.print_messages()
    }

    fn find_conversation(&self, id: ConversationId) -> Option<Conversation> {
        self.store
            .snapshot()
            .conversations()
            .iter()
            .find(|c| c.id() == id)
            .cloned()
    }

    fn update_params(&mut self, params: ChatParameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    fn model_name(&self) -> String {
        self.params
            .model
            .clone()
            .unwrap_or_else(|| crate::config::constants::DEFAULT_MODEL.to_string())
    }

    fn prompt(&self) -> String {
        match self.store.snapshot().active_conversation() {
            Some(conversation) => format!("[#{} {}] > ", conversation.id(), conversation.title()),
            None => "[new] > ".to_string(),
        }
    }

    fn flush_events(&mut self) -> Result<()> {
        while let Ok(event) = self.events.try_recv() {
            self.printer.print(&event)?;
        }
        Ok(())
    }

    fn print_conversations(&mut self) -> Result<()> {
        let state = self.store.snapshot();
        if state.conversations().is_empty() {
            return self.printer.line("No conversations yet.");
        }
        let active = state.active_id();
        for conversation in state.conversations() {
            let marker = if Some(conversation.id()) == active { "*" } else { " " };
            self.printer.line(format!(
                "{} #{:<4} {} ({}, {} messages, updated {})",
                marker,
                conversation.id(),
                conversation.title(),
                conversation.model(),
                conversation.message_count(),
                conversation.updated_at().format("%Y-%m-%d %H:%M"),
            ))?;
        }
        Ok(())
    }

    fn print_models(&mut self) -> Result<()> {
        let state = self.store.snapshot();
        if state.models().is_empty() {
            return self.printer.line("No models available.");
        }
        let current = self.model_name();
        for model in state.models() {
            let marker = if model.name() == current { "*" } else { " " };
            self.printer.line(format!("{} {}", marker, model))?;
        }
        Ok(())
    }

    fn print_messages(&mut self) -> Result<()> {
        let state = self.store.snapshot();
        for message in state.messages() {
            let speaker = match message.role() {
                Role::User => "you",
                Role::Assistant => "assistant",
                Role::System => "system",
            };
            self.printer
                .line(format!("{}> {}", speaker, message.content()))?;
        }
        Ok(())
    }
}
