#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;

use eyre::{Context, Result, bail, eyre};

use crate::models::ConversationId;

pub const HELP: &str = r#"Type a message and press Enter to send it. Commands:
  /new [title]          start a new conversation, created on the server when a title is given
  /list                 list conversations
  /open <id>            switch to a conversation and print its history
  /delete <id>          delete a conversation
  /models               list available models
  /model <name>         use another model for the next turns
  /temperature <value>  sampling temperature, between 0 and 2
  /top-p <value>        nucleus sampling, between 0 and 1
  /max-tokens <n|off>   cap the length of a reply
  /system <text|off>    system prompt sent with every turn
  /help                 show this help
  /quit                 exit"#;

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Empty,
    Send(String),
    New(Option<String>),
    List,
    Open(ConversationId),
    Delete(ConversationId),
    Models,
    Model(String),
    Temperature(f32),
    TopP(f32),
    MaxTokens(Option<u32>),
    System(Option<String>),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplCommand::Empty);
    }
    if !line.starts_with('/') {
        return Ok(ReplCommand::Send(line.to_string()));
    }

    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };

    let command = match name {
        "/new" => ReplCommand::New(optional(arg).map(str::to_string)),
        "/list" | "/ls" => ReplCommand::List,
        "/open" => ReplCommand::Open(conversation_id(name, arg)?),
        "/delete" | "/rm" => ReplCommand::Delete(conversation_id(name, arg)?),
        "/models" => ReplCommand::Models,
        "/model" => ReplCommand::Model(required(name, arg)?.to_string()),
        "/temperature" | "/temp" => ReplCommand::Temperature(number(name, arg)?),
        "/top-p" | "/top_p" => ReplCommand::TopP(number(name, arg)?),
        "/max-tokens" | "/max_tokens" => ReplCommand::MaxTokens(switch(name, arg)?),
        "/system" => ReplCommand::System(match required(name, arg)? {
            "off" => None,
            prompt => Some(prompt.to_string()),
        }),
        "/help" | "/?" => ReplCommand::Help,
        "/quit" | "/exit" | "/q" => ReplCommand::Quit,
        _ => bail!("unknown command {}, type /help for the list", name),
    };
    Ok(command)
}

fn optional(arg: &str) -> Option<&str> {
    if arg.is_empty() { None } else { Some(arg) }
}

fn required<'a>(name: &str, arg: &'a str) -> Result<&'a str> {
    optional(arg).ok_or_else(|| eyre!("{} needs an argument", name))
}

fn conversation_id(name: &str, arg: &str) -> Result<ConversationId> {
    let arg = required(name, arg)?;
    arg.trim_start_matches('#')
        .parse()
        .wrap_err(format!("{}: invalid conversation id {:?}", name, arg))
}

fn number(name: &str, arg: &str) -> Result<f32> {
    let arg = required(name, arg)?;
    arg.parse()
        .wrap_err(format!("{}: invalid number {:?}", name, arg))
}

fn switch(name: &str, arg: &str) -> Result<Option<u32>> {
    match required(name, arg)? {
        "off" | "none" => Ok(None),
        value => value
            .parse()
            .map(Some)
            .wrap_err(format!("{}: invalid number {:?}", name, value)),
    }
}
