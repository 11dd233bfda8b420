#[cfg(test)]
#[path = "oneshot_test.rs"]
mod tests;

use std::io::Write;

use eyre::{Context, Result, bail};
use serde_json::Value;

use crate::api::{Api, HttpApi};
use crate::cli::{Commands, DocumentsCommand, SettingsCommand};
use crate::config::ChatConfig;
use crate::models::{
    ChatParameters, ChatRequest, Health, NewConversation, Page, SearchQuery, SettingUpdate,
};

/// Run a non-interactive subcommand and print its result.
pub async fn run_command<W: Write>(
    api: &HttpApi,
    chat: &ChatConfig,
    command: Commands,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Chat => bail!("chat is interactive and cannot run as a single command"),
        Commands::Health => health(api, out).await,
        Commands::Ask {
            message,
            conversation,
        } => ask(api, chat, &message, conversation, out).await,
        Commands::Models => {
            let models = api.list_models().await.wrap_err("listing models")?;
            if models.is_empty() {
                writeln!(out, "No models available.")?;
            }
            for model in models {
                let marker = if model.name() == chat.default_model { "*" } else { " " };
                writeln!(out, "{} {}", marker, model)?;
            }
            Ok(())
        }
        Commands::Conversations { skip, limit } => {
            let page = Page::new(skip, limit.unwrap_or(chat.page_size));
            let conversations = api
                .list_conversations(page)
                .await
                .wrap_err("listing conversations")?;
            if conversations.is_empty() {
                writeln!(out, "No conversations.")?;
            }
            for c in conversations {
                writeln!(
                    out,
                    "#{:<4} {} ({}, {} messages, updated {})",
                    c.id(),
                    c.title(),
                    c.model(),
                    c.message_count(),
                    c.updated_at().format("%Y-%m-%d %H:%M")
                )?;
            }
            Ok(())
        }
        Commands::Messages { id } => {
            let messages = api
                .list_messages(id)
                .await
                .wrap_err(format!("listing messages of conversation #{}", id))?;
            for message in messages {
                writeln!(
                    out,
                    "[{}] {}: {}",
                    message.created_at().format("%Y-%m-%d %H:%M:%S"),
                    message.role(),
                    message.content()
                )?;
            }
            Ok(())
        }
        Commands::New { title } => {
            let mut request = NewConversation::new(title.unwrap_or_default(), &chat.default_model);
            if let Some(prompt) = &chat.system_prompt {
                request = request.with_system_prompt(prompt);
            }
            let conversation = api
                .create_conversation(request)
                .await
                .wrap_err("creating conversation")?;
            writeln!(
                out,
                "Created conversation #{}: {}",
                conversation.id(),
                conversation.title()
            )?;
            Ok(())
        }
        Commands::Delete { id } => {
            api.delete_conversation(id)
                .await
                .wrap_err(format!("deleting conversation #{}", id))?;
            writeln!(out, "Deleted conversation #{}", id)?;
            Ok(())
        }
        Commands::Settings { command } => {
            settings(api, command.unwrap_or(SettingsCommand::List), out).await
        }
        Commands::Documents { command } => {
            documents(api, command.unwrap_or(DocumentsCommand::List), out).await
        }
    }
}

async fn health<W: Write>(api: &HttpApi, out: &mut W) -> Result<()> {
    let service = api.health().await.wrap_err("checking backend health")?;
    print_health(out, "backend", &service)?;

    let chat = api.chat_health().await.wrap_err("checking chat health")?;
    print_health(out, "chat", &chat)?;

    if !service.is_healthy() || !chat.is_healthy() {
        bail!("backend is not healthy");
    }
    Ok(())
}

fn print_health<W: Write>(out: &mut W, name: &str, health: &Health) -> Result<()> {
    write!(out, "{}: {}", name, health.status)?;
    for (key, value) in &health.metadata {
        write!(out, ", {}={}", key, display_value(value))?;
    }
    writeln!(out)?;
    Ok(())
}

async fn ask<W: Write>(
    api: &HttpApi,
    chat: &ChatConfig,
    message: &str,
    conversation: Option<i64>,
    out: &mut W,
) -> Result<()> {
    if message.trim().is_empty() {
        bail!("message must not be empty");
    }
    let params = ChatParameters::from(chat);
    params.validate()?;

    let request = ChatRequest::new(conversation, message, &params);
    let reply = api.chat(request).await.wrap_err("sending message")?;
    log::debug!(
        "Reply from {} in conversation {}",
        reply.model,
        reply.conversation_id
    );
    writeln!(out, "{}", reply.message)?;
    writeln!(out)?;
    writeln!(out, "[conversation #{}, {}]", reply.conversation_id, reply.model)?;
    Ok(())
}

async fn settings<W: Write>(api: &HttpApi, command: SettingsCommand, out: &mut W) -> Result<()> {
    match command {
        SettingsCommand::List => {
            let settings = api.get_settings().await.wrap_err("listing settings")?;
            for (key, value) in settings {
                writeln!(out, "{} = {}", key, value)?;
            }
        }
        SettingsCommand::Get { key } => {
            let setting = api
                .get_setting(&key)
                .await
                .wrap_err(format!("getting setting {}", key))?;
            writeln!(out, "{} = {}", setting.key, setting.value)?;
            if let Some(description) = setting.description.filter(|d| !d.is_empty()) {
                writeln!(out, "  {}", description)?;
            }
        }
        SettingsCommand::Set {
            key,
            value,
            description,
        } => {
            let update = SettingUpdate::parse(key, &value).with_description(description);
            let setting = api
                .update_setting(&update)
                .await
                .wrap_err(format!("updating setting {}", update.key))?;
            writeln!(out, "{} = {}", setting.key, setting.value)?;
        }
        SettingsCommand::Delete { key } => {
            api.delete_setting(&key)
                .await
                .wrap_err(format!("deleting setting {}", key))?;
            writeln!(out, "Deleted setting {}", key)?;
        }
    }
    Ok(())
}

async fn documents<W: Write>(api: &HttpApi, command: DocumentsCommand, out: &mut W) -> Result<()> {
    match command {
        DocumentsCommand::List => {
            let files = api.list_documents().await.wrap_err("listing documents")?;
            if files.is_empty() {
                writeln!(out, "No documents.")?;
            }
            for file in files {
                writeln!(out, "{}", file)?;
            }
        }
        DocumentsCommand::Delete { id } => {
            api.delete_document(id)
                .await
                .wrap_err(format!("deleting document #{}", id))?;
            writeln!(out, "Deleted document #{}", id)?;
        }
        DocumentsCommand::Search {
            query,
            results,
            files,
        } => {
            if results == 0 {
                bail!("the number of results must be at least 1");
            }
            let query = SearchQuery::new(query, results).with_file_ids(files);
            let hits = api
                .search_documents(&query)
                .await
                .wrap_err("searching documents")?;
            if hits.is_empty() {
                writeln!(out, "No matches.")?;
            }
            for (i, hit) in hits.iter().enumerate() {
                match hit.distance {
                    Some(distance) => {
                        writeln!(out, "{}. {} (distance {:.3})", i + 1, hit.filename, distance)?
                    }
                    None => writeln!(out, "{}. {}", i + 1, hit.filename)?,
                }
                writeln!(out, "   {}", hit.content.trim())?;
            }
        }
        DocumentsCommand::Stats => {
            let stats = api.library_stats().await.wrap_err("getting library stats")?;
            writeln!(
                out,
                "{} files, {} indexed, {:.2} MB",
                stats.files.total, stats.files.indexed, stats.files.total_size_mb
            )?;
            if !stats.supported_formats.is_empty() {
                writeln!(
                    out,
                    "Supported formats: {}",
                    stats.supported_formats.join(", ")
                )?;
            }
        }
    }
    Ok(())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
