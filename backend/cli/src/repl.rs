//! Interactive chat loop.
//!
//! Each non-empty line is one request cycle; lines starting with `/` are
//! commands that adjust settings or inspect the session.

use std::io::{BufRead, Write};

use anyhow::Result;

use groqchat_core::{ChatSettings, ModelChoice, Role};
use groqchat_invoker::{ChatSession, CompletionInvoker, CycleOutcome};
use groqchat_logging::{redact_sensitive_data, ChatEvent, EventLogger};

use crate::models_cmd;
use crate::terminal_output::{dim, error_line, info_line, speaker_line, title_line, warn_line};

pub const TITLE: &str = "Groq Chat App";

const HELP: &str = "\
Commands:
  /model [id]      show or switch the model
  /memory [n]      show or set the conversational memory length (1-10)
  /history         show the most recent turns
  /models          list available models
  /new             start a new conversation
  /help            show this help
  /quit            exit";

/// Whether the loop should keep reading.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Model(Option<String>),
    Memory(Option<String>),
    History,
    Models,
    New,
    Help,
    Quit,
    Unknown(String),
}

/// Parse a slash command. Returns `None` for ordinary chat input.
pub fn parse_command(line: &str) -> Option<Command> {
    let rest = line.trim().strip_prefix('/')?;
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts
        .next()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    Some(match name {
        "model" => Command::Model(arg),
        "memory" => Command::Memory(arg),
        "history" => Command::History,
        "models" => Command::Models,
        "new" | "clear" => Command::New,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    })
}

/// Chat front-end state: one session plus the settings the user can adjust.
pub struct Repl {
    invoker: CompletionInvoker,
    settings: ChatSettings,
    session: ChatSession,
    color: bool,
}

impl Repl {
    pub fn new(invoker: CompletionInvoker, settings: ChatSettings, color: bool) -> Self {
        let session = ChatSession::new();
        log_session_start(&session, &settings);
        Self {
            invoker,
            settings,
            session,
            color,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Read lines until EOF or `/quit`.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", title_line(TITLE, self.color))?;
        writeln!(
            out,
            "{}",
            dim(
                &format!(
                    "model: {} | memory length: {} | type /help for commands",
                    self.settings.model(),
                    self.settings.memory_length()
                ),
                self.color
            )
        )?;
        self.prompt(out)?;

        for line in input.lines() {
            let line = line?;
            if self.handle_line(&line, out).await? == Flow::Quit {
                break;
            }
            self.prompt(out)?;
        }
        Ok(())
    }

    fn prompt<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "\nAsk a question: ")?;
        out.flush()?;
        Ok(())
    }

    /// Handle one line of input.
    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        if let Some(command) = parse_command(line) {
            return self.handle_command(command, out);
        }

        match self.session.submit(&self.invoker, &self.settings, line).await {
            CycleOutcome::Ignored => {}
            CycleOutcome::Committed(reply) => {
                EventLogger::log_event(
                    self.session.id(),
                    ChatEvent::Committed {
                        model: self.settings.model().to_string(),
                        input_chars: line.chars().count(),
                        reply_chars: reply.chars().count(),
                        history_len: self.session.history().len(),
                    },
                );
                writeln!(out, "{}", speaker_line(Role::Assistant, &reply, self.color))?;
            }
            CycleOutcome::RolledBack(e) => {
                let message = redact_sensitive_data(&e.to_string());
                EventLogger::log_event(
                    self.session.id(),
                    ChatEvent::RolledBack {
                        model: self.settings.model().to_string(),
                        error_msg: message.clone(),
                        history_len: self.session.history().len(),
                    },
                );
                writeln!(out, "{}", error_line(&message, self.color))?;
            }
        }
        Ok(Flow::Continue)
    }

    fn handle_command<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Model(None) => {
                writeln!(out, "{}", info_line(&format!("model: {}", self.settings.model()), self.color))?;
            }
            Command::Model(Some(id)) => match id.parse::<ModelChoice>() {
                Ok(model) => {
                    self.settings.set_model(model);
                    writeln!(out, "{}", info_line(&format!("model set to {model}"), self.color))?;
                }
                Err(e) => writeln!(out, "{}", warn_line(&format!("{e}; see /models"), self.color))?,
            },
            Command::Memory(None) => {
                writeln!(
                    out,
                    "{}",
                    info_line(
                        &format!("conversational memory length: {}", self.settings.memory_length()),
                        self.color
                    )
                )?;
            }
            Command::Memory(Some(arg)) => {
                let result = arg
                    .parse::<usize>()
                    .map_err(|_| format!("'{arg}' is not a number"))
                    .and_then(|n| self.settings.set_memory_length(n).map_err(|e| e.to_string()));
                match result {
                    Ok(()) => writeln!(
                        out,
                        "{}",
                        info_line(
                            &format!(
                                "conversational memory length set to {}",
                                self.settings.memory_length()
                            ),
                            self.color
                        )
                    )?,
                    Err(e) => writeln!(out, "{}", warn_line(&e, self.color))?,
                }
            }
            Command::History => {
                let recent = self.session.recent(self.settings.memory_length());
                if recent.is_empty() {
                    writeln!(out, "{}", dim("(no messages yet)", self.color))?;
                }
                for turn in recent {
                    writeln!(out, "{}", speaker_line(turn.role(), turn.content(), self.color))?;
                }
            }
            Command::Models => {
                write!(out, "{}", models_cmd::render(self.settings.model(), self.color))?;
            }
            Command::New => {
                self.session = ChatSession::new();
                log_session_start(&self.session, &self.settings);
                writeln!(out, "{}", info_line("started a new conversation", self.color))?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(name) => {
                writeln!(out, "{}", warn_line(&format!("unknown command /{name}; try /help"), self.color))?;
            }
        }
        Ok(Flow::Continue)
    }
}

fn log_session_start(session: &ChatSession, settings: &ChatSettings) {
    EventLogger::log_event(
        session.id(),
        ChatEvent::SessionStarted {
            model: settings.model().to_string(),
        },
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use groqchat_invoker::providers::MockProvider;

    fn repl(provider: MockProvider) -> Repl {
        Repl::new(
            CompletionInvoker::new(Arc::new(provider)),
            ChatSettings::default(),
            false,
        )
    }

    async fn send(repl: &mut Repl, line: &str) -> String {
        let mut out = Vec::new();
        repl.handle_line(line, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/history"), Some(Command::History));
        assert_eq!(
            parse_command("/model  llama2-70b-4096 "),
            Some(Command::Model(Some("llama2-70b-4096".into())))
        );
        assert_eq!(parse_command("/memory"), Some(Command::Memory(None)));
        assert_eq!(parse_command("/frob"), Some(Command::Unknown("frob".into())));
        assert_eq!(parse_command("/exit"), Some(Command::Quit));
    }

    #[tokio::test]
    async fn prints_reply_and_commits() {
        let mut repl = repl(MockProvider::new("mock").with_response("Hi there"));
        let out = send(&mut repl, "Hello").await;
        assert_eq!(out, "Chatbot: Hi there\n");
        assert_eq!(repl.session().history().len(), 2);
    }

    #[tokio::test]
    async fn prints_error_and_rolls_back() {
        let mut repl = repl(MockProvider::new("mock").failing("Groq returned 503: over capacity"));
        let out = send(&mut repl, "Hello").await;
        assert_eq!(out, "An error occurred: Groq returned 503: over capacity\n");
        assert!(repl.session().history().is_empty());
    }

    #[tokio::test]
    async fn error_output_is_redacted() {
        let mut repl = repl(MockProvider::new("mock").failing("bad key gsk_abcdefghijklmnopqrstuvwxyz0123"));
        let out = send(&mut repl, "Hello").await;
        assert!(!out.contains("gsk_abcdefghijklmnopqrstuvwxyz0123"));
    }

    #[tokio::test]
    async fn empty_line_prints_nothing() {
        let mut repl = repl(MockProvider::new("mock"));
        assert_eq!(send(&mut repl, "").await, "");
        assert!(repl.session().history().is_empty());
    }

    #[tokio::test]
    async fn history_shows_memory_length_turns() {
        let mut repl = repl(MockProvider::new("mock").echo());
        send(&mut repl, "one").await;
        send(&mut repl, "two").await;
        send(&mut repl, "/memory 3").await;

        let out = send(&mut repl, "/history").await;
        assert_eq!(out, "Chatbot: You said: one\nYou: two\nChatbot: You said: two\n");
    }

    #[tokio::test]
    async fn memory_rejects_out_of_range() {
        let mut repl = repl(MockProvider::new("mock"));
        let out = send(&mut repl, "/memory 11").await;
        assert!(out.starts_with("WARN:"));
        assert_eq!(repl.settings().memory_length(), 5);
    }

    #[tokio::test]
    async fn model_switch_validates_id() {
        let mut repl = repl(MockProvider::new("mock"));
        send(&mut repl, "/model llama-3.1-8b-instant").await;
        assert_eq!(repl.settings().model(), ModelChoice::Llama31_8bInstant);

        let out = send(&mut repl, "/model gpt-4o").await;
        assert!(out.contains("unknown model"));
        assert_eq!(repl.settings().model(), ModelChoice::Llama31_8bInstant);
    }

    #[tokio::test]
    async fn new_starts_fresh_session() {
        let mut repl = repl(MockProvider::new("mock"));
        send(&mut repl, "hello").await;
        let first = repl.session().id();

        send(&mut repl, "/new").await;
        assert_ne!(repl.session().id(), first);
        assert!(repl.session().history().is_empty());
    }

    #[tokio::test]
    async fn run_stops_at_quit() {
        let mut repl = repl(MockProvider::new("mock").with_response("pong"));
        let input = std::io::Cursor::new("ping\n/quit\nnever sent\n");
        let mut out = Vec::new();
        repl.run(input, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with(TITLE));
        assert!(out.contains("Chatbot: pong"));
        assert_eq!(repl.session().history().len(), 2);
    }
}
