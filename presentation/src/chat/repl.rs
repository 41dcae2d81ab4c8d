//! REPL (Read-Eval-Print Loop) for interactive prompts

use crate::output::formatter::OutputFormatter;
use crate::progress::reporter::ProgressReporter;
use colored::Colorize;
use llmgate_application::{NoSubmitProgress, SessionGateway, SubmitError, SubmitProgress};
use llmgate_domain::{CompletionRequest, Prompt, ResponseStyle};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Models,
    Refresh,
    /// `/model` alone shows the current model
    Model(Option<String>),
    /// `/style none` clears the style
    Style(Option<ResponseStyle>),
    Invalid(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();
        if parts.next().is_some() {
            return ReplCommand::Invalid(format!("too many arguments to {}", name));
        }

        match (name, arg) {
            ("/quit" | "/exit" | "/q", None) => ReplCommand::Quit,
            ("/help" | "/h" | "/?", None) => ReplCommand::Help,
            ("/models", None) => ReplCommand::Models,
            ("/refresh", None) => ReplCommand::Refresh,
            ("/model", arg) => ReplCommand::Model(arg.map(str::to_string)),
            ("/style", Some(arg)) if arg.eq_ignore_ascii_case("none") => ReplCommand::Style(None),
            ("/style", Some(arg)) => match arg.parse() {
                Ok(style) => ReplCommand::Style(Some(style)),
                Err(e) => ReplCommand::Invalid(format!("{}", e)),
            },
            ("/style", None) => {
                ReplCommand::Invalid("usage: /style <concise|detailed|none>".to_string())
            }
            _ => ReplCommand::Invalid(format!("Unknown command: {}", line)),
        }
    }
}

/// Interactive chat REPL
///
/// Requests are independent; no conversation history is sent to the model.
pub struct ChatRepl {
    gateway: SessionGateway,
    formatter: Box<dyn OutputFormatter>,
    model: Option<String>,
    style: Option<ResponseStyle>,
    timeout: Duration,
    show_progress: bool,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(gateway: SessionGateway, formatter: Box<dyn OutputFormatter>) -> Self {
        let timeout = gateway.params().default_timeout;
        let style = gateway.params().default_style;
        Self {
            gateway,
            formatter,
            model: None,
            style,
            timeout,
            show_progress: true,
            history_file: dirs::data_dir().map(|p| p.join("llmgate").join("history.txt")),
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_style(mut self, style: Option<ResponseStyle>) -> Self {
        self.style = style;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let prompt = format!("{}> ", self.model.as_deref().unwrap_or("(no model)"));
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)).await {
                            break;
                        }
                        continue;
                    }

                    self.process_prompt(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "llmgate - chat".cyan().bold());
        println!(
            "Model: {}   Style: {}",
            self.model.as_deref().unwrap_or("none (use /model <id>)"),
            self.style.map(|s| s.as_str()).unwrap_or("none")
        );
        println!("Each line is sent on its own; the model does not see earlier lines.");
        println!("Type /help for commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /models                         - List available models");
        println!("  /model [<id>]                   - Show or switch the model");
        println!("  /style <concise|detailed|none>  - Set the response style");
        println!("  /refresh                        - Re-list models from the backend");
        println!("  /help, /h, /?                   - Show this help");
        println!("  /quit, /exit, /q                - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Models => match self.gateway.list_available_models().await {
                Ok(view) => print!("{}", self.formatter.models(&view)),
                Err(e) => eprint!("{}", self.formatter.catalog_error(&e)),
            },
            ReplCommand::Refresh => match self.gateway.refresh_models().await {
                Ok(view) => print!("{}", self.formatter.models(&view)),
                Err(e) => eprint!("{}", self.formatter.catalog_error(&e)),
            },
            ReplCommand::Model(None) => {
                println!("Model: {}", self.model.as_deref().unwrap_or("none"));
            }
            ReplCommand::Model(Some(id)) => self.switch_model(id).await,
            ReplCommand::Style(style) => {
                self.style = style;
                println!("Style: {}", style.map(|s| s.as_str()).unwrap_or("none"));
            }
            ReplCommand::Invalid(message) => {
                println!("{}", message);
                println!("Type /help for available commands");
            }
        }
        false
    }

    /// Switch only to a model the catalog knows.
    async fn switch_model(&mut self, id: String) {
        match self.gateway.list_available_models().await {
            Ok(view) => match view.snapshot().resolve(&id) {
                Some(model) => {
                    self.model = Some(model.to_string());
                    println!("Model: {}", model);
                }
                None => {
                    let error = SubmitError::ModelNotFound {
                        requested: id,
                        known: view.snapshot().model_ids(),
                    };
                    eprint!("{}", self.formatter.submit_error(&error));
                }
            },
            Err(e) => eprint!("{}", self.formatter.catalog_error(&e)),
        }
    }

    async fn process_prompt(&self, line: &str) {
        let Some(model) = self.model.as_deref() else {
            println!("No model selected. Use /model <id> (see /models).");
            return;
        };

        let request = match Prompt::new(line)
            .and_then(|prompt| CompletionRequest::new(model, prompt, self.style, self.timeout))
        {
            Ok(request) => request,
            Err(e) => {
                eprint!("{}", self.formatter.submit_error(&SubmitError::from(e)));
                return;
            }
        };

        // Ctrl+C while waiting abandons this request only.
        let cancellation = CancellationToken::new();
        let watcher = {
            let cancellation = cancellation.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    debug!("Interrupt received, cancelling request");
                    cancellation.cancel();
                }
            })
        };

        let progress: Box<dyn SubmitProgress> = if self.show_progress {
            Box::new(ProgressReporter::new(model))
        } else {
            Box::new(NoSubmitProgress)
        };
        let result = self
            .gateway
            .submit_request_with(request, progress.as_ref(), &cancellation)
            .await;
        watcher.abort();
        drop(progress);

        match result {
            Ok(completion) => println!("{}", self.formatter.completion(&completion)),
            Err(e) => eprintln!("{}", self.formatter.submit_error(&e)),
        }
    }
}
