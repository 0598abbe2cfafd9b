//! Chat command - interactive REPL against the assistant.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::{Style, Term, style};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use umuhuza_assistant::{Assistant, ConversationTurn, TurnRole};
use umuhuza_knowledge::KnowledgeStore;

use super::Context;
use super::ask::{build_assistant, open_store};

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Knowledge store path (default: from config)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Skip knowledge retrieval
    #[arg(long)]
    pub no_knowledge: bool,
}

/// Run the chat command.
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let assistant = build_assistant(ctx)?;
    let store = open_store(args.db, args.no_knowledge, ctx)?;

    let mut repl = Repl::new(assistant, store)?;
    repl.run().await
}

/// REPL state.
struct Repl {
    assistant: Assistant,
    store: Option<KnowledgeStore>,
    history: Vec<ConversationTurn>,
    editor: Editor<(), DefaultHistory>,
    term: Term,
}

impl Repl {
    fn new(assistant: Assistant, store: Option<KnowledgeStore>) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        let editor = Editor::with_config(config)?;

        Ok(Self {
            assistant,
            store,
            history: Vec::new(),
            editor,
            term: Term::stdout(),
        })
    }

    async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = format!("{} ", style("you>").cyan().bold());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match self.handle_slash_command(line) {
                            Ok(ControlFlow::Continue) => continue,
                            Ok(ControlFlow::Exit) => break,
                            Err(e) => {
                                self.print_error(&format!("Command error: {}", e));
                                continue;
                            }
                        }
                    }

                    if let Err(e) = self.send_message(line).await {
                        self.print_error(&format!("{}", e));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - don't exit
                    println!();
                    self.print_dim("(Interrupted - type /quit to exit)");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(e) => {
                    self.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        self.print_dim("Goodbye!");
        Ok(())
    }

    /// Send one message through the assistant and record both turns.
    async fn send_message(&mut self, message: &str) -> Result<()> {
        let reply = self
            .assistant
            .generate(message, &self.history, self.store.as_ref())
            .await?;

        println!("{}", reply);
        println!();

        self.history.push(ConversationTurn::user(message));
        self.history.push(ConversationTurn::assistant(&reply));

        Ok(())
    }

    fn handle_slash_command(&mut self, input: &str) -> Result<ControlFlow> {
        let parts: Vec<&str> = input[1..].split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "quit" | "q" | "exit" => {
                return Ok(ControlFlow::Exit);
            }
            "help" | "h" | "?" => {
                self.print_help();
            }
            "clear" | "cls" => {
                self.term.clear_screen()?;
            }
            "new" => {
                self.history.clear();
                self.print_dim("Started a new conversation");
            }
            "history" => {
                self.print_history();
            }
            "" => {
                self.print_dim("Type /help for available commands");
            }
            _ => {
                self.print_error(&format!("Unknown command: /{}", cmd));
                self.print_dim("Type /help for available commands");
            }
        }

        Ok(ControlFlow::Continue)
    }

    fn print_welcome(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("UMUHUZA Chat").bold().cyan());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!(
            "{}",
            dim.apply_to("Ask about crops, livestock, market access, or the platform.")
        );
        println!(
            "{}",
            dim.apply_to("Use /help for commands, Ctrl+D to exit.")
        );
        println!();
    }

    fn print_help(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Available Commands").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("  {}  - Exit the chat", style("/quit, /q").cyan());
        println!("  {}  - Show this help", style("/help, /h, /?").cyan());
        println!("  {}  - Clear the screen", style("/clear").cyan());
        println!("  {}  - Start a new conversation", style("/new").cyan());
        println!("  {}  - Show the conversation so far", style("/history").cyan());
        println!();
        println!("{}", dim.apply_to("Keyboard shortcuts:"));
        println!("  {} - Interrupt current input", dim.apply_to("Ctrl+C"));
        println!("  {} - Exit the chat", dim.apply_to("Ctrl+D"));
        println!();
    }

    fn print_history(&self) {
        if self.history.is_empty() {
            self.print_dim("No conversation yet");
            return;
        }
        let dim = Style::new().dim();
        for turn in &self.history {
            let label = match turn.role {
                TurnRole::User => "you",
                TurnRole::Assistant => "umuhuza",
                TurnRole::Other => "other",
            };
            println!("{} {}", dim.apply_to(format!("[{label}]")), turn.content);
        }
    }

    fn print_dim(&self, msg: &str) {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(msg));
    }

    fn print_error(&self, msg: &str) {
        let red = Style::new().red();
        println!("{} {}", red.apply_to("Error:"), msg);
    }
}

/// Control flow for the REPL.
enum ControlFlow {
    Continue,
    Exit,
}
