//! REPL (Read-Eval-Print Loop) for interactive sessions with the board

use std::path::{Path, PathBuf};

use council_application::{AppPhase, BoardApi, NoopObserver, Orchestrator, SessionConnector};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};

use crate::output::artifacts::{save_diagram, save_report};
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::TranscriptReporter;

/// Interactive board REPL
pub struct CouncilRepl<C: SessionConnector + 'static, A: BoardApi + 'static> {
    orchestrator: Orchestrator<C, A>,
    show_transcript: bool,
    json_output: bool,
}

impl<C: SessionConnector + 'static, A: BoardApi + 'static> CouncilRepl<C, A> {
    pub fn new(orchestrator: Orchestrator<C, A>) -> Self {
        Self {
            orchestrator,
            show_transcript: true,
            json_output: false,
        }
    }

    pub fn with_transcript(mut self, show: bool) -> Self {
        self.show_transcript = show;
        self
    }

    pub fn with_json_output(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("council").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    self.process_query(line).await;
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

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    async fn process_query(&mut self, line: &str) {
        if self.orchestrator.phase() != AppPhase::Idle {
            println!("A decision is already on the table. Use /new to start over.");
            return;
        }

        let result = if self.show_transcript {
            let reporter = TranscriptReporter::new();
            self.orchestrator
                .submit_query_with_observer(line, &reporter)
                .await
        } else {
            self.orchestrator
                .submit_query_with_observer(line, &NoopObserver)
                .await
        };

        match result {
            Ok(()) => {
                if let Some(board) = self.orchestrator.snapshot().board {
                    if self.json_output {
                        println!("{}", ConsoleFormatter::format_json(&board));
                    } else {
                        println!("{}", ConsoleFormatter::format(&board));
                    }
                    println!("Next: /execute, /diagram <path>, /report [path], /new");
                }
            }
            Err(e) => {
                eprintln!("Deliberation failed: {e}");
                println!("Use /new to try again.");
            }
        }
    }

    /// Returns true when the REPL should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let arg = parts.next();

        match command {
            "/execute" => self.command_execute().await,
            "/diagram" => self.command_diagram(arg.map(Path::new)),
            "/report" => self.command_report(arg.map(PathBuf::from)).await,
            "/new" => {
                self.orchestrator.reset();
                println!("Ready for a new question.");
            }
            "/help" => self.print_help(),
            "/quit" | "/exit" => return true,
            _ => println!("Unknown command: {command} (try /help)"),
        }
        false
    }

    async fn command_execute(&mut self) {
        let result = if self.show_transcript {
            let reporter = TranscriptReporter::new();
            self.orchestrator
                .request_execution_with_observer(&reporter)
                .await
        } else {
            self.orchestrator
                .request_execution_with_observer(&NoopObserver)
                .await
        };
        if let Err(e) = result {
            eprintln!("{e}");
        }
    }

    fn command_diagram(&self, path: Option<&Path>) {
        let Some(path) = path else {
            println!("Usage: /diagram <path>");
            return;
        };
        match self.orchestrator.snapshot().diagram {
            Some(diagram) => match save_diagram(&diagram, path) {
                Ok(()) => println!("Decision map saved to {}", path.display()),
                Err(e) => eprintln!("Could not save diagram: {e}"),
            },
            None => println!("No diagram available for this decision."),
        }
    }

    async fn command_report(&self, path: Option<PathBuf>) {
        match self.orchestrator.export_report().await {
            Ok(report) => match save_report(&report, path.as_deref()) {
                Ok(written) => println!("Report saved to {}", written.display()),
                Err(e) => eprintln!("Could not save report: {e}"),
            },
            Err(e) => eprintln!("Report export failed: {e}"),
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        The Council AI - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Ask a strategic question, or /help for commands.");
        println!();
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  /execute          Hand the verdict to the execution squad");
        println!("  /diagram <path>   Save the decision map image");
        println!("  /report [path]    Export the board report document");
        println!("  /new              Discard the decision and start over");
        println!("  /quit             Exit");
    }
}
