//! Interactive dashboard shell
//!
//! Reads commands from stdin while analyses run in background tasks. Each
//! completion comes back over a channel and is applied through the dashboard,
//! which drops anything superseded by a newer request.

use crate::commands::Command;
use pulse_market::view::Completion;
use pulse_market::{Dashboard, DashboardRenderer};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;

struct Shell {
    dashboard: Dashboard,
    renderer: DashboardRenderer,
    title: String,
    tx: UnboundedSender<Completion>,
}

impl Shell {
    fn draw(&self) {
        println!("\n{}\n", self.renderer.render(&self.title, self.dashboard.state()));
    }

    fn prompt() {
        print!("pulse> ");
        let _ = std::io::stdout().flush();
    }

    fn search(&mut self, query: &str) {
        if let Some(pending) = self.dashboard.submit_search(query) {
            // Handle is dropped; the result arrives on the channel
            drop(self.dashboard.spawn(pending, self.tx.clone()));
            self.draw();
        }
    }

    fn start(&mut self, query: Option<&str>) {
        let pending = match query.and_then(|q| self.dashboard.submit_search(q)) {
            Some(pending) => pending,
            None => self.dashboard.start_initial(),
        };
        drop(self.dashboard.spawn(pending, self.tx.clone()));
        self.draw();
    }

    /// Returns `false` when the shell should exit
    fn handle(&mut self, command: Command) -> anyhow::Result<bool> {
        match command {
            Command::Search { query } => self.search(&query),
            Command::Refresh => match self.dashboard.refresh() {
                Some(pending) => {
                    drop(self.dashboard.spawn(pending, self.tx.clone()));
                    self.draw();
                }
                None => println!("An analysis is already running."),
            },
            Command::Dismiss => {
                self.dashboard.dismiss_error();
                self.draw();
            }
            Command::Json => match &self.dashboard.state().result {
                Some(result) => println!("{}", serde_json::to_string_pretty(result)?),
                None => println!("No analysis available yet."),
            },
            Command::Help => println!("{}", Command::help_text()),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

/// Run the shell until `/quit` or end of input
pub async fn run(
    dashboard: Dashboard,
    renderer: DashboardRenderer,
    title: String,
    query: Option<String>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut shell = Shell {
        dashboard,
        renderer,
        title,
        tx,
    };

    println!("{}", Command::help_text());
    shell.start(query.as_deref());
    Shell::prompt();

    loop {
        tokio::select! {
            Some(completion) = rx.recv() => {
                debug!("Completion for request {}", completion.id);
                shell.dashboard.complete(completion);
                shell.draw();
                Shell::prompt();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!("\nGoodbye!");
                    break;
                };

                if line.trim().is_empty() {
                    Shell::prompt();
                    continue;
                }

                match Command::parse(&line) {
                    Ok(command) => {
                        if !shell.handle(command)? {
                            println!("Goodbye!");
                            break;
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
                Shell::prompt();
            }
        }
    }

    Ok(())
}
