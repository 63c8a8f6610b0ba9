//! Administrative console of a running hub
//!
//! Reads one command per stdin line. Everything here goes through the node's
//! public operations; the console holds no state of its own.

use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use mural_core::MuralError;
use mural_runtime::Node;

const PROMPT: &str = "hub> ";

const HELP: &str = "\
Commands:
  status      - Show hub state, board size and counters
  list        - Print the local board ordered by creation time
  deactivate  - Simulate an outage: reject every request
  activate    - Resume serving requests
  reconcile   - Pull missing posts from the first reachable hub
  help        - Show this help
  quit        - Stop the hub";

/// Console command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Status,
    List,
    Deactivate,
    Activate,
    Reconcile,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(Command::Status),
            "list" | "ls" => Ok(Command::List),
            "deactivate" => Ok(Command::Deactivate),
            "activate" => Ok(Command::Activate),
            "reconcile" => Ok(Command::Reconcile),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{other}', type 'help'")),
        }
    }
}

/// Run one command and render its output
pub async fn execute(node: &Node, command: Command) -> String {
    match command {
        Command::Status => node.status().to_string(),
        Command::List => render_board(node),
        Command::Deactivate => {
            if node.deactivate() {
                "[!] hub deactivated: requests are rejected and nothing is propagated".to_string()
            } else {
                "hub is already inactive".to_string()
            }
        }
        Command::Activate => {
            if node.activate() {
                "[*] hub activated: run 'reconcile' to catch up".to_string()
            } else {
                "hub is already active".to_string()
            }
        }
        Command::Reconcile => match node.reconcile().await {
            Ok(outcome) => outcome.to_string(),
            Err(MuralError::NodeInactive) => {
                "hub is inactive, activate it before reconciling".to_string()
            }
            Err(e) => format!("reconciliation failed: {e}"),
        },
        Command::Help => HELP.to_string(),
        Command::Quit => "stopping hub".to_string(),
    }
}

fn render_board(node: &Node) -> String {
    let posts = node.board_for_display();

    let mut out = String::from("--- local board ---\n");
    if posts.is_empty() {
        out.push_str("(empty)\n");
    }
    for post in &posts {
        out.push_str("  ");
        out.push_str(&post.display_line());
        out.push('\n');
    }
    out.push_str("-------------------");
    out
}

fn prompt() {
    print!("{PROMPT}");
    let _ = io::stdout().flush();
}

/// Read commands from stdin until `quit`.
///
/// If stdin closes, the console goes quiet and the hub keeps serving.
pub async fn run(node: Arc<Node>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    prompt();
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        println!("{}", execute(&node, command).await);
                        if command == Command::Quit {
                            return;
                        }
                    }
                    Err(hint) => println!("{hint}"),
                }
                prompt();
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read console input");
                break;
            }
        }
    }

    tracing::info!("console input closed, serving until interrupted");
    std::future::pending::<()>().await
}
