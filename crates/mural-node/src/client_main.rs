//! Mural interactive client

use std::io::{self, Write};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use mural_core::{MuralResult, PeerAddr};
use mural_node::client::BoardClient;
use mural_wire::Response;

#[derive(Parser)]
#[command(name = "mural-client", about = "Interactive client for a mural hub")]
struct Cli {
    /// Hub host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Hub port
    port: u16,
}

type Input = Lines<BufReader<Stdin>>;

async fn ask(input: &mut Input, label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    Ok(input.next_line().await?.map(|l| l.trim_end().to_string()))
}

fn show(result: MuralResult<Response>) -> MuralResult<()> {
    let resp = result?;
    match serde_json::to_string_pretty(&resp) {
        Ok(json) => println!("\n< hub response >\n{json}\n------------------"),
        Err(e) => println!("could not render response: {e}"),
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  login  - Authenticate on this connection");
    println!("  post   - Publish a message (requires login)");
    println!("  read   - Show every post on the hub's board");
    println!("  quit   - Close the client");
}

async fn session(client: &mut BoardClient, input: &mut Input) -> io::Result<MuralResult<()>> {
    loop {
        let Some(line) = ask(input, "client> ").await? else {
            return Ok(Ok(()));
        };
        let result = match line.trim().to_ascii_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" => return Ok(Ok(())),
            "help" => {
                print_help();
                continue;
            }
            "read" => show(client.read().await),
            "login" => {
                let Some(user) = ask(input, "  user: ").await? else {
                    return Ok(Ok(()));
                };
                let Some(pass) = ask(input, "  password: ").await? else {
                    return Ok(Ok(()));
                };
                show(client.login(&user, &pass).await)
            }
            "post" => {
                if client.logged_in_as().is_none() {
                    println!("you need to login before posting");
                    continue;
                }
                let Some(message) = ask(input, "  message: ").await? else {
                    return Ok(Ok(()));
                };
                if message.is_empty() {
                    continue;
                }
                show(client.post(&message).await)
            }
            _ => {
                println!("unknown command, type 'help'");
                continue;
            }
        };
        if let Err(e) = result {
            return Ok(Err(e));
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let hub = PeerAddr::new(cli.host, cli.port);

    let mut client = match BoardClient::connect(&hub).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("could not connect to hub at {hub}: {e}");
            std::process::exit(1);
        }
    };
    println!("Connected to hub at {hub}. Type 'help' for commands.");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    match session(&mut client, &mut input).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            eprintln!("connection to hub lost: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("failed to read input: {e}");
            std::process::exit(1);
        }
    }
}
