use clap::Parser;
use finchain_orchestrator::{agents::create_default_agents, orchestrator::Orchestrator};
use std::io::{self, BufRead, Write};
use tracing::info;

/// FinChain Intelligence Network Demo
#[derive(Parser, Debug)]
#[command(name = "finchain", about = "FinChain Intelligence Network Demo")]
struct Args {
    /// Query to process
    #[arg(long)]
    query: Option<String>,

    /// Run in interactive mode
    #[arg(long)]
    interactive: bool,
}

async fn process_user_query(orchestrator: &Orchestrator, query: &str) {
    match orchestrator.process_query(query).await {
        Ok(response) => {
            println!("\n{}", "=".repeat(80));
            print!("{}", response);
            println!("{}\n", "=".repeat(80));
        }
        Err(e) => {
            eprintln!("Query failed: {}", e);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("FinChain Intelligence Network starting");

    // Create the orchestrator and register all specialized agents
    let orchestrator = Orchestrator::new();
    for agent in create_default_agents() {
        orchestrator.register_agent(agent).await;
    }

    println!("\nFinChain Intelligence Network (FIN) Demo");
    println!("{}", "=".repeat(50));
    println!(
        "Registered Agents: {}",
        orchestrator.get_registered_agents().await.join(", ")
    );
    println!("{}\n", "=".repeat(50));

    if let Some(query) = args.query.as_deref() {
        process_user_query(&orchestrator, query).await;
    }

    if args.interactive || args.query.is_none() {
        println!("Interactive Mode: Enter queries or 'exit' to quit.\n");

        let stdin = io::stdin();
        loop {
            print!("Enter your query: ");
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            let query = line.trim();
            if matches!(query.to_lowercase().as_str(), "exit" | "quit" | "q") {
                break;
            }
            if query.is_empty() {
                continue;
            }

            process_user_query(&orchestrator, query).await;
        }
    }

    Ok(())
}
