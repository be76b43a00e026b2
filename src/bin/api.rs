use finchain_orchestrator::{
    agents::create_default_agents, api::start_server, orchestrator::Orchestrator,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("FinChain Intelligence Network - API Server");
    info!("Port: {}", api_port);

    // Create the orchestrator and register all specialized agents
    let orchestrator = Arc::new(Orchestrator::new());
    for agent in create_default_agents() {
        orchestrator.register_agent(agent).await;
    }

    info!(
        agent_count = orchestrator.get_registered_agents().await.len(),
        "Orchestrator initialized"
    );

    // Start API server
    start_server(orchestrator, api_port).await?;

    Ok(())
}
