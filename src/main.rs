use std::net::SocketAddr;

use study_forge::{
    config::Config,
    generation::GenerationClient,
    llm::LLM,
    services::GenerationService,
    utils::init_logger,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);
    info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        max_attempts = config.llm.max_attempts,
        "Generation model configured"
    );

    // One client for the whole process, shared by every request.
    let llm = LLM::from_config(&config.llm)?;
    let client = GenerationClient::new(llm, &config.llm);
    let generation = GenerationService::new(client, config.generation.summary_format);

    let state = AppState {
        config: config.clone(),
        generation,
    };
    let app = study_forge::create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
