//! `docstash serve` — Start the HTTP API server.

use docstash_config::AppConfig;

pub async fn run(
    mut config: AppConfig,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Docstash Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Store:     {}", config.store.path);
    println!("   Model:     {}", config.llm.model);
    println!(
        "   API key:   {}",
        if config.has_api_key() { "configured" } else { "missing" }
    );

    docstash_gateway::start(config).await?;

    Ok(())
}
