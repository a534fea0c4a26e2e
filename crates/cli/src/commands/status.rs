//! `docstash status` — Show configuration and store status.

use docstash_config::AppConfig;
use docstash_core::store::DocumentStore;
use docstash_store::SqliteStore;

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Docstash Status");
    println!("===============");
    println!("  Store path:  {}", config.store.path);
    println!("  Gateway:     {}:{}", config.gateway.host, config.gateway.port);
    println!("  Static dir:  {}", config.gateway.static_dir);
    println!("  LLM:         {} @ {}", config.llm.model, config.llm.base_url);
    println!(
        "  API key:     {}",
        if config.has_api_key() { "configured" } else { "missing" }
    );

    match SqliteStore::new(&config.store.path).await {
        Ok(store) => println!("  Documents:   {}", store.count().await?),
        Err(e) => println!("  Documents:   unavailable ({e})"),
    }

    Ok(())
}
