//! Compose usage example for the FaaS gateway client
//!
//! Deploys nothing; it lists the gateway's functions, then pipes an input
//! through the functions named on the command line.
//!
//! To run this example:
//! ```bash
//! export FAAS_GATEWAY="http://localhost:8080"
//! export FAAS_USER="admin" FAAS_PASS="secret"   # Optional
//! RUST_LOG=faas_client=debug cargo run --example compose_usage -- "hello" uppercase reverse
//! ```

use anyhow::Context;
use faas_client::{CancellationToken, GatewayClient, GatewayConfig, RequestOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next().context("usage: compose_usage <input> <function>...")?;
    let functions: Vec<String> = args.collect();

    let client = GatewayClient::from_config(GatewayConfig::from_env()?)?;

    println!("=== Deployed functions ===\n");
    for function in client.list_functions(&RequestOptions::default()).await? {
        println!(
            "{:<24} {:<40} replicas={} invocations={}",
            function.name, function.image, function.replicas, function.invocation_count
        );
    }

    println!("\n=== Composition: {} ===\n", functions.join(" | "));

    // Ctrl-C aborts the chain between or during steps
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let result = client
        .compose_with(
            Some(input.into()),
            &functions,
            &RequestOptions::default(),
            &cancel,
        )
        .await?;

    println!("Status: {}", result.status());
    println!("Body: {:?}", result.body());

    Ok(())
}
