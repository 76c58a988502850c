mod config;
mod handler;

use clap::Parser;
use handler::QuoterHandler;
use torq_strategy_shared::StrategyEndpoint;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = ::config::Cli::parse();
    let cfg: config::QuoterConfig = ::config::load_config(&cli.config)?;
    ::config::init_logging(&cfg.logging);

    let connection_id = cfg.strategy.connection_id.clone();
    let symbol = cfg
        .strategy
        .symbols
        .first()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("quoter requires exactly one configured symbol"))?;

    let rep_path = cfg.transport.strategy_reply_path(&connection_id);
    let ingress_path = cfg.transport.sequencer_ingress_path();

    let handler = QuoterHandler::new(
        cfg.quoter.exchange.clone(),
        symbol,
        cfg.quoter.min_requote_interval_ns,
        cfg.quoter.price_tick,
        cfg.quoter.quantity,
    );

    tracing::info!(%connection_id, "quoter starting");
    let endpoint = StrategyEndpoint::bind(connection_id, rep_path, ingress_path, handler).await?;
    endpoint.run().await?;
    Ok(())
}
