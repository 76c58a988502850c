use clap::Parser;
use sequencer::config::SequencerSettings;
use sequencer::engine::{Sequencer, SequencerOptions};
use sequencer::shutdown::{listen_for_signals, Shutdown};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = ::config::Cli::parse();
    let settings: SequencerSettings = ::config::load_config(&cli.config)?;
    ::config::init_logging(&settings.logging);

    let options = SequencerOptions {
        reply_timeout_ms: settings.sequencer.reply_timeout_ms,
        queue_soft_limit: settings.sequencer.queue_soft_limit,
    };

    tracing::info!(
        service = %settings.general.service_name,
        socket_dir = %settings.transport.socket_dir.display(),
        "sequencer starting"
    );

    let sequencer = Sequencer::bind(settings.transport, options).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(listen_for_signals(shutdown.clone()));

    sequencer.run(shutdown).await;
    tracing::info!("sequencer stopped");
    Ok(())
}
