mod config;

use clap::Parser;
use config::MessageLoggerSettings;
use network::SubSocket;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = ::config::Cli::parse();
    let settings: MessageLoggerSettings = ::config::load_config(&cli.config)?;
    ::config::init_logging(&settings.logging);

    tracing::info!(
        service = %settings.general.service_name,
        directory = %settings.archive.directory.display(),
        "message logger starting"
    );

    let mut sub = SubSocket::connect(settings.transport.sequencer_publish_path()).await?;
    let mut writer =
        archival::DailyGzipJsonWriter::new(settings.archive.directory, settings.archive.prefix)?;

    loop {
        let received = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                break;
            }
            frame = sub.recv() => frame,
        };

        let bytes = match received {
            Ok(bytes) => bytes,
            Err(network::TransportError::PeerClosed) => {
                tracing::warn!("sequencer closed the publish socket, stopping");
                break;
            }
            Err(error) => {
                tracing::error!(%error, "failed to read from publish socket");
                break;
            }
        };

        let envelope = match codec::decode(&bytes) {
            Ok(envelope) => envelope,
            Err(error) => {
                tracing::error!(%error, "dropping undecodable published message");
                continue;
            }
        };

        if let Err(error) = writer.write(&envelope) {
            tracing::error!(%error, "failed to archive envelope");
        }
    }

    writer.close()?;
    tracing::info!("message logger stopped");
    Ok(())
}
