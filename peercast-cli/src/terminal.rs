use colored::*;
use peercast_client::{LocalStream, LogEntry, LogLevel, Presenter, RemoteStream, SessionLog};
use tracing::debug;

const REPORT_EVERY: u64 = 300;

/// Prints what would otherwise be rendered into video elements.
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn show_local(&self, stream: &LocalStream) {
        println!(
            "{} {} ({} track(s))",
            "▶ Sharing".green().bold(),
            stream.id,
            stream.tracks.len()
        );
    }

    fn show_remote(&self, stream: RemoteStream) {
        println!(
            "{} {} track from stream {}",
            "◀ Receiving".cyan().bold(),
            stream.kind,
            stream.stream_id
        );

        let Some(track) = stream.track else {
            return;
        };
        tokio::spawn(async move {
            let mut packets = 0u64;
            let mut bytes = 0u64;
            loop {
                match track.read_rtp().await {
                    Ok((packet, _)) => {
                        packets += 1;
                        bytes += packet.payload.len() as u64;
                        if packets % REPORT_EVERY == 0 {
                            println!(
                                "{}",
                                format!("  {} packets, {} KiB received", packets, bytes / 1024)
                                    .dimmed()
                            );
                        }
                    }
                    Err(e) => {
                        debug!("Remote track ended: {}", e);
                        break;
                    }
                }
            }
        });
    }
}

fn render(entry: &LogEntry) -> ColoredString {
    let line = format!("[{:>5}] {}", entry.level.to_string(), entry.text);
    match entry.level {
        LogLevel::Debug => line.dimmed(),
        LogLevel::Info => line.normal(),
        LogLevel::Warn => line.yellow(),
        LogLevel::Error => line.red().bold(),
    }
}

/// Follows the session log and prints every line as it is appended.
pub async fn print_log(log: SessionLog, verbose: bool) {
    let mut cursor = log.cursor(0);
    loop {
        let entry = cursor.next().await;
        if entry.level == LogLevel::Debug && !verbose {
            continue;
        }
        println!("{}", render(&entry));
    }
}
