//! Exploration session command.

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::catalog::CatalogApi;
use crate::config::Config;
use crate::error::ResultExt;
use crate::explorer::{Explorer, ExplorerEvent, FailurePolicy, SessionSummary, Shutdown};

use super::{CredentialArgs, build_client};

/// Walk the related-artists graph until the frontier is exhausted or Ctrl-C
pub fn cmd_explore(
    rt: &Runtime,
    config: &Config,
    credentials: &CredentialArgs,
    seeds: &[String],
    jsonl: bool,
    on_error: Option<FailurePolicy>,
) -> anyhow::Result<()> {
    let client = build_client(config, credentials)?;

    let mut settings = config.explorer.to_explorer_config();
    if let Some(policy) = on_error {
        settings.failure_policy = policy;
    }

    let mut explorer = Explorer::new(client, settings);
    let summary = rt.block_on(run_session(&mut explorer, seeds, jsonl))?;

    print_summary(&summary);
    Ok(())
}

async fn run_session<C: CatalogApi>(
    explorer: &mut Explorer<C>,
    seeds: &[String],
    jsonl: bool,
) -> anyhow::Result<SessionSummary> {
    let (trigger, shutdown) = Shutdown::new();
    explorer.set_shutdown(shutdown);

    let (tx, rx) = mpsc::channel(256);
    explorer.set_event_sender(tx);
    let printer = tokio::spawn(print_events(rx, jsonl));

    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!(target: "explorer", "Interrupted, stopping after the current request");
            trigger.trigger();
        }
    });

    let result = if seeds.is_empty() {
        explorer.run().await
    } else {
        tracing::info!(target: "explorer", "Exploring from {} given seeds", seeds.len());
        explorer.seed_with(seeds.iter().cloned());
        explorer.explore().await
    };

    ctrl_c.abort();
    // The Finished event is the last one sent; wait for the printer to drain.
    explorer.close_events();
    let _ = printer.await;

    Ok(result.with_context("exploration session")?)
}

/// Stream recorded artists to stdout as they are found
async fn print_events(mut rx: mpsc::Receiver<ExplorerEvent>, jsonl: bool) {
    while let Some(event) = rx.recv().await {
        match event {
            ExplorerEvent::ArtistRecorded(artist) if jsonl => {
                match serde_json::to_string(&artist) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::warn!("Failed to serialize artist {}: {}", artist.id, e),
                }
            }
            ExplorerEvent::Cooldown {
                elapsed,
                requests_sent,
                artists,
            } if !jsonl => {
                println!(
                    "  {} artists after {} requests ({:.0}s), cooling down",
                    artists,
                    requests_sent,
                    elapsed.as_secs_f64()
                );
            }
            ExplorerEvent::SeedsReady {
                collections,
                artists,
            } if !jsonl => {
                println!(
                    "Seeded {} artists from {} featured playlists",
                    artists, collections
                );
            }
            _ => {}
        }
    }
}

fn print_summary(summary: &SessionSummary) {
    eprintln!();
    if summary.cancelled {
        eprintln!("✗ Exploration interrupted");
    } else {
        eprintln!("✓ Exploration complete");
    }
    eprintln!("  Artists:        {}", summary.artists_recorded);
    eprintln!("  Seeds:          {}", summary.seeds);
    eprintln!("  Expanded:       {}", summary.expansions);
    eprintln!("  Requests:       {}", summary.requests_sent);
    eprintln!("  Rate limits:    {}", summary.rate_limits);
    eprintln!("  Token renewals: {}", summary.credential_refreshes);
    eprintln!("  Cooldowns:      {}", summary.cooldowns);
    if summary.skipped > 0 {
        eprintln!("  Skipped:        {}", summary.skipped);
    }
    if let Some(started_at) = summary.started_at {
        eprintln!("  Started:        {}", started_at.to_rfc3339());
    }
    eprintln!("  Elapsed:        {:.1}s", summary.elapsed.as_secs_f64());
}
