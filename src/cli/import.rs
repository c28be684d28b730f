//! `import`/`batch-import` subcommands: read a song list, run it through
//! Input Parser → Coordinator → Aggregator, write the report, and create a
//! playlist from whatever matched.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::catalog::{CatalogClient, auth};
use crate::config::Config;
use crate::error::{CoreError, PlaylistError};
use crate::normalize::Normalizer;
use crate::types::Summary;
use crate::{aggregator, coordinator, parser, report, success, warning};

/// Options shared by `import` and `batch-import`; the two subcommands differ
/// only in which config defaults clap fills in before this runs.
pub struct ImportArgs {
    pub input_path: String,
    pub playlist_name: String,
    pub public: bool,
    pub description: String,
    pub output_report: Option<String>,
}

pub async fn import(config: Config, args: ImportArgs) -> Result<Summary, CoreError> {
    let input =
        fs::read_to_string(&args.input_path).map_err(|e| CoreError::Input(format!("{}: {}", args.input_path, e)))?;

    let config = Arc::new(config);
    let normalizer = Arc::new(Normalizer::new(4096));

    let token_manager = auth::TokenManager::load(&config.token_cache_path)
        .await
        .map_err(|e| CoreError::Input(format!("no valid session; run `sporl auth` first: {e}")))?;
    let catalog = Arc::new(CatalogClient::new(Arc::clone(&config), token_manager));

    // Ctrl-C stops new queue acceptance and aborts in-flight retries at their
    // next backoff wait (§4.5); already-matched results are still reported.
    let cancel_on_interrupt = {
        let cancel = catalog.cancellation();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let outcomes = parser::parse_lines(&input);

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Matching {} songs against the catalog...", outcomes.len()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let results = coordinator::run(Arc::clone(&config), Arc::clone(&normalizer), Arc::clone(&catalog), outcomes).await;
    let (results, summary) = aggregator::aggregate(results);

    pb.finish_and_clear();
    cancel_on_interrupt.abort();

    let rendered = report::render(&results, &summary);
    match &args.output_report {
        Some(path) => fs::write(path, &rendered).map_err(|e| CoreError::Fatal(format!("writing report: {e}")))?,
        None => println!("{rendered}"),
    }

    let uris: Vec<String> = results.iter().filter_map(|r| r.matched.as_ref().map(|m| m.uri.clone())).collect();

    if uris.is_empty() {
        warning!("No tracks matched; skipping playlist creation.");
        return Ok(summary);
    }

    let user_id = catalog
        .current_user_id()
        .await
        .map_err(|source| CoreError::Playlist(PlaylistError::Creation { name: args.playlist_name.clone(), source }))?;

    let created = catalog
        .create_playlist(&user_id, &args.playlist_name, &args.description, args.public)
        .await
        .map_err(|source| CoreError::Playlist(PlaylistError::Creation { name: args.playlist_name.clone(), source }))?;

    catalog
        .add_tracks(&created.id, &uris)
        .await
        .map_err(|e| CoreError::Playlist(PlaylistError::AddTracks(e)))?;

    success!("Created playlist {:?} with {} tracks.", created.name, uris.len());

    Ok(summary)
}
