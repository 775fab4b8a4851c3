//! Whole-run pipeline for one fan club.

use crate::api::{Endpoints, Fetcher};
use crate::config::Config;
use crate::download::crawl::{crawl_fan_club, CrawlOptions};
use crate::download::media::Downloader;
use crate::download::state::DownloadState;
use crate::error::Result;
use crate::fs::{cleanup, consolidate, ArchiveExpander, EntryNameDecoder, ExtensionDenylist, OutputLayout};

/// Crawl, download, expand archives, consolidate and clean up.
///
/// Stages run strictly one after another; archive handling starts only once
/// every download has finished.
pub async fn download_fan_club(
    fetcher: &dyn Fetcher,
    config: &Config,
    state: &mut DownloadState,
) -> Result<()> {
    let fan_club_id = config.target.fan_club_id.as_str();
    let endpoints = Endpoints::new(&config.options.base_url)?;
    let layout = OutputLayout::from_config(config);
    let denylist = ExtensionDenylist::new(&config.options.denied_extensions);
    let decoder = EntryNameDecoder::for_label(&config.options.archive_name_encoding)?;

    let log_message = format!("fan club [{}] parse ", fan_club_id);
    tracing::info!("{}start.", log_message);

    let worklist = crawl_fan_club(
        fetcher,
        &endpoints,
        CrawlOptions {
            fan_club_id,
            mode: config.options.content_mode,
            max_page: config.options.max_page,
        },
        state,
    )
    .await?;
    tracing::info!("{} items to download", worklist.len());

    let downloader = Downloader::new(
        fetcher,
        &endpoints,
        &layout,
        &denylist,
        config.download_interval(),
    );
    downloader.download_worklist(&worklist, state).await?;

    let expander = ArchiveExpander::new(decoder, denylist.clone());
    let blocking_layout = layout.clone();
    let (summary, moved) = tokio::task::spawn_blocking(move || -> Result<_> {
        let summary =
            expander.expand_all(blocking_layout.staging_dir(), blocking_layout.temp_dir())?;
        let moved = consolidate(blocking_layout.temp_dir(), blocking_layout.fan_club_dir())?;
        cleanup(&blocking_layout)?;
        Ok((summary, moved))
    })
    .await??;

    state.add_expand_summary(&summary);
    state.files_consolidated += moved;

    tracing::info!("{}end.", log_message);
    Ok(())
}
