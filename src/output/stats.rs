//! Statistics reporting.

use console::style;

use crate::download::DownloadState;

/// Print statistics for a fan club run.
pub fn print_fan_club_stats(state: &DownloadState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "{}",
        style(format!("Statistics for fan club {}:", state.fan_club_id)).bold()
    );
    println!("  Pages:      {}", state.pages_scanned);
    println!("  Posts:      {}", state.posts_resolved);
    println!("  Planned:    {} items", state.items_planned);
    println!(
        "  Downloaded: {} ({} bytes)",
        style(state.downloaded).green(),
        state.bytes_downloaded
    );
    println!("  Denied:     {}", state.denied);
    if state.failed > 0 {
        println!("  Failed:     {}", style(state.failed).red());
    }
    println!(
        "  Archives:   {} expanded, {} corrupt",
        state.archives_expanded, state.archives_corrupt
    );
    println!(
        "  Extracted:  {} files ({} skipped), {} moved",
        state.entries_extracted, state.entries_skipped, state.files_consolidated
    );
    println!("{}", style("═".repeat(50)).dim());
}
