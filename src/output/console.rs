//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Fantia Downloader                                 ║
║     Fan club photos and files, flattened              ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(fan_club_id: &str, content_mode: &str, download_dir: &str, max_page: u32) {
    let pages = if max_page > 0 {
        max_page.to_string()
    } else {
        "auto".to_string()
    };

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Fan club: {}", fan_club_id);
    println!("  Mode: {}", content_mode);
    println!("  Pages: {}", pages);
    println!("  Directory: {}", download_dir);
    println!();
}
