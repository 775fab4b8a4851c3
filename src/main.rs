//! Fantia Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use fantia_downloader::{
    api::{Endpoints, FantiaClient},
    cli::Args,
    config::{validate_config, Config},
    download::{download_fan_club, DownloadState},
    error::{exit_codes, Error, Result},
    output::{
        init_logging, print_banner, print_config_summary, print_error, print_fan_club_stats,
        print_info, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Http(_) | Error::HttpStatus { .. } | Error::MalformedResponse(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_) | Error::CorruptArchive(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging; the guard flushes the log file when run() returns
    let _log_guard = init_logging(args.debug, args.log_file.as_deref())?;

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    print_config_summary(
        &config.target.fan_club_id,
        &config.options.content_mode.to_string(),
        &config.fan_club_directory().display().to_string(),
        config.options.max_page,
    );

    let endpoints = Endpoints::new(&config.options.base_url)?;
    let client = FantiaClient::new(
        &config.account.session_id,
        &config.account.user_agent,
        endpoints.root(),
        config.options.show_downloads,
    )?;

    let mut state = DownloadState::new(config.target.fan_club_id.clone());
    let result = download_fan_club(&client, &config, &mut state).await;

    if let Err(e) = &result {
        tracing::error!("fan club [{}] failed: {:?}", state.fan_club_id, e);
    }

    print_fan_club_stats(&state);
    result
}
