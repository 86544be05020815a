use anyhow::Result;

use crate::auth::GoogleCredentials;
use crate::config::Config;

pub fn list_sources(config: &Config) -> Result<()> {
    let drive_status = match config.root_folder_id() {
        Ok(id) => (format!("folder {}", id), true),
        Err(_) => ("NOT CONFIGURED (FOLDER_ID)".to_string(), false),
    };

    let sheet_status = match config.spreadsheet_id() {
        Some(id) => (format!("{} {}", id, config.sheet.range), true),
        // optional, so an absent sheet is still healthy
        None => ("NOT CONFIGURED (optional)".to_string(), true),
    };

    let creds_status = match GoogleCredentials::from_env() {
        Ok(creds) => (creds.describe(), true),
        Err(e) => (format!("MISSING ({})", e), false),
    };

    let catalog_status = if config.catalog.output.exists() {
        (config.catalog.output.display().to_string(), true)
    } else {
        (
            format!("{} (not fetched yet)", config.catalog.output.display()),
            false,
        )
    };

    println!("{:<14} {:<8} STATUS", "SOURCE", "HEALTHY");
    println!("{:<14} {:<8} {}", "drive", drive_status.1, drive_status.0);
    println!("{:<14} {:<8} {}", "sheet", sheet_status.1, sheet_status.0);
    println!("{:<14} {:<8} {}", "credentials", creds_status.1, creds_status.0);
    println!("{:<14} {:<8} {}", "catalog", catalog_status.1, catalog_status.0);

    Ok(())
}
