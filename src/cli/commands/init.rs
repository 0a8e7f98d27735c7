use crate::config::{Config, Paths};
use crate::errors::AppResult;
use crate::store::Store;
use crate::ui::messages::{info, success};
use std::fs;

const CHARACTERS_TEMPLATE: &str = "# one character name per line\n";

/// Handle the `init` command
///
/// Creates config/, data/ and reports/ under the root, writes the default
/// configuration and the log headers. Existing files are left untouched.
pub fn handle(paths: &Paths) -> AppResult<()> {
    fs::create_dir_all(paths.config_dir())?;
    fs::create_dir_all(paths.data_dir())?;
    fs::create_dir_all(paths.reports_dir())?;

    if paths.config_file().exists() {
        info(format!("Config file kept: {}", paths.config_file().display()));
    } else {
        Config::default().save(paths)?;
        success(format!("Config file: {}", paths.config_file().display()));
    }

    if !paths.characters_file().exists() {
        fs::write(paths.characters_file(), CHARACTERS_TEMPLATE)?;
        info(format!(
            "Add tracked characters to {}",
            paths.characters_file().display()
        ));
    }

    Store::open(&paths.data_dir())?;
    success(format!("Data directory: {}", paths.data_dir().display()));

    Ok(())
}
