use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tasksheet::config::GlobalConfig;
use tasksheet::ports::FileSlot;
use tasksheet::store::SheetStore;
use tasksheet::tui::view::ViewModel;
use tasksheet::{logging, tui};

fn main() -> Result<()> {
    // Optional argument: path to the sheets data file
    let args: Vec<String> = std::env::args().collect();
    let override_path = match args.get(1).map(|s| s.as_str()) {
        Some("-h") | Some("--help") => {
            println!("Usage: tasksheet [SHEETS_FILE]");
            println!();
            println!("Terminal sheet-based task list manager.");
            println!("SHEETS_FILE overrides the default data file location.");
            return Ok(());
        }
        Some(path) => Some(PathBuf::from(path)),
        None => None,
    };

    // Absent config falls back to defaults inside load(); a present but
    // broken config is an error the user should see.
    let config = GlobalConfig::load()?;
    let data_dir = GlobalConfig::data_dir()?;
    let _log_guard = logging::init(&data_dir)?;

    let sheets_path = config.sheets_path(override_path)?;
    tracing::info!(path = %sheets_path.display(), "starting tasksheet");

    let slot = Arc::new(FileSlot::new(sheets_path));
    let view = Arc::new(ViewModel::new());

    let mut store = SheetStore::new(slot, view.clone());
    store.load()?;

    let mut app = tui::App::new(store, view, config.theme)?;
    app.run()?;

    Ok(())
}
