//! Full-screen TUI for Grove.

pub mod effects;
pub mod events;
pub mod input;
pub mod render;
pub mod runtime;
pub mod session_picker;
pub mod state;
pub mod terminal;
pub mod transcript;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
use grove_core::config::Config;
use grove_core::responder::Responder;
use grove_core::session::{SessionStore, Storage};
pub use runtime::TuiRuntime;

/// Runs the interactive chat loop.
pub async fn run_chat(config: &Config) -> Result<()> {
    // Chat mode requires a terminal to render the TUI
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Chat mode requires a terminal.\n\
             Use `grove send '...'` for non-interactive use."
        );
    }

    let storage = Storage::from_env();
    let store = SessionStore::load(storage.clone());
    let responder = Responder::from_config(config);

    // Print pre-TUI info to stderr (will be replaced by alternate screen)
    let mut err = stderr();
    writeln!(err, "Grove Chat")?;
    writeln!(err, "Responder: {}", config.responder_url)?;
    writeln!(err, "Sessions: {}", store.len())?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(store, responder, storage)?;
    runtime.run()?;

    // Print goodbye after TUI exits (terminal restored)
    writeln!(stderr(), "Goodbye!")?;

    Ok(())
}
