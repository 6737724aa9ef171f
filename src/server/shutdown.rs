//! Process-wide Ctrl+C handling.
//!
//! While a preview server runs, Ctrl+C asks it to stop and control returns
//! to the caller. Anywhere else it ends the process with status 130.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use crate::ui;

static SERVING: AtomicBool = AtomicBool::new(false);
static STOP: AtomicBool = AtomicBool::new(false);
static INSTALL: Once = Once::new();

/// Exit status used when the user interrupts outside the server.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Installs the Ctrl+C handler. Safe to call more than once.
pub fn install_handler() {
    INSTALL.call_once(|| {
        let result = ctrlc::set_handler(|| {
            println!();
            if SERVING.load(Ordering::SeqCst) {
                ui::info("Stopping server...");
                STOP.store(true, Ordering::SeqCst);
            } else {
                ui::info("Interrupted");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        });
        if let Err(e) = result {
            tracing::warn!("failed to install Ctrl+C handler: {}", e);
        }
    });
}

/// Flag raised when the running server should stop.
pub fn stop_flag() -> &'static AtomicBool {
    &STOP
}

/// Marks a server as running for as long as it is alive.
pub struct ServingGuard(());

impl ServingGuard {
    pub fn enter() -> Self {
        STOP.store(false, Ordering::SeqCst);
        SERVING.store(true, Ordering::SeqCst);
        Self(())
    }
}

impl Drop for ServingGuard {
    fn drop(&mut self) {
        SERVING.store(false, Ordering::SeqCst);
    }
}
