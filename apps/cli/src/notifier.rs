//! # Terminal Notifier
//!
//! Shows cart notices on stderr, the CLI's stand-in for toasts.

use rocketshoes_store::{CartNotice, CartNotifier};

/// Writes each notice to stderr as a single line.
pub struct TerminalNotifier;

impl CartNotifier for TerminalNotifier {
    fn notify(&self, notice: CartNotice) {
        eprintln!("{}", format_notice(notice));
    }
}

fn format_notice(notice: CartNotice) -> String {
    format!("⚠ {}", notice.message())
}
