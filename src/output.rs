//! Table and JSON output formatting for CLI commands.

use std::sync::Mutex;

use serde::Serialize;
use tabled::{Table, Tabled};

use admissions_core::traits::Notifier;
use admissions_core::types::{Notice, NoticeLevel};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{item:#?}");
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print an informational message
pub fn print_info(msg: &str) {
    println!("ℹ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

/// Last error shown through [`ConsoleNotifier`].
static LAST_NOTIFIED_ERROR: Mutex<Option<String>> = Mutex::new(None);

/// Whether `message` was already shown as an error notice.
pub fn already_reported(message: &str) -> bool {
    LAST_NOTIFIED_ERROR
        .lock()
        .map(|last| last.as_deref() == Some(message))
        .unwrap_or(false)
}

/// Shows service notices on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => print_success(&notice.message),
            NoticeLevel::Info => print_info(&notice.message),
            NoticeLevel::Error => {
                print_error(&notice.message);
                if let Ok(mut last) = LAST_NOTIFIED_ERROR.lock() {
                    *last = Some(notice.message);
                }
            }
        }
    }
}
