// src/constants.rs
//
// Application-wide defaults. Each constant is documented with its purpose
// and where it is used.

/// Server the client talks to when neither config nor `--base-url` names one.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Per-request timeout in seconds.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Period between two unread-count requests while watching notifications.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Characters of an idea description shown in the terminal list view.
///
/// Used in: `ports/text.rs`
pub const LIST_SUMMARY_CHARS: usize = 60;

/// Delay in milliseconds after writing HTML file before opening browser.
///
/// On macOS, the browser needs a brief moment for the file to be fully written
/// and indexed before opening. Without this delay, the browser may open an empty
/// or incomplete file.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 500;
