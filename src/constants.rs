/// Package name.
pub(crate) const PKG_NAME: &str = env!("CARGO_PKG_NAME");
/// Default configuration file name.
pub(crate) const CONFIG_NAME: &str = "config.toml";
/// Log file name inside the log directory; the appender adds a date suffix.
pub const LOG_FILE_NAME: &str = "lmbackup.log";
/// Default backup directory, relative to home.
pub(crate) const DEFAULT_BACKUP_DIR: &str = "~/icloud/backup";

/// macOS Finder metadata, never worth backing up.
pub(crate) const DS_STORE: &str = ".DS_Store";
/// Homebrew bundle manifest name inside the backup directory.
pub(crate) const BREWFILE_NAME: &str = "Brewfile";
/// Virtual environment folders pruned by the secrets scanner.
pub(crate) const VENV_DIR: &str = ".venv";
/// File names the secrets scanner looks for when none are configured.
pub const DEFAULT_SECRET_PATTERNS: [&str; 2] = [".env", ".secrets.toml"];
/// The shell history database kept by atuin.
pub(crate) const EMBEDDED_DB: &str = ".local/share/atuin/history.db";
