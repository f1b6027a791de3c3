// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names read by Modview

// Service Configuration
pub const MODVIEW_API_URL: &str = "MODVIEW_API_URL";

// Credential Storage
pub const MODVIEW_CREDENTIALS_PATH: &str = "MODVIEW_CREDENTIALS_PATH";
pub const MODVIEW_ADMIN_TOKEN: &str = "MODVIEW_ADMIN_TOKEN";

// Logging
pub const MODVIEW_LOG: &str = "MODVIEW_LOG";
pub const MODVIEW_LOG_FILE: &str = "MODVIEW_LOG_FILE";

// System Environment Variables
pub const HOME: &str = "HOME";

// Defaults
pub const DEFAULT_API_URL: &str = "http://localhost:7000";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const CONFIG_DIR_NAME: &str = ".modview";
pub const CREDENTIALS_FILE_NAME: &str = "credentials.toml";
pub const LOG_FILE_NAME: &str = "modview.log";
