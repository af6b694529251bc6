/// Driver configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// FEN to start from instead of the standard initial position.
    pub start_fen: Option<String>,
    /// Print the board after every accepted move.
    pub show_board: bool,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

const DEFAULT_LOG_FILTER: &str = "chess_rules=info";

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        AppConfig {
            start_fen: lookup("CHESS_START_FEN")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            show_board: lookup("CHESS_SHOW_BOARD")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            log_filter: lookup("CHESS_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            start_fen: None,
            show_board: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
