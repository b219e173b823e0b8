/// Log tags identifying the subsystem a message originates from
///
/// Each tag maps to a `--debug-<key>` command-line flag via `to_debug_key`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTag {
    /// Startup, shutdown, top-level lifecycle
    System,
    /// Monitor loop: ticks, diffs, commits
    Monitor,
    /// Portal client: login, counter and detail fetches
    Portal,
    /// Country/service metadata resolution
    Resolver,
    /// Telegram transport: notifications, commands, polling
    Telegram,
    /// Status API
    Webserver,
    /// Free-form tag for tests and one-off contexts
    Other(String),
}

impl LogTag {
    /// Key used in `--debug-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Monitor => "monitor".to_string(),
            LogTag::Portal => "portal".to_string(),
            LogTag::Resolver => "resolver".to_string(),
            LogTag::Telegram => "telegram".to_string(),
            LogTag::Webserver => "webserver".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored column label for file output
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Monitor => "MONITOR".to_string(),
            LogTag::Portal => "PORTAL".to_string(),
            LogTag::Resolver => "RESOLVER".to_string(),
            LogTag::Telegram => "TELEGRAM".to_string(),
            LogTag::Webserver => "WEBSERVER".to_string(),
            LogTag::Other(s) => s.to_uppercase(),
        }
    }
}
