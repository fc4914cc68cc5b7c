//! Logging utilities
//!
//! Maps the tool's numeric verbosity onto a tracing filter and onto the set
//! of AWS SDK log categories ([`ClientLogMode`]) that are switched on.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Verbosity used when none is configured (info)
pub const DEFAULT_VERBOSITY: u8 = 3;

/// Verbosity from which SDK request/response bodies are logged
pub const AWS_DEBUG_LEVEL: u8 = 5;

/// Bitmask of AWS SDK log categories
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClientLogMode(u8);

impl ClientLogMode {
    pub const LOG_SIGNING: ClientLogMode = ClientLogMode(1 << 0);
    pub const LOG_RETRIES: ClientLogMode = ClientLogMode(1 << 1);
    pub const LOG_REQUEST: ClientLogMode = ClientLogMode(1 << 2);
    pub const LOG_REQUEST_WITH_BODY: ClientLogMode = ClientLogMode(1 << 3);
    pub const LOG_RESPONSE: ClientLogMode = ClientLogMode(1 << 4);
    pub const LOG_RESPONSE_WITH_BODY: ClientLogMode = ClientLogMode(1 << 5);
    pub const LOG_DEPRECATED_USAGE: ClientLogMode = ClientLogMode(1 << 6);
    pub const LOG_REQUEST_EVENT_MESSAGE: ClientLogMode = ClientLogMode(1 << 7);

    const NAMES: [(ClientLogMode, &'static str); 8] = [
        (Self::LOG_SIGNING, "LogSigning"),
        (Self::LOG_RETRIES, "LogRetries"),
        (Self::LOG_REQUEST, "LogRequest"),
        (Self::LOG_REQUEST_WITH_BODY, "LogRequestWithBody"),
        (Self::LOG_RESPONSE, "LogResponse"),
        (Self::LOG_RESPONSE_WITH_BODY, "LogResponseWithBody"),
        (Self::LOG_DEPRECATED_USAGE, "LogDeprecatedUsage"),
        (Self::LOG_REQUEST_EVENT_MESSAGE, "LogRequestEventMessage"),
    ];

    pub const fn empty() -> Self {
        ClientLogMode(0)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: ClientLogMode) -> bool {
        self.0 & other.0 == other.0
    }

    /// Log mode for the given verbosity
    ///
    /// Retries are always logged. At [`AWS_DEBUG_LEVEL`] and above, request and
    /// response bodies and event-stream messages are added on top.
    pub fn for_verbosity(verbosity: u8) -> Self {
        let mut mode = Self::LOG_RETRIES;
        if verbosity >= AWS_DEBUG_LEVEL {
            mode |= Self::LOG_REQUEST_WITH_BODY
                | Self::LOG_REQUEST_EVENT_MESSAGE
                | Self::LOG_RESPONSE_WITH_BODY;
        }
        mode
    }

    /// `EnvFilter` directives enabling the SDK log targets for this mode
    pub fn directives(&self) -> Vec<&'static str> {
        let mut directives = Vec::new();
        if self.contains(Self::LOG_SIGNING) {
            directives.push("aws_sigv4=debug");
        }
        if self.contains(Self::LOG_RETRIES) {
            directives.push("aws_smithy_runtime::client::retries=debug");
        }
        if self.contains(Self::LOG_REQUEST) || self.contains(Self::LOG_RESPONSE) {
            directives.push("aws_smithy_runtime::client::orchestrator=debug");
        }
        if self.contains(Self::LOG_REQUEST_WITH_BODY) || self.contains(Self::LOG_RESPONSE_WITH_BODY) {
            directives.push("aws_smithy_runtime::client::orchestrator=trace");
            directives.push("aws_smithy_runtime::client::http=trace");
        }
        if self.contains(Self::LOG_DEPRECATED_USAGE) {
            directives.push("aws_config=warn");
        }
        if self.contains(Self::LOG_REQUEST_EVENT_MESSAGE) {
            directives.push("aws_smithy_eventstream=trace");
        }
        directives
    }
}

impl BitOr for ClientLogMode {
    type Output = ClientLogMode;

    fn bitor(self, rhs: Self) -> Self::Output {
        ClientLogMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for ClientLogMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ClientLogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientLogMode({})", self)
    }
}

impl fmt::Display for ClientLogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

/// Tracing level for a verbosity value
///
/// 0 silences output, 1 errors, 2 warnings, 3 info, 4 debug, 5 and above trace.
pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build the filter for the given verbosity and SDK log mode
///
/// The crate itself logs at the verbosity level; other crates stay at `warn`
/// unless the log mode enables one of their targets.
pub fn build_filter(verbosity: u8, log_mode: ClientLogMode) -> EnvFilter {
    if verbosity == 0 {
        return EnvFilter::new("off");
    }

    let mut filter = EnvFilter::new(format!(
        "warn,{}={}",
        env!("CARGO_CRATE_NAME"),
        level_filter(verbosity)
    ));

    for directive in log_mode.directives() {
        match directive.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(err) => eprintln!("Ignoring invalid log directive {}: {}", directive, err),
        }
    }
    filter
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` takes precedence over the verbosity-derived filter.
pub fn init_tracing(verbosity: u8, log_mode: ClientLogMode, json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| build_filter(verbosity, log_mode));

    let layer = if json {
        tracing_fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_mode_is_retries_only() {
        for verbosity in 0..AWS_DEBUG_LEVEL {
            assert_eq!(ClientLogMode::for_verbosity(verbosity), ClientLogMode::LOG_RETRIES);
        }
    }

    #[test]
    fn test_debug_level_adds_body_logging() {
        let mode = ClientLogMode::for_verbosity(AWS_DEBUG_LEVEL);
        assert!(mode.contains(ClientLogMode::LOG_RETRIES));
        assert!(mode.contains(ClientLogMode::LOG_REQUEST_WITH_BODY));
        assert!(mode.contains(ClientLogMode::LOG_RESPONSE_WITH_BODY));
        assert!(mode.contains(ClientLogMode::LOG_REQUEST_EVENT_MESSAGE));
        assert!(!mode.contains(ClientLogMode::LOG_SIGNING));
    }

    #[test]
    fn test_log_mode_is_monotonic() {
        let base = ClientLogMode::for_verbosity(0);
        let mut previous = base;
        for verbosity in 0..=u8::MAX {
            let mode = ClientLogMode::for_verbosity(verbosity);
            assert!(mode.contains(base));
            assert!(mode.contains(previous));
            previous = mode;
        }
    }

    #[test]
    fn test_log_mode_display() {
        assert_eq!(ClientLogMode::empty().to_string(), "none");
        assert_eq!(ClientLogMode::LOG_RETRIES.to_string(), "LogRetries");
        assert_eq!(
            ClientLogMode::for_verbosity(AWS_DEBUG_LEVEL).to_string(),
            "LogRetries|LogRequestWithBody|LogResponseWithBody|LogRequestEventMessage"
        );
    }

    #[test]
    fn test_directives_follow_mode() {
        assert_eq!(
            ClientLogMode::LOG_RETRIES.directives(),
            vec!["aws_smithy_runtime::client::retries=debug"]
        );
        let debug = ClientLogMode::for_verbosity(AWS_DEBUG_LEVEL).directives();
        assert!(debug.contains(&"aws_smithy_runtime::client::http=trace"));
        assert!(debug.contains(&"aws_smithy_eventstream=trace"));
        for directive in debug {
            assert!(directive.parse::<tracing_subscriber::filter::Directive>().is_ok());
        }
    }

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(level_filter(0), LevelFilter::OFF);
        assert_eq!(level_filter(DEFAULT_VERBOSITY), LevelFilter::INFO);
        assert_eq!(level_filter(4), LevelFilter::DEBUG);
        assert_eq!(level_filter(9), LevelFilter::TRACE);
    }

    #[test]
    fn test_build_filter_includes_crate_level() {
        let filter = build_filter(4, ClientLogMode::LOG_RETRIES).to_string();
        assert!(filter.contains("eks_api_config=debug"));
        assert!(filter.contains("aws_smithy_runtime::client::retries=debug"));
        assert_eq!(build_filter(0, ClientLogMode::LOG_RETRIES).to_string(), "off");
    }
}
