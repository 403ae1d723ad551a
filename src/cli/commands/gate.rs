use clap::{Arg, Command};

pub const ARG_SESSION_TTL: &str = "session-ttl-seconds";
pub const ARG_VERIFICATION_TTL: &str = "verification-ttl-seconds";

/// Gate and token lifetime options parsed from the command line.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub session_ttl_seconds: u64,
    pub verification_ttl_seconds: i64,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &clap::ArgMatches) -> Self {
        Self {
            session_ttl_seconds: matches
                .get_one::<u64>(ARG_SESSION_TTL)
                .copied()
                .unwrap_or(30 * 24 * 60 * 60),
            verification_ttl_seconds: matches
                .get_one::<i64>(ARG_VERIFICATION_TTL)
                .copied()
                .unwrap_or(60 * 60),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_TTL)
                .long(ARG_SESSION_TTL)
                .help("Maximum session lifetime in seconds before the head session expires")
                .default_value("2592000")
                .env("GATEHOUSE_SESSION_TTL_SECONDS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_VERIFICATION_TTL)
                .long(ARG_VERIFICATION_TTL)
                .help("Verification token lifetime in seconds")
                .default_value("3600")
                .env("GATEHOUSE_VERIFICATION_TTL_SECONDS")
                .value_parser(clap::value_parser!(i64)),
        )
}
