use crate::cli::{
    actions::{server::Args, Action},
    commands::gate,
};
use anyhow::Result;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(3437);
    let options = gate::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        session_ttl_seconds: options.session_ttl_seconds,
        verification_ttl_seconds: options.verification_ttl_seconds,
    }))
}
