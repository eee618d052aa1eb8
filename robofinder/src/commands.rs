use clap::{ArgAction, arg};
use std::ffi::OsString;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("robofinder")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("robofinder")
        .about(
            "Find paths and sitemaps listed in historical robots.txt captures from the \
            Wayback Machine",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!(-u --"url" <URL>)
                .required(false)
                .help("Target URL, scheme and domain only (e.g. https://example.com)"),
        )
        .arg(
            arg!(-d --"delay" <SECONDS>)
                .required(false)
                .help("Amount of delay before each snapshot request")
                .value_parser(clap::value_parser!(f64))
                .allow_negative_numbers(true)
                .default_value("0.5"),
        )
        .arg(
            arg!(-l --"limit" <LIMIT>)
                .required(false)
                .help("Limit for timestamps (negative numbers select the most recent results)")
                .value_parser(clap::value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("10"),
        )
        .arg(
            arg!(-p --"paths")
                .required(false)
                .help("Show robots.txt paths")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"sm")
                .required(false)
                .visible_alias("sitemaps")
                .help("Show robots.txt sitemaps (also accepted as -sm)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(-s --"silent")
                .required(false)
                .help("Silent output messages, print discoveries only")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(-v --"verbose")
                .required(false)
                .help("Show debug level messages")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds, 0 waits indefinitely")
                .value_parser(clap::value_parser!(u64))
                .default_value("30"),
        )
        .arg(
            arg!(--"verify-tls")
                .required(false)
                .help(
                    "Verify TLS certificates. Off by default so runs work behind an \
                    intercepting proxy, which leaves requests open to tampering.",
                )
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"archive-url" <URL>)
                .required(false)
                .help("Alternate archive host laid out like https://web.archive.org"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Also save findings to a JSON file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}

/// Rewrite single-dash long flags (`-sm`) into their clap form.
///
/// clap would otherwise read `-sm` as the bundled shorts `-s -m`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| if arg == "-sm" { OsString::from("--sm") } else { arg })
        .collect()
}
