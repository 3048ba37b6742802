use crate::CLAP_STYLING;
use clap::{arg, command};
use std::path::PathBuf;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("phishline")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("phishline")
        .styles(CLAP_STYLING)
        .about("Turns URLs into the 30-feature vectors phishing classifiers consume")
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log every lookup failure and fallback score")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"timeout" <SECS>)
                .required(false)
                .global(true)
                .help("Upper bound on each WHOIS, DNS, page or redirect lookup")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(--"user-agent" <UA>)
                .required(false)
                .global(true)
                .help("User-Agent header sent with page fetches"),
        )
        .arg(
            arg!(--"verify-certs")
                .required(false)
                .global(true)
                .help("Reject pages served with invalid TLS certificates"),
        )
        .arg(
            arg!(--"whois-server" <HOST>)
                .required(false)
                .global(true)
                .help("Query this WHOIS server (host or host:port) instead of following IANA referrals"),
        )
        .arg(
            arg!(--"cache-ttl" <SECS>)
                .required(false)
                .global(true)
                .help("Reuse lookups per host for this many seconds")
                .value_parser(clap::value_parser!(u64)),
        )
        .subcommand_required(false)
        .subcommand(
            command!("extract")
                .about("Extract the feature vector for a single URL")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL to analyze; http:// is assumed when no scheme is given"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json or csv")
                        .value_parser(["text", "json", "csv"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the report to a file instead of stdout"),
                ),
        )
        .subcommand(
            command!("batch")
                .about("Extract feature vectors for every URL in a file")
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(true)
                        .help("Path to a newline-delimited file of URLs")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(-t --"threads" <NUM>)
                        .required(false)
                        .help("Number of URLs analyzed concurrently")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json or csv")
                        .value_parser(["text", "json", "csv"])
                        .default_value("csv"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the report to a file instead of stdout"),
                ),
        )
        .subcommand(command!("features").about("List the 30 feature names in output order"))
}
