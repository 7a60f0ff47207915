use crate::CLAP_STYLING;
use clap::{ArgGroup, arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("listgrab")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("listgrab")
        .about("Extract structured listings from paginated HTML pages")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress progress and summary output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .global(true)
                .action(clap::ArgAction::Count),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("scrape")
                .about("Scrape listings from a site using a JSON definition or a preset")
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("Path to a JSON site definition")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"preset" <NAME>)
                        .required(false)
                        .help("Use a built-in site definition (see `listgrab presets`)"),
                )
                .group(
                    ArgGroup::new("site")
                        .args(["config", "preset"])
                        .required(true)
                        .multiple(false),
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The listing page to start from")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-p --"pages" <PAGES>)
                        .required(false)
                        .help("Maximum number of pages to visit")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(-d --"delay" <SECONDS>)
                        .required(false)
                        .help("Pause between page requests, in seconds")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"fields" <FIELDS>)
                        .required(false)
                        .help("Comma-separated subset of fields to extract, in output order"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Output file or directory (default: <site>_<timestamp>.<ext>)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Export format: csv, json, text, xlsx")
                        .value_parser(["csv", "json", "text", "xlsx"])
                        .default_value("csv"),
                ),
        )
        .subcommand(
            command!("validate")
                .about("Check a site definition without touching the network")
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(true)
                        .help("Path to a JSON site definition")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(command!("presets").about("List built-in site definitions"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_with_preset() {
        let matches = command_argument_builder()
            .try_get_matches_from([
                "listgrab", "scrape", "--preset", "avito", "-u", "https://www.avito.ma/fr/maroc",
                "-p", "3",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "scrape");
        assert_eq!(sub.get_one::<usize>("pages"), Some(&3));
        assert_eq!(sub.get_one::<f64>("delay"), Some(&1.0));
        assert_eq!(sub.get_one::<String>("format").map(String::as_str), Some("csv"));
    }

    #[test]
    fn test_scrape_requires_exactly_one_site_source() {
        let neither = command_argument_builder()
            .try_get_matches_from(["listgrab", "scrape", "-u", "https://shop.example/"]);
        assert!(neither.is_err());

        let both = command_argument_builder().try_get_matches_from([
            "listgrab", "scrape", "-c", "site.json", "--preset", "avito", "-u",
            "https://shop.example/",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn test_scrape_rejects_bad_url_and_format() {
        assert!(
            command_argument_builder()
                .try_get_matches_from(["listgrab", "scrape", "--preset", "avito", "-u", "nope"])
                .is_err()
        );
        assert!(
            command_argument_builder()
                .try_get_matches_from([
                    "listgrab", "scrape", "--preset", "avito", "-u", "https://a.example/", "-f",
                    "pdf",
                ])
                .is_err()
        );
    }

    #[test]
    fn test_scrape_accepts_xlsx_format() {
        let matches = command_argument_builder()
            .try_get_matches_from([
                "listgrab", "scrape", "--preset", "avito", "-u", "https://a.example/", "-f", "xlsx",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>("format").map(String::as_str), Some("xlsx"));
    }

    #[test]
    fn test_global_verbosity_counts() {
        let matches = command_argument_builder()
            .try_get_matches_from(["listgrab", "-vv", "presets"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
    }
}
