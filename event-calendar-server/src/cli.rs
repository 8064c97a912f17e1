use std::env;
use std::net::SocketAddr;
use std::process;

use event_calendar::{parse_timezone, parse_weekday, Config, DEFAULT_MAX_PER_CELL};
use getopts::{Matches, Options};
use tokio::time::Duration;

use crate::source::EventSource;

const ADDRESS_VAR: &str = "EVENT_CALENDAR_ADDR";

pub struct Args {
    pub address: SocketAddr,
    pub source: EventSource,
    pub config: Config,
    pub update_interval: Duration,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: $EVENT_CALENDAR_ADDR or 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "e",
        "events",
        "JSON file or http(s) URL to load events from",
        "SOURCE",
    );
    opts.optopt(
        "z",
        "timezone",
        "Timezone event times are given in [Default: UTC]",
        "TIMEZONE",
    );
    opts.optopt(
        "w",
        "start-of-week",
        "First day of the week in week and month views [Default: monday]",
        "WEEKDAY",
    );
    opts.optopt(
        "m",
        "max-per-cell",
        "Most events listed in a single calendar cell [Default: 10]",
        "COUNT",
    );
    opts.optopt(
        "i",
        "update-interval",
        "Seconds between reloading events and updating their statuses [Default: 3600]",
        "SECONDS",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    match from_matches(&matches, env::var(ADDRESS_VAR).ok()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn from_matches(matches: &Matches, address_var: Option<String>) -> Result<Args, String> {
    let address = match matches.opt_str("address").or(address_var) {
        Some(address) => address.parse().map_err(|err| {
            format!("Provided value for option 'address' is invalid: {err}")
        })?,
        None => SocketAddr::from(([127, 0, 0, 1], 8080)),
    };

    let source = matches
        .opt_str("events")
        .ok_or("Missing required option 'events'")?
        .parse::<EventSource>()
        .map_err(|err| format!("Provided value for option 'events' is invalid: {err}"))?;

    let timezone = match matches.opt_str("timezone") {
        Some(name) => parse_timezone(&name).map_err(|err| err.to_string())?,
        None => Config::default().timezone,
    };

    let start_of_week = match matches.opt_str("start-of-week") {
        Some(name) => parse_weekday(&name).map_err(|err| err.to_string())?,
        None => Config::default().start_of_week,
    };

    let max_per_cell = matches
        .opt_get_default("max-per-cell", DEFAULT_MAX_PER_CELL)
        .map_err(|err| format!("Provided value for option 'max-per-cell' is invalid: {err}"))?;

    let update_interval = match matches.opt_get_default("update-interval", 3600) {
        Ok(0) => return Err("Provided value for option 'update-interval' must be positive".into()),
        Ok(secs) => Duration::from_secs(secs),
        Err(err) => {
            return Err(format!(
                "Provided value for option 'update-interval' is invalid: {err}"
            ))
        }
    };

    Ok(Args {
        address,
        source,
        config: Config {
            timezone,
            start_of_week,
            max_per_cell,
            ..Config::default()
        },
        update_interval,
    })
}
