use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_JSON: &str = "log-json";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        match level.trim().to_lowercase().as_str() {
            "0" | "error" => Ok(0),
            "1" | "warn" | "warning" => Ok(1),
            "2" | "info" => Ok(2),
            "3" | "debug" => Ok(3),
            "4" | "trace" => Ok(4),
            other => Err(format!("invalid log level: {other}")),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("PANADERIA_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .arg(
            Arg::new(ARG_LOG_JSON)
                .long("log-json")
                .help("Emit logs as JSON lines")
                .env("PANADERIA_LOG_JSON")
                .global(true)
                .action(ArgAction::SetTrue),
        )
}
