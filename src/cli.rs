use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
  name = "phoneapi",
  author = "Luis Cardoso <luis@luiscardoso.dev>",
  version = "0.1.0"
)]
#[command(
  about = "Look up validity, region, line type and formats of a phone number.",
  long_about = "A command-line utility to inspect a phone number (validity, region, carrier, line type, formats, structure) or, with `api`, to serve the same lookup over HTTP at /PhoneApi/v1/search=<number>."
)]
pub struct Cli {
  /// The phone number to look up, or `api` to start the HTTP server.
  pub target: Option<String>,

  /// Output results in JSON format instead of human-readable text.
  #[arg(long)]
  pub json: bool,

  /// Region for numbers without a leading `+` (overrides the config file).
  #[arg(long, value_name = "CC")]
  pub region: Option<String>,

  /// Print the current merged configuration and exit.
  #[arg(long)]
  pub config_show: bool,
}

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Usage,
  Report(String),
  Serve,
}

impl Cli {
  #[must_use]
  pub fn mode(&self) -> Mode {
    match self.target.as_deref() {
      None => Mode::Usage,
      Some(t) if t.eq_ignore_ascii_case("api") => Mode::Serve,
      Some(t) => Mode::Report(t.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn make_args(args: &[&str]) -> Vec<String> {
    std::iter::once("phoneapi".to_string())
      .chain(args.iter().map(std::string::ToString::to_string))
      .collect()
  }

  #[test]
  fn test_basic_target() {
    let args = make_args(&["+14155552671"]);
    let cli = Cli::try_parse_from(args).expect("Should parse basic target");
    assert_eq!(cli.target.as_deref(), Some("+14155552671"));
    assert!(!cli.json);
    assert!(cli.region.is_none());
    assert!(!cli.config_show);
    assert_eq!(cli.mode(), Mode::Report("+14155552671".to_string()));
  }

  #[test]
  fn test_no_args_is_usage() {
    let cli = Cli::try_parse_from(make_args(&[])).expect("Should parse");
    assert!(cli.target.is_none());
    assert_eq!(cli.mode(), Mode::Usage);
  }

  #[test]
  fn test_api_is_case_insensitive() {
    for word in ["api", "API", "Api"] {
      let cli = Cli::try_parse_from(make_args(&[word])).expect("Should parse");
      assert_eq!(cli.mode(), Mode::Serve, "{word}");
    }
  }

  #[test]
  fn test_api_like_numbers_are_reports() {
    let cli = Cli::try_parse_from(make_args(&["apis"])).expect("Should parse");
    assert_eq!(cli.mode(), Mode::Report("apis".to_string()));
  }

  #[test]
  fn test_json_and_region_flags() {
    let args = make_args(&["0612345678", "--json", "--region", "BE"]);
    let cli = Cli::try_parse_from(args).expect("Should parse flags");
    assert!(cli.json);
    assert_eq!(cli.region.as_deref(), Some("BE"));
    assert_eq!(cli.mode(), Mode::Report("0612345678".to_string()));
  }

  #[test]
  fn test_config_show_without_target() {
    let cli = Cli::try_parse_from(make_args(&["--config-show"]))
      .expect("Should parse --config-show");
    assert!(cli.config_show);
    assert_eq!(cli.mode(), Mode::Usage);
  }

  #[test]
  fn test_region_requires_value() {
    let result = Cli::try_parse_from(make_args(&["0612345678", "--region"]));
    assert!(result.is_err(), "--region without a value should fail");
  }

  #[test]
  fn test_number_with_spaces_as_single_arg() {
    let cli = Cli::try_parse_from(make_args(&["+33 6 12 34 56 78"]))
      .expect("Should parse quoted number");
    assert_eq!(cli.mode(), Mode::Report("+33 6 12 34 56 78".to_string()));
  }
}
