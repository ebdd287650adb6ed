use std::fmt;
use std::io::{self, Write};

use anyhow::{Context, Result};
use console::style;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const BANNER: &str = r"
  ___ _                   _        _
 | _ \ |_  ___ _ _  ___  /_\  _ __(_)
 |  _/ ' \/ _ \ ' \/ -_)/ _ \| '_ \ |
 |_| |_||_\___/_||_\___/_/ \_\ .__/_|
                             |_|
";

const LABEL_WIDTH: usize = 20;

/// Everything known about one phone number, in the order it is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
  pub timestamp: String,
  pub basic: Basic,
  pub geographic: Geographic,
  pub carrier: Carrier,
  pub timezone: Vec<String>,
  pub line_type: LineType,
  pub is_premium: bool,
  #[serde(serialize_with = "some_or_empty")]
  pub formats: Option<Formats>,
  pub structure: Structure,
  pub portability: Option<bool>,
  pub special_checks: SpecialChecks,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub example_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Basic {
  pub valid: bool,
  pub possible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Geographic {
  pub region: String,
  pub iso_region: String,
  pub country_code: String,
  #[serde(serialize_with = "some_or_empty")]
  pub country_info: Option<CountryInfo>,
}

/// ISO 3166-1 record for the number's region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryInfo {
  pub name: String,
  pub alpha2: String,
  pub alpha3: String,
  pub numeric: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Carrier {
  pub name: String,
  pub region: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineType {
  Mobile,
  Landline,
  #[serde(rename = "Mobile or Landline")]
  MobileOrLandline,
  #[serde(rename = "Toll-Free")]
  TollFree,
  Premium,
  #[serde(rename = "VoIP")]
  Voip,
  Personal,
  Pager,
  #[serde(rename = "UAN")]
  Uan,
  Unknown,
}

impl LineType {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Mobile => "Mobile",
      Self::Landline => "Landline",
      Self::MobileOrLandline => "Mobile or Landline",
      Self::TollFree => "Toll-Free",
      Self::Premium => "Premium",
      Self::Voip => "VoIP",
      Self::Personal => "Personal",
      Self::Pager => "Pager",
      Self::Uan => "UAN",
      Self::Unknown => "Unknown",
    }
  }
}

impl fmt::Display for LineType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The number rendered in each standard notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formats {
  pub e164: String,
  pub international: String,
  pub national: String,
  pub rfc3966: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Structure {
  pub national_significant: String,
  pub ndc_length: usize,
  pub total_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialChecks {
  pub short_number_possible: bool,
  pub emergency_number: bool,
}

/// Body returned in place of a [`LookupResult`] when the input is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
  pub error: String,
}

/// What a lookup produces: a full result or the error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
  Found(Box<LookupResult>),
  Invalid(ErrorBody),
}

impl Outcome {
  #[must_use]
  pub fn result(&self) -> Option<&LookupResult> {
    match self {
      Self::Found(result) => Some(result.as_ref()),
      Self::Invalid(_) => None,
    }
  }
}

/// `None` is written as `{}` so the key is always present.
#[allow(clippy::ref_option)]
fn some_or_empty<T, S>(
  value: &Option<T>,
  serializer: S,
) -> Result<S::Ok, S::Error>
where
  T: Serialize,
  S: Serializer,
{
  match value {
    Some(v) => v.serialize(serializer),
    None => serializer.serialize_map(Some(0))?.end(),
  }
}

fn yes_no(v: bool) -> &'static str {
  if v {
    "Yes"
  } else {
    "No"
  }
}

fn yes_no_unknown(v: Option<bool>) -> &'static str {
  v.map_or("Unknown", yes_no)
}

fn header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
  writeln!(out, "{}", style(format!("┌─ {title}")).cyan())
}

fn field<W: Write>(
  out: &mut W,
  label: &str,
  value: impl fmt::Display,
) -> io::Result<()> {
  writeln!(out, "  {label:<LABEL_WIDTH$} → {value}")
}

pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
  writeln!(out, "{}", style(BANNER).cyan())
}

pub fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
  write_banner(out)?;
  writeln!(
    out,
    "{}",
    style("[*] Usage: phoneapi <phone_number> | api").yellow()
  )
}

fn write_basic<W: Write>(out: &mut W, basic: &Basic) -> io::Result<()> {
  header(out, "Basic Info")?;
  field(out, "Valid", yes_no(basic.valid))?;
  field(out, "Possible", yes_no(basic.possible))
}

fn write_geographic<W: Write>(
  out: &mut W,
  geo: &Geographic,
  timezone: &[String],
) -> io::Result<()> {
  header(out, "Geographic Info")?;
  field(out, "Region", &geo.region)?;
  field(out, "ISO Region", &geo.iso_region)?;
  field(out, "Country Code", &geo.country_code)?;
  if let Some(info) = &geo.country_info {
    field(out, "Name", &info.name)?;
    field(out, "Alpha2", &info.alpha2)?;
    field(out, "Alpha3", &info.alpha3)?;
    field(out, "Numeric", &info.numeric)?;
  }
  field(out, "Timezone", timezone.join(", "))
}

fn write_carrier<W: Write>(out: &mut W, carrier: &Carrier) -> io::Result<()> {
  header(out, "Carrier Info")?;
  field(out, "Name", &carrier.name)?;
  field(out, "Region", &carrier.region)
}

fn write_formats<W: Write>(
  out: &mut W,
  formats: Option<&Formats>,
) -> io::Result<()> {
  header(out, "Formats")?;
  match formats {
    Some(f) => {
      field(out, "E164", &f.e164)?;
      field(out, "International", &f.international)?;
      field(out, "National", &f.national)?;
      field(out, "RFC3966", &f.rfc3966)
    }
    None => writeln!(out, "  {}", style("Not available").dim()),
  }
}

fn write_structure<W: Write>(
  out: &mut W,
  structure: &Structure,
) -> io::Result<()> {
  header(out, "Structure")?;
  field(out, "National significant", &structure.national_significant)?;
  field(out, "NDC length", structure.ndc_length)?;
  match structure.total_length {
    Some(len) => field(out, "Total length", len),
    None => field(out, "Total length", "Unknown"),
  }
}

/// Writes the sectioned console report for `result`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_report<W: Write>(
  out: &mut W,
  result: &LookupResult,
) -> io::Result<()> {
  writeln!(out, "[*] phoneapi started @ {}\n", result.timestamp)?;

  write_basic(out, &result.basic)?;
  writeln!(out)?;
  write_geographic(out, &result.geographic, &result.timezone)?;
  writeln!(out)?;
  write_carrier(out, &result.carrier)?;
  writeln!(out)?;

  header(out, "Line Type")?;
  field(out, "Type", result.line_type)?;
  field(out, "Premium", yes_no(result.is_premium))?;
  writeln!(out)?;

  write_formats(out, result.formats.as_ref())?;
  writeln!(out)?;
  write_structure(out, &result.structure)?;
  writeln!(out)?;

  header(out, "Portability")?;
  field(out, "Mobile Portable", yes_no_unknown(result.portability))?;
  writeln!(out)?;

  header(out, "Special Checks")?;
  let checks = &result.special_checks;
  field(out, "Short number", yes_no(checks.short_number_possible))?;
  field(out, "Emergency number", yes_no(checks.emergency_number))?;

  if let Some(example) = &result.example_number {
    writeln!(out)?;
    header(out, "Example Number")?;
    field(out, "Example Number", example)?;
  }

  writeln!(out, "{}", style("\n[•] Lookup complete.\n").green())
}

/// Writes the banner followed by either the report or the error line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_human_readable<W: Write>(
  out: &mut W,
  outcome: &Outcome,
) -> io::Result<()> {
  write_banner(out)?;
  match outcome {
    Outcome::Found(result) => write_report(out, result),
    Outcome::Invalid(body) => {
      writeln!(out, "{}", style(format!("[!] {}", body.error)).red().bold())
    }
  }
}

pub fn print_human_readable(outcome: &Outcome) -> Result<()> {
  let stdout = io::stdout();
  let mut out = stdout.lock();
  write_human_readable(&mut out, outcome).context("Failed to write report")
}

pub fn print_json(outcome: &Outcome) -> Result<()> {
  serde_json::to_string_pretty(outcome)
    .map(|s| println!("{s}"))
    .context("Failed to serialize results to JSON")
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::{json, Value};

  fn sample() -> LookupResult {
    LookupResult {
      timestamp: "2024-05-01 12:00:00".to_string(),
      basic: Basic {
        valid: true,
        possible: true,
      },
      geographic: Geographic {
        region: "United States of America".to_string(),
        iso_region: "US".to_string(),
        country_code: "+1".to_string(),
        country_info: Some(CountryInfo {
          name: "United States of America".to_string(),
          alpha2: "US".to_string(),
          alpha3: "USA".to_string(),
          numeric: "840".to_string(),
        }),
      },
      carrier: Carrier {
        name: "Unknown".to_string(),
        region: "US".to_string(),
      },
      timezone: vec!["Unknown".to_string()],
      line_type: LineType::MobileOrLandline,
      is_premium: false,
      formats: Some(Formats {
        e164: "+14155552671".to_string(),
        international: "+1 415-555-2671".to_string(),
        national: "(415) 555-2671".to_string(),
        rfc3966: "tel:+1-415-555-2671".to_string(),
      }),
      structure: Structure {
        national_significant: "4155552671".to_string(),
        ndc_length: 3,
        total_length: Some(10),
      },
      portability: None,
      special_checks: SpecialChecks {
        short_number_possible: false,
        emergency_number: false,
      },
      example_number: Some("+1 201-555-0123".to_string()),
    }
  }

  fn render(outcome: &Outcome) -> String {
    let mut buf = Vec::new();
    write_human_readable(&mut buf, outcome).expect("write to Vec");
    String::from_utf8(buf).expect("utf-8 report")
  }

  #[test]
  fn test_json_key_order() {
    let json = serde_json::to_string(&sample()).expect("serialize");
    let keys = [
      "\"timestamp\"",
      "\"basic\"",
      "\"geographic\"",
      "\"carrier\"",
      "\"timezone\"",
      "\"line_type\"",
      "\"is_premium\"",
      "\"formats\"",
      "\"structure\"",
      "\"portability\"",
      "\"special_checks\"",
      "\"example_number\"",
    ];
    let positions: Vec<usize> = keys
      .iter()
      .map(|k| json.find(k).unwrap_or_else(|| panic!("missing key {k}")))
      .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
  }

  #[test]
  fn test_json_sentinels() {
    let mut result = sample();
    result.formats = None;
    result.geographic.country_info = None;
    result.example_number = None;

    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["formats"], json!({}));
    assert_eq!(value["geographic"]["country_info"], json!({}));
    assert_eq!(value["portability"], Value::Null);
    assert!(value.get("example_number").is_none());
  }

  #[test]
  fn test_json_line_type_names() {
    let value = serde_json::to_value(sample()).expect("serialize");
    assert_eq!(value["line_type"], "Mobile or Landline");
    assert_eq!(serde_json::to_value(LineType::Voip).unwrap(), "VoIP");
    assert_eq!(serde_json::to_value(LineType::TollFree).unwrap(), "Toll-Free");
    assert_eq!(serde_json::to_value(LineType::Uan).unwrap(), "UAN");
  }

  #[test]
  fn test_json_error_outcome() {
    let outcome = Outcome::Invalid(ErrorBody {
      error: "Invalid phone number format".to_string(),
    });
    let value = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(value, json!({"error": "Invalid phone number format"}));
  }

  #[test]
  fn test_report_sections() {
    let report = render(&Outcome::Found(Box::new(sample())));
    for section in [
      "Basic Info",
      "Geographic Info",
      "Carrier Info",
      "Line Type",
      "Formats",
      "Structure",
      "Portability",
      "Special Checks",
      "Example Number",
    ] {
      assert!(report.contains(section), "missing section {section}");
    }
    assert!(report.contains("[*] phoneapi started @ 2024-05-01 12:00:00"));
    assert!(report.contains("Lookup complete."));
  }

  #[test]
  fn test_report_line_layout() {
    let report = render(&Outcome::Found(Box::new(sample())));
    assert!(report.contains(&format!("  {:<20} → Yes", "Valid")));
    assert!(report.contains(&format!("  {:<20} → No", "Premium")));
    assert!(report.contains(&format!("  {:<20} → Unknown", "Mobile Portable")));
    assert!(report.contains(&format!("  {:<20} → +14155552671", "E164")));
    assert!(report.contains(&format!("  {:<20} → USA", "Alpha3")));
  }

  #[test]
  fn test_report_without_example_or_formats() {
    let mut result = sample();
    result.example_number = None;
    result.formats = None;
    let report = render(&Outcome::Found(Box::new(result)));
    assert!(!report.contains("Example Number"));
    assert!(report.contains("Not available"));
  }

  struct ClosedPipe;

  impl Write for ClosedPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
      Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  #[test]
  fn test_usage_text() {
    let mut out = Vec::new();
    write_usage(&mut out).expect("write to Vec");
    let text = console::strip_ansi_codes(std::str::from_utf8(&out).unwrap())
      .into_owned();
    assert!(text.contains("Usage: phoneapi <phone_number> | api"));
  }

  #[test]
  fn test_write_errors_are_returned() {
    let err = write_usage(&mut ClosedPipe).expect_err("pipe is closed");
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(write_banner(&mut ClosedPipe).is_err());
  }

  #[test]
  fn test_report_error_outcome() {
    let outcome = Outcome::Invalid(ErrorBody {
      error: "Invalid phone number format".to_string(),
    });
    let report = render(&outcome);
    assert!(report.contains("[!] Invalid phone number format"));
    assert!(!report.contains("Basic Info"));
  }
}
