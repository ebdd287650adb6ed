//! Seams to the external metadata sources a lookup draws from.
//!
//! [`NumberMetadata`] covers everything the phone-number library answers:
//! parsing, validation, formatting and the per-number enrichments.
//! [`CountryRegistry`] is an optional ISO 3166 registry used to decorate the
//! geographic section.

use phonenumber::PhoneNumber;
use thiserror::Error;

use crate::results::{CountryInfo, Formats, LineType};

pub mod country;
pub mod libphone;

/// Errors raised by a metadata source.
#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("failed to parse number: {0}")]
  Parse(String),

  #[error("unknown region code `{0}`")]
  UnknownRegion(String),

  #[error("{0}")]
  Backend(String),
}

/// Read-only operations of a phone-number metadata library.
///
/// The infallible methods answer from the parsed number alone. The methods
/// returning `Result` are enrichments: `Ok(None)` (or an empty list) means
/// the source has nothing to say, `Err` means the lookup itself broke.
pub trait NumberMetadata: Send + Sync {
  /// Whether `region` is a region code the source has metadata for.
  fn supports_region(&self, region: &str) -> bool;

  /// Parses `text`, resolving national numbers against `default_region`.
  ///
  /// # Errors
  ///
  /// Returns an error if the text is not a phone number or the region is
  /// unknown.
  fn parse(
    &self,
    text: &str,
    default_region: Option<&str>,
  ) -> Result<PhoneNumber, ProviderError>;

  fn is_valid(&self, number: &PhoneNumber) -> bool;

  fn is_possible(&self, number: &PhoneNumber) -> bool;

  fn country_code(&self, number: &PhoneNumber) -> u16;

  /// ISO region the number belongs to, if it maps to one.
  fn region_code(&self, number: &PhoneNumber) -> Option<String>;

  fn line_type(&self, number: &PhoneNumber) -> LineType;

  fn national_significant_number(&self, number: &PhoneNumber) -> String;

  /// Length of the national destination code (area code or mobile prefix).
  fn ndc_length(&self, number: &PhoneNumber) -> usize;

  /// Whether the number has the length of a short number (service codes,
  /// emergency numbers) in its region.
  ///
  /// # Errors
  ///
  /// Returns an error if the short-number data could not be queried.
  fn is_possible_short_number(
    &self,
    number: &PhoneNumber,
  ) -> Result<Option<bool>, ProviderError>;

  /// Human readable description of where the number is located.
  ///
  /// # Errors
  ///
  /// Returns an error if the geocoding data could not be queried.
  fn geocode(
    &self,
    number: &PhoneNumber,
  ) -> Result<Option<String>, ProviderError>;

  /// Name of the carrier the number was originally allocated to.
  ///
  /// # Errors
  ///
  /// Returns an error if the carrier data could not be queried.
  fn carrier_name(
    &self,
    number: &PhoneNumber,
  ) -> Result<Option<String>, ProviderError>;

  /// IANA timezone identifiers the number may be in, most likely first.
  ///
  /// # Errors
  ///
  /// Returns an error if the timezone data could not be queried.
  fn time_zones(
    &self,
    number: &PhoneNumber,
  ) -> Result<Vec<String>, ProviderError>;

  /// Renders the number in every supported notation.
  ///
  /// # Errors
  ///
  /// Returns an error if any of the notations cannot be produced.
  fn formats(&self, number: &PhoneNumber) -> Result<Formats, ProviderError>;

  /// Whether mobile numbers keep their number when switching carrier.
  ///
  /// # Errors
  ///
  /// Returns an error if the region metadata could not be queried.
  fn is_mobile_portable_region(
    &self,
    region: &str,
  ) -> Result<Option<bool>, ProviderError>;

  /// Whether the number is an emergency number in `region`.
  ///
  /// # Errors
  ///
  /// Returns an error if the emergency-number data could not be queried.
  fn is_emergency_number(
    &self,
    number: &PhoneNumber,
    region: &str,
  ) -> Result<Option<bool>, ProviderError>;

  /// An example number for `region`, formatted internationally.
  ///
  /// # Errors
  ///
  /// Returns an error if the example could not be parsed or formatted.
  fn example_number(
    &self,
    region: &str,
  ) -> Result<Option<String>, ProviderError>;
}

/// Lookup of ISO 3166-1 country records by alpha-2 code.
pub trait CountryRegistry: Send + Sync {
  /// # Errors
  ///
  /// Returns an error if the registry could not be queried.
  fn by_alpha2(
    &self,
    alpha2: &str,
  ) -> Result<Option<CountryInfo>, ProviderError>;
}
