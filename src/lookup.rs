//! Builds a [`LookupResult`] from raw input.
//!
//! Every enrichment goes through [`Enrichment`]: a failing or empty
//! sub-lookup only costs its own field, never the whole result.

use std::sync::Arc;

use chrono::Local;
use log::{debug, warn};
use phonenumber::PhoneNumber;
use thiserror::Error;

use crate::providers::{CountryRegistry, NumberMetadata, ProviderError};
use crate::results::{
  Basic, Carrier, ErrorBody, Geographic, LineType, LookupResult, Outcome,
  SpecialChecks, Structure,
};
use crate::sanitize::sanitize;

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Error)]
pub enum LookupError {
  #[error("Invalid phone number format")]
  InvalidFormat,

  #[error("unsupported default region `{0}`")]
  UnsupportedRegion(String),
}

/// Outcome of a single guarded sub-lookup.
#[derive(Debug)]
enum Enrichment<T> {
  Resolved(T),
  Missing,
  Failed(ProviderError),
}

impl<T> From<Result<Option<T>, ProviderError>> for Enrichment<T> {
  fn from(result: Result<Option<T>, ProviderError>) -> Self {
    match result {
      Ok(Some(v)) => Self::Resolved(v),
      Ok(None) => Self::Missing,
      Err(e) => Self::Failed(e),
    }
  }
}

impl<T> Enrichment<T> {
  fn resolve(self, step: &str) -> Option<T> {
    match self {
      Self::Resolved(v) => Some(v),
      Self::Missing => {
        debug!("{step}: no data");
        None
      }
      Self::Failed(e) => {
        warn!("{step} lookup failed: {e}");
        None
      }
    }
  }
}

fn non_empty(zones: Vec<String>) -> Option<Vec<String>> {
  (!zones.is_empty()).then_some(zones)
}

fn unknown() -> String {
  UNKNOWN.to_owned()
}

/// Stateless phone number lookup service.
pub struct Lookup {
  metadata: Arc<dyn NumberMetadata>,
  registry: Option<Arc<dyn CountryRegistry>>,
  default_region: String,
}

impl Lookup {
  /// # Errors
  ///
  /// Returns [`LookupError::UnsupportedRegion`] if `metadata` does not know
  /// `default_region`.
  pub fn new(
    metadata: Arc<dyn NumberMetadata>,
    registry: Option<Arc<dyn CountryRegistry>>,
    default_region: &str,
  ) -> Result<Self, LookupError> {
    let default_region = default_region.to_ascii_uppercase();
    if !metadata.supports_region(&default_region) {
      return Err(LookupError::UnsupportedRegion(default_region));
    }
    Ok(Self {
      metadata,
      registry,
      default_region,
    })
  }

  #[must_use]
  pub fn default_region(&self) -> &str {
    &self.default_region
  }

  /// Looks `raw` up; unusable input yields the error object.
  #[must_use]
  pub fn lookup(&self, raw: &str) -> Outcome {
    match self.parse(raw) {
      Ok(number) => Outcome::Found(Box::new(self.describe(&number))),
      Err(e) => Outcome::Invalid(ErrorBody {
        error: e.to_string(),
      }),
    }
  }

  fn parse(&self, raw: &str) -> Result<PhoneNumber, LookupError> {
    let input = sanitize(raw).ok_or(LookupError::InvalidFormat)?;
    let region = input.parse_region(&self.default_region);
    debug!("parsing {:?} with region {region:?}", input.text);
    self.metadata.parse(&input.text, region).map_err(|e| {
      debug!("rejected {raw:?}: {e}");
      LookupError::InvalidFormat
    })
  }

  fn describe(&self, number: &PhoneNumber) -> LookupResult {
    let m = self.metadata.as_ref();
    let region = m.region_code(number);
    let line_type = m.line_type(number);
    let nsn = m.national_significant_number(number);

    let country_info = match (&self.registry, region.as_deref()) {
      (Some(registry), Some(code)) => {
        Enrichment::from(registry.by_alpha2(code)).resolve("country registry")
      }
      _ => None,
    };

    let geographic = Geographic {
      region: Enrichment::from(m.geocode(number))
        .resolve("geocoding")
        .unwrap_or_else(unknown),
      iso_region: region.clone().unwrap_or_else(unknown),
      country_code: format!("+{}", m.country_code(number)),
      country_info,
    };

    let carrier = Carrier {
      name: Enrichment::from(m.carrier_name(number))
        .resolve("carrier")
        .unwrap_or_else(unknown),
      region: region.clone().unwrap_or_else(unknown),
    };

    let timezone = Enrichment::from(m.time_zones(number).map(non_empty))
      .resolve("timezone")
      .unwrap_or_else(|| vec![unknown()]);

    let formats = Enrichment::from(m.formats(number).map(Some))
      .resolve("formatting");

    let (portability, emergency_number, example_number) = match &region {
      Some(code) => (
        Enrichment::from(m.is_mobile_portable_region(code))
          .resolve("portability"),
        Enrichment::from(m.is_emergency_number(number, code))
          .resolve("emergency number")
          .unwrap_or(false),
        Enrichment::from(m.example_number(code)).resolve("example number"),
      ),
      None => (None, false, None),
    };

    let total_length = (!nsn.is_empty()).then_some(nsn.len());

    LookupResult {
      timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
      basic: Basic {
        valid: m.is_valid(number),
        possible: m.is_possible(number),
      },
      geographic,
      carrier,
      timezone,
      line_type,
      is_premium: line_type == LineType::Premium,
      formats,
      structure: Structure {
        ndc_length: m.ndc_length(number),
        total_length,
        national_significant: nsn,
      },
      portability,
      special_checks: SpecialChecks {
        short_number_possible: Enrichment::from(
          m.is_possible_short_number(number),
        )
        .resolve("short number")
        .unwrap_or(false),
        emergency_number,
      },
      example_number,
    }
  }
}
