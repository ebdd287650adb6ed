//! ISO 3166-1 country registry backed by the `isocountry` crate.

use isocountry::CountryCode;

use super::{CountryRegistry, ProviderError};
use crate::results::CountryInfo;

#[derive(Debug, Default, Clone, Copy)]
pub struct IsoCountryRegistry;

impl CountryRegistry for IsoCountryRegistry {
  fn by_alpha2(
    &self,
    alpha2: &str,
  ) -> Result<Option<CountryInfo>, ProviderError> {
    // Non-geographic entities ("001") and unknown codes simply have no record.
    let Ok(country) = CountryCode::for_alpha2(&alpha2.to_ascii_uppercase())
    else {
      return Ok(None);
    };

    Ok(Some(CountryInfo {
      name: country.name().to_owned(),
      alpha2: country.alpha2().to_owned(),
      alpha3: country.alpha3().to_owned(),
      numeric: format!("{:03}", country.numeric_id()),
    }))
  }
}
