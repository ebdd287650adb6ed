//! [`NumberMetadata`] backed by the `phonenumber` crate and its bundled
//! copy of Google's libphonenumber metadata.

use std::str::FromStr;
use std::sync::LazyLock;

use isocountry::CountryCode;
use phonenumber::country::Id;
use phonenumber::metadata::{Descriptors, DATABASE};
use phonenumber::{Metadata, Mode, PhoneNumber, Type};
use regex::Regex;

use super::{NumberMetadata, ProviderError};
use crate::results::{Formats, LineType};

static RE_NON_DIGITS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^0-9]+").unwrap());

/// Region code of the non-geographic entities (+800, +808, +870, ...).
pub const NON_GEOGRAPHIC: &str = "001";

/// Calling codes whose mobile numbers carry an extra token ("9" for
/// Argentina) in front of the area code when dialled internationally.
const MOBILE_TOKEN_CODES: [u16; 1] = [54];

/// Types tried before the fixed-line / mobile pair, highest precedence first.
const SPECIAL_TYPES: [Type; 8] = [
  Type::PremiumRate,
  Type::TollFree,
  Type::SharedCost,
  Type::Voip,
  Type::PersonalNumber,
  Type::Pager,
  Type::Uan,
  Type::Voicemail,
];

/// Every descriptor that carries dialable lengths. `Unknown` is the general
/// descriptor.
const LENGTH_TYPES: [Type; 11] = [
  Type::Unknown,
  Type::FixedLine,
  Type::Mobile,
  Type::TollFree,
  Type::PremiumRate,
  Type::SharedCost,
  Type::PersonalNumber,
  Type::Voip,
  Type::Pager,
  Type::Uan,
  Type::Voicemail,
];

fn fits(descriptors: &Descriptors, kind: Type, national: &str) -> bool {
  descriptors
    .get(kind)
    .is_some_and(|desc| desc.is_match(national))
}

/// Classifies `national` against the descriptors of `meta`.
fn classify(meta: &Metadata, national: &str) -> Type {
  let descriptors = meta.descriptors();
  if !descriptors.general().is_match(national) {
    return Type::Unknown;
  }
  if let Some(kind) = SPECIAL_TYPES
    .into_iter()
    .find(|&kind| fits(descriptors, kind, national))
  {
    return kind;
  }

  let mobile = fits(descriptors, Type::Mobile, national);
  match (fits(descriptors, Type::FixedLine, national), mobile) {
    (true, true) => Type::FixedLineOrMobile,
    (true, false) => Type::FixedLine,
    (false, true) => Type::Mobile,
    (false, false) => Type::Unknown,
  }
}

/// The numbering plans ship without carrier, timezone, short-number or
/// emergency tables, so those enrichments come back empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibPhonenumber;

impl LibPhonenumber {
  fn region_id(region: &str) -> Result<Id, ProviderError> {
    Id::from_str(region)
      .map_err(|_| ProviderError::UnknownRegion(region.to_owned()))
  }

  /// Metadata of the region `number` belongs to.
  ///
  /// Calling codes shared by several regions (+1, +7, +39, ...) are
  /// resolved by leading digits first, then by which region's plan the
  /// number fits. The national number keeps its leading zeros here: Italian
  /// fixed lines only match their plan with the zero in place.
  fn metadata(number: &PhoneNumber) -> Option<&'static Metadata> {
    let code = number.code().value();
    let national = number.national().to_string();
    let regions = DATABASE.region(&code)?;

    if let [only] = regions.as_slice() {
      return if *only == NON_GEOGRAPHIC {
        Self::main_metadata(code)
      } else {
        DATABASE.by_id(*only)
      };
    }

    regions
      .into_iter()
      .filter_map(|region| DATABASE.by_id(region))
      .find(|meta| match meta.leading_digits() {
        Some(pattern) => {
          pattern.find(&national).is_some_and(|m| m.start() == 0)
        }
        None => classify(meta, &national) != Type::Unknown,
      })
  }

  fn main_metadata(code: u16) -> Option<&'static Metadata> {
    DATABASE.by_code(&code)?.into_iter().next()
  }

  /// Metadata of a geographic region; the non-geographic entities share one
  /// code and have no single record.
  fn region_metadata(region: &str) -> Option<&'static Metadata> {
    if region == NON_GEOGRAPHIC {
      return None;
    }
    DATABASE.by_id(region)
  }

  fn number_type(number: &PhoneNumber) -> Type {
    Self::metadata(number).map_or(Type::Unknown, |meta| {
      classify(meta, &number.national().to_string())
    })
  }
}

impl NumberMetadata for LibPhonenumber {
  fn supports_region(&self, region: &str) -> bool {
    Self::region_id(region).is_ok() && DATABASE.by_id(region).is_some()
  }

  fn parse(
    &self,
    text: &str,
    default_region: Option<&str>,
  ) -> Result<PhoneNumber, ProviderError> {
    let region = default_region.map(Self::region_id).transpose()?;
    phonenumber::parse(region, text)
      .map_err(|e| ProviderError::Parse(e.to_string()))
  }

  fn is_valid(&self, number: &PhoneNumber) -> bool {
    number.is_valid()
  }

  fn is_possible(&self, number: &PhoneNumber) -> bool {
    let Some(meta) = Self::metadata(number)
      .or_else(|| Self::main_metadata(number.code().value()))
    else {
      return false;
    };
    let Ok(len) = u16::try_from(self.national_significant_number(number).len())
    else {
      return false;
    };

    // The general descriptor carries no lengths of its own; a number is
    // possible if any type, or its local-only form, has that length.
    let descriptors = meta.descriptors();
    LENGTH_TYPES
      .into_iter()
      .filter_map(|kind| descriptors.get(kind))
      .any(|desc| {
        desc.possible_length().contains(&len)
          || desc.possible_local_length().contains(&len)
      })
  }

  fn country_code(&self, number: &PhoneNumber) -> u16 {
    number.code().value()
  }

  fn region_code(&self, number: &PhoneNumber) -> Option<String> {
    Self::metadata(number).map(|meta| meta.id().to_owned())
  }

  fn line_type(&self, number: &PhoneNumber) -> LineType {
    match Self::number_type(number) {
      Type::Mobile => LineType::Mobile,
      Type::FixedLine => LineType::Landline,
      Type::FixedLineOrMobile => LineType::MobileOrLandline,
      Type::TollFree => LineType::TollFree,
      Type::PremiumRate => LineType::Premium,
      Type::Voip => LineType::Voip,
      Type::PersonalNumber => LineType::Personal,
      Type::Pager => LineType::Pager,
      Type::Uan => LineType::Uan,
      _ => LineType::Unknown,
    }
  }

  fn national_significant_number(&self, number: &PhoneNumber) -> String {
    number.national().to_string()
  }

  fn ndc_length(&self, number: &PhoneNumber) -> usize {
    // "+54 9 11 8765-4321" splits into ["", "54", "9", "11", "8765", "4321"]
    let international = number.format().mode(Mode::International).to_string();
    let groups: Vec<&str> = RE_NON_DIGITS.split(&international).collect();
    if groups.len() <= 3 {
      return 0;
    }

    let has_mobile_token =
      MOBILE_TOKEN_CODES.contains(&self.country_code(number));
    if has_mobile_token && self.line_type(number) == LineType::Mobile {
      return groups[2].len() + groups[3].len();
    }
    groups[2].len()
  }

  fn is_possible_short_number(
    &self,
    number: &PhoneNumber,
  ) -> Result<Option<bool>, ProviderError> {
    let Ok(len) = u16::try_from(self.national_significant_number(number).len())
    else {
      return Ok(Some(false));
    };
    Ok(
      Self::metadata(number)
        .and_then(|meta| meta.descriptors().short_code())
        .map(|desc| desc.possible_length().contains(&len)),
    )
  }

  fn geocode(
    &self,
    number: &PhoneNumber,
  ) -> Result<Option<String>, ProviderError> {
    // Country level only: the crate has no prefix-to-locality tables.
    Ok(
      self
        .region_code(number)
        .and_then(|region| CountryCode::for_alpha2(&region).ok())
        .map(|country| country.name().to_owned()),
    )
  }

  fn carrier_name(
    &self,
    _number: &PhoneNumber,
  ) -> Result<Option<String>, ProviderError> {
    Ok(None)
  }

  fn time_zones(
    &self,
    _number: &PhoneNumber,
  ) -> Result<Vec<String>, ProviderError> {
    Ok(Vec::new())
  }

  fn formats(&self, number: &PhoneNumber) -> Result<Formats, ProviderError> {
    let render = |mode: Mode| number.format().mode(mode).to_string();
    Ok(Formats {
      e164: render(Mode::E164),
      international: render(Mode::International),
      national: render(Mode::National),
      rfc3966: render(Mode::Rfc3966),
    })
  }

  fn is_mobile_portable_region(
    &self,
    region: &str,
  ) -> Result<Option<bool>, ProviderError> {
    Ok(Self::region_metadata(region).map(Metadata::is_mobile_number_portable))
  }

  fn is_emergency_number(
    &self,
    number: &PhoneNumber,
    region: &str,
  ) -> Result<Option<bool>, ProviderError> {
    let Some(desc) = Self::region_metadata(region)
      .and_then(|meta| meta.descriptors().emergency())
    else {
      return Ok(None);
    };
    if self.region_code(number).as_deref() != Some(region) {
      return Ok(Some(false));
    }
    Ok(Some(desc.is_match(&self.national_significant_number(number))))
  }

  fn example_number(
    &self,
    region: &str,
  ) -> Result<Option<String>, ProviderError> {
    let Some(meta) = Self::region_metadata(region) else {
      return Ok(None);
    };
    let descriptors = meta.descriptors();
    let Some(example) = descriptors
      .fixed_line()
      .and_then(|d| d.example())
      .or_else(|| descriptors.general().example())
    else {
      return Ok(None);
    };

    let number = self.parse(example, Some(region))?;
    Ok(Some(number.format().mode(Mode::International).to_string()))
  }
}
