//! Color spaces referenced by name in font colors.
//!
//! Unlike [`TypeIdentifier`](super::type_identifier::TypeIdentifier), a color
//! space that is not registered here cannot be decoded: the components that
//! accompany it are meaningless without knowing the space.

use crate::core::error::{ArchiveError, Result};
use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered color space, stored in documents by its registered name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Srgb,
    ExtendedSrgb,
    LinearSrgb,
    ExtendedLinearSrgb,
    DisplayP3,
    DciP3,
    Itur709,
    Itur2020,
    AdobeRgb1998,
    RommRgb,
    AcesCgLinear,
    GenericRgb,
    GenericRgbLinear,
    GenericCmyk,
    GenericGray,
    GenericGrayGamma2_2,
    ExtendedGray,
    LinearGray,
    GenericLab,
    GenericXyz,
}

/// Every registered color space paired with its name, in declaration order.
pub const REGISTERED_COLOR_SPACES: &[(ColorSpace, &str)] = &[
    (ColorSpace::Srgb, "kCGColorSpaceSRGB"),
    (ColorSpace::ExtendedSrgb, "kCGColorSpaceExtendedSRGB"),
    (ColorSpace::LinearSrgb, "kCGColorSpaceLinearSRGB"),
    (ColorSpace::ExtendedLinearSrgb, "kCGColorSpaceExtendedLinearSRGB"),
    (ColorSpace::DisplayP3, "kCGColorSpaceDisplayP3"),
    (ColorSpace::DciP3, "kCGColorSpaceDCIP3"),
    (ColorSpace::Itur709, "kCGColorSpaceITUR_709"),
    (ColorSpace::Itur2020, "kCGColorSpaceITUR_2020"),
    (ColorSpace::AdobeRgb1998, "kCGColorSpaceAdobeRGB1998"),
    (ColorSpace::RommRgb, "kCGColorSpaceROMMRGB"),
    (ColorSpace::AcesCgLinear, "kCGColorSpaceACESCGLinear"),
    (ColorSpace::GenericRgb, "kCGColorSpaceGenericRGB"),
    (ColorSpace::GenericRgbLinear, "kCGColorSpaceGenericRGBLinear"),
    (ColorSpace::GenericCmyk, "kCGColorSpaceGenericCMYK"),
    (ColorSpace::GenericGray, "kCGColorSpaceGenericGray"),
    (ColorSpace::GenericGrayGamma2_2, "kCGColorSpaceGenericGrayGamma2_2"),
    (ColorSpace::ExtendedGray, "kCGColorSpaceExtendedGray"),
    (ColorSpace::LinearGray, "kCGColorSpaceLinearGray"),
    (ColorSpace::GenericLab, "kCGColorSpaceGenericLab"),
    (ColorSpace::GenericXyz, "kCGColorSpaceGenericXYZ"),
];

impl ColorSpace {
    /// The registered name written to documents.
    #[must_use]
    pub fn name(self) -> &'static str {
        REGISTERED_COLOR_SPACES
            .iter()
            .find(|(space, _)| *space == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }
}

impl FromStr for ColorSpace {
    type Err = ArchiveError;

    fn from_str(name: &str) -> Result<Self> {
        REGISTERED_COLOR_SPACES
            .iter()
            .find(|(_, registered)| *registered == name)
            .map(|(space, _)| *space)
            .ok_or_else(|| ArchiveError::UnknownColorSpace(name.to_string()))
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ColorSpace {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ColorSpace {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(D::Error::custom)
    }
}
