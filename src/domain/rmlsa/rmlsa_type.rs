use std::str::FromStr;

use crate::error::Error;

/// How route, modulation and spectrum are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RmlsaType {
    /// Route, then modulation, then core and spectrum.
    Sequential,
    /// One algorithm picks all at once.
    Integrated,
}

impl FromStr for RmlsaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sequential" => Ok(RmlsaType::Sequential),
            "Integrated" => Ok(RmlsaType::Integrated),
            _ => Err(Error::UnknownRmlsaType(s.to_string())),
        }
    }
}
