//! Date/time fields of the Garmin header
//!
//! Months are stored 0-based; the update year is a single byte pivoted
//! around 1999.

/// Update year bytes at or above this pivot belong to the 1900s
pub const UPDATE_YEAR_PIVOT: u8 = 0x63;

/// Last update (year and month)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateDate {
    /// Full year
    pub year: u16,

    /// Month (1-12)
    pub month: u8,
}

impl UpdateDate {
    /// Decode from the raw 0-based month byte and the pivoted year byte
    pub fn from_bytes(month: u8, year: u8) -> Self {
        Self {
            year: full_update_year(year),
            month: month.wrapping_add(1),
        }
    }
}

/// Expand the one-byte update year
pub fn full_update_year(year: u8) -> u16 {
    if year >= UPDATE_YEAR_PIVOT {
        1900 + year as u16
    } else {
        2000 + year as u16
    }
}

/// Creation timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationTime {
    /// Full year
    pub year: u16,

    /// Month (1-12)
    pub month: u8,

    /// Day (1-31)
    pub day: u8,

    /// Hour (0-23)
    pub hour: u8,

    /// Minute (0-59)
    pub minute: u8,

    /// Second (0-59)
    pub second: u8,
}

impl CreationTime {
    /// Decode from the six raw fields, month 0-based
    pub fn from_fields(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month: month.wrapping_add(1),
            day,
            hour,
            minute,
            second,
        }
    }
}
