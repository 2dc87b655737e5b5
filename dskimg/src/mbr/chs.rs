//! Cylinder-head-sector addressing
//!
//! See: https://en.wikipedia.org/wiki/Logical_block_addressing#CHS_conversion

/// CHS triple as stored in a partition entry
///
/// Packed layout: head byte, sector (bits 0-5) with cylinder bits 8-9 in
/// bits 6-7, cylinder low byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CylinderHeadSector {
    /// Cylinder (10 bits)
    pub cylinder: u16,

    /// Head
    pub head: u8,

    /// Sector (1-based, 6 bits)
    pub sector: u8,
}

impl CylinderHeadSector {
    /// Create a new triple
    pub fn new(cylinder: u16, head: u8, sector: u8) -> Self {
        Self {
            cylinder,
            head,
            sector,
        }
    }

    /// Unpack from the 3-byte on-disk form
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        let head = bytes[0];
        let sector = bytes[1] & 0x3F;
        let cylinder = ((bytes[1] as u16 & 0xC0) << 2) | bytes[2] as u16;
        Self {
            cylinder,
            head,
            sector,
        }
    }

    /// Pack into the 3-byte on-disk form
    pub fn to_bytes(&self) -> [u8; 3] {
        [
            self.head,
            (self.sector & 0x3F) | (((self.cylinder >> 2) & 0xC0) as u8),
            (self.cylinder & 0xFF) as u8,
        ]
    }
}

/// Disk geometry used for CHS <-> LBA conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    /// Cylinder count
    pub cylinders: u16,

    /// Heads per cylinder
    pub heads: u16,

    /// Sectors per track
    pub sectors: u16,
}

impl Geometry {
    /// Create a new geometry
    pub fn new(cylinders: u16, heads: u16, sectors: u16) -> Self {
        Self {
            cylinders,
            heads,
            sectors,
        }
    }

    /// Decode from the header layout: sectors, heads, cylinders (u16 LE each)
    pub fn from_bytes(bytes: [u8; 6]) -> Self {
        Self {
            sectors: u16::from_le_bytes([bytes[0], bytes[1]]),
            heads: u16::from_le_bytes([bytes[2], bytes[3]]),
            cylinders: u16::from_le_bytes([bytes[4], bytes[5]]),
        }
    }

    /// Total sectors addressed by this geometry
    pub fn total_sectors(&self) -> u64 {
        self.cylinders as u64 * self.heads as u64 * self.sectors as u64
    }

    /// `lba = (cylinder * heads + head) * sectors + (sector - 1)`
    ///
    /// Returns `None` for sector 0, which CHS does not address.
    pub fn to_lba(&self, chs: CylinderHeadSector) -> Option<u64> {
        let sector = (chs.sector as u64).checked_sub(1)?;
        Some((chs.cylinder as u64 * self.heads as u64 + chs.head as u64) * self.sectors as u64 + sector)
    }

    /// Inverse of [`Geometry::to_lba`]
    ///
    /// Returns `None` when the geometry is degenerate or the address does not
    /// fit the packed CHS field widths.
    pub fn to_chs(&self, lba: u64) -> Option<CylinderHeadSector> {
        let heads = self.heads as u64;
        let sectors = self.sectors as u64;
        if heads == 0 || sectors == 0 {
            return None;
        }

        let cylinder = lba / (heads * sectors);
        let head = (lba / sectors) % heads;
        let sector = (lba % sectors) + 1;

        Some(CylinderHeadSector {
            cylinder: u16::try_from(cylinder).ok()?,
            head: u8::try_from(head).ok()?,
            sector: u8::try_from(sector).ok()?,
        })
    }
}
