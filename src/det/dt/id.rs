use std::fmt;

use crate::error::HierarchyError;

/// Identifier of a drift-tube chamber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DtChamberId {
    wheel: i8,
    station: u8,
    sector: u8,
}

impl DtChamberId {
    /// Creates a chamber id.
    ///
    /// # Errors
    ///
    /// Returns an error if the wheel is outside `-2..=2`, the station outside
    /// `1..=4` or the sector outside `1..=14`.
    pub fn new(wheel: i8, station: u8, sector: u8) -> Result<Self, HierarchyError> {
        if !(-2..=2).contains(&wheel) {
            return Err(HierarchyError::InvalidId(format!("wheel {wheel}")));
        }
        if !(1..=4).contains(&station) {
            return Err(HierarchyError::InvalidId(format!("station {station}")));
        }
        if !(1..=14).contains(&sector) {
            return Err(HierarchyError::InvalidId(format!("sector {sector}")));
        }
        Ok(Self {
            wheel,
            station,
            sector,
        })
    }

    #[must_use]
    pub fn wheel(&self) -> i8 {
        self.wheel
    }

    #[must_use]
    pub fn station(&self) -> u8 {
        self.station
    }

    #[must_use]
    pub fn sector(&self) -> u8 {
        self.sector
    }
}

impl fmt::Display for DtChamberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wh:{} St:{} Se:{}", self.wheel, self.station, self.sector)
    }
}

/// Identifier of a super-layer inside a chamber.
///
/// Super-layers 1 and 3 measure phi, super-layer 2 measures z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DtSuperLayerId {
    chamber: DtChamberId,
    superlayer: u8,
}

impl DtSuperLayerId {
    /// Creates a super-layer id.
    ///
    /// # Errors
    ///
    /// Returns an error if the super-layer number is outside `1..=3`.
    pub fn new(chamber: DtChamberId, superlayer: u8) -> Result<Self, HierarchyError> {
        if !(1..=3).contains(&superlayer) {
            return Err(HierarchyError::InvalidId(format!("superlayer {superlayer}")));
        }
        Ok(Self {
            chamber,
            superlayer,
        })
    }

    #[must_use]
    pub fn chamber(&self) -> DtChamberId {
        self.chamber
    }

    #[must_use]
    pub fn superlayer(&self) -> u8 {
        self.superlayer
    }

    /// `true` for super-layers measuring the bending (phi) coordinate.
    #[must_use]
    pub fn measures_phi(&self) -> bool {
        self.superlayer != 2
    }
}

impl fmt::Display for DtSuperLayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} SL:{}", self.chamber, self.superlayer)
    }
}

/// Identifier of a layer inside a super-layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DtLayerId {
    superlayer: DtSuperLayerId,
    layer: u8,
}

impl DtLayerId {
    /// Creates a layer id.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer number is outside `1..=4`.
    pub fn new(superlayer: DtSuperLayerId, layer: u8) -> Result<Self, HierarchyError> {
        if !(1..=4).contains(&layer) {
            return Err(HierarchyError::InvalidId(format!("layer {layer}")));
        }
        Ok(Self { superlayer, layer })
    }

    #[must_use]
    pub fn superlayer(&self) -> DtSuperLayerId {
        self.superlayer
    }

    #[must_use]
    pub fn chamber(&self) -> DtChamberId {
        self.superlayer.chamber
    }

    #[must_use]
    pub fn layer(&self) -> u8 {
        self.layer
    }
}

impl fmt::Display for DtLayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} L:{}", self.superlayer, self.layer)
    }
}

/// Any drift-tube detector id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetId {
    Chamber(DtChamberId),
    SuperLayer(DtSuperLayerId),
    Layer(DtLayerId),
}

impl DetId {
    /// The chamber this id lives in.
    #[must_use]
    pub fn chamber(&self) -> DtChamberId {
        match self {
            Self::Chamber(id) => *id,
            Self::SuperLayer(id) => id.chamber(),
            Self::Layer(id) => id.chamber(),
        }
    }
}

impl From<DtChamberId> for DetId {
    fn from(id: DtChamberId) -> Self {
        Self::Chamber(id)
    }
}

impl From<DtSuperLayerId> for DetId {
    fn from(id: DtSuperLayerId) -> Self {
        Self::SuperLayer(id)
    }
}

impl From<DtLayerId> for DetId {
    fn from(id: DtLayerId) -> Self {
        Self::Layer(id)
    }
}
