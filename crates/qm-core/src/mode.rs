//! Transportation mode enum and the per-link allowed-mode set.

/// The means by which a vehicle travels the network.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum TransportMode {
    /// Private car — the reference vehicle (1.0 pcu).
    #[default]
    Car,
    /// Heavy goods vehicle.
    Truck,
    /// Bicycle.
    Bike,
    /// On foot.
    Walk,
    /// Scheduled public transit (bus, rail, ferry…).
    Transit,
}

impl TransportMode {
    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car     => "car",
            TransportMode::Truck   => "truck",
            TransportMode::Bike    => "bike",
            TransportMode::Walk    => "walk",
            TransportMode::Transit => "transit",
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            TransportMode::Car     => 1 << 0,
            TransportMode::Truck   => 1 << 1,
            TransportMode::Bike    => 1 << 2,
            TransportMode::Walk    => 1 << 3,
            TransportMode::Transit => 1 << 4,
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ModeSet ───────────────────────────────────────────────────────────────────

/// Compact set of [`TransportMode`]s — the "allowed modes" attribute of a
/// link.  A `u8` bitmask rather than a `HashSet` because it is copied into
/// every link and queried on hot paths.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeSet(u8);

impl ModeSet {
    /// The empty set.
    pub const NONE: ModeSet = ModeSet(0);
    /// Car-only — the default for links built without an explicit mode set.
    pub const CAR_ONLY: ModeSet = ModeSet(TransportMode::Car.bit());

    /// Build a set from a slice of modes.
    pub fn of(modes: &[TransportMode]) -> Self {
        let mut bits = 0u8;
        for m in modes {
            bits |= m.bit();
        }
        ModeSet(bits)
    }

    /// Return a copy of `self` with `mode` added.
    #[must_use]
    pub const fn with(self, mode: TransportMode) -> Self {
        ModeSet(self.0 | mode.bit())
    }

    #[inline]
    pub const fn contains(self, mode: TransportMode) -> bool {
        self.0 & mode.bit() != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for ModeSet {
    fn default() -> Self {
        ModeSet::CAR_ONLY
    }
}
