//! Event payloads emitted by the engine.

use std::fmt;

use qm_core::{LinkId, Tick, VehicleId};

/// One entry in the engine's event stream.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub time: Tick,
    pub kind: EventKind,
}

/// What happened.  Every kind names the link on which it happened and the
/// vehicle it happened to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// An agent began a leg: its vehicle was inserted on `link` as a
    /// departing vehicle.
    Departure { link: LinkId, vehicle: VehicleId },

    /// The vehicle entered `link`'s travelling queue.
    LinkEnter { link: LinkId, vehicle: VehicleId },

    /// The vehicle was popped from `link`'s gate by the downstream node.
    LinkLeave { link: LinkId, vehicle: VehicleId },

    /// The vehicle reached its trip end and left the network at the
    /// downstream end of `link`.
    NetworkExit { link: LinkId, vehicle: VehicleId },

    /// The vehicle was removed from `link` by an external collaborator
    /// (teleport, agent termination, forced cleanup).
    Removed { link: LinkId, vehicle: VehicleId },
}

impl EventKind {
    /// Label used as the CSV `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Departure { .. }   => "departure",
            EventKind::LinkEnter { .. }   => "link_enter",
            EventKind::LinkLeave { .. }   => "link_leave",
            EventKind::NetworkExit { .. } => "network_exit",
            EventKind::Removed { .. }     => "removed",
        }
    }

    pub fn link(&self) -> LinkId {
        match *self {
            EventKind::Departure { link, .. }
            | EventKind::LinkEnter { link, .. }
            | EventKind::LinkLeave { link, .. }
            | EventKind::NetworkExit { link, .. }
            | EventKind::Removed { link, .. } => link,
        }
    }

    pub fn vehicle(&self) -> VehicleId {
        match *self {
            EventKind::Departure { vehicle, .. }
            | EventKind::LinkEnter { vehicle, .. }
            | EventKind::LinkLeave { vehicle, .. }
            | EventKind::NetworkExit { vehicle, .. }
            | EventKind::Removed { vehicle, .. } => vehicle,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} veh={} link={}",
            self.time,
            self.kind.as_str(),
            self.kind.vehicle().0,
            self.kind.link().0
        )
    }
}
