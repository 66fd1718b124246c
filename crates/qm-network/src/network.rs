//! Network representation and builder.
//!
//! # Units
//!
//! Flow capacity is supplied the way surveys usually publish it — vehicles
//! per *capacity period* (default 3,600 s, i.e. veh/h) — and normalised to
//! pcu/second at build time.  Storage capacity is derived from geometry:
//!
//!   storage = length_m / cell_size_m * lanes        [pcu]
//!
//! where `cell_size_m` (default 7.5 m) is the lane length one passenger car
//! occupies in a standing queue.  Storage is floored at 1.0 pcu so a single
//! vehicle always fits on an otherwise-empty link, however short.

use qm_core::{LinkId, ModeSet, NodeId};

use crate::{NetworkBuildError, NetworkResult};

/// Default queue cell size: lane metres occupied by one standing car.
pub const DEFAULT_CELL_SIZE_M: f64 = 7.5;

/// Default capacity period: flow capacities are veh/hour unless configured.
pub const DEFAULT_CAPACITY_PERIOD_SECS: f64 = 3_600.0;

// ── LinkSpec ──────────────────────────────────────────────────────────────────

/// Raw per-link input to [`NetworkBuilder::add_link`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkSpec {
    pub from: NodeId,
    pub to: NodeId,
    /// Physical length in metres.  Zero is allowed (connector links).
    pub length_m: f64,
    /// Free-flow speed in m/s.
    pub freespeed_ms: f64,
    /// Flow capacity in vehicles per capacity period (see builder config).
    pub flow_capacity: f64,
    /// Lane count.  Fractional values are allowed (e.g. 1.5 for a wide lane
    /// with occasional passing).
    pub lanes: f64,
    /// Modes permitted on this link.
    pub modes: ModeSet,
}

impl LinkSpec {
    /// Car-only link with the given geometry and capacity.
    pub fn new(
        from: NodeId,
        to: NodeId,
        length_m: f64,
        freespeed_ms: f64,
        flow_capacity: f64,
        lanes: f64,
    ) -> Self {
        Self {
            from,
            to,
            length_m,
            freespeed_ms,
            flow_capacity,
            lanes,
            modes: ModeSet::CAR_ONLY,
        }
    }

    /// Replace the allowed-mode set.
    #[must_use]
    pub fn modes(mut self, modes: ModeSet) -> Self {
        self.modes = modes;
        self
    }
}

// ── LinkAttributes ────────────────────────────────────────────────────────────

/// Validated, normalised static attributes of one directed link.
///
/// Read-only after [`NetworkBuilder::build`]; the engine never mutates these.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkAttributes {
    pub from: NodeId,
    pub to: NodeId,
    pub length_m: f64,
    pub freespeed_ms: f64,
    /// Flow capacity normalised to pcu per second.
    pub flow_pcu_per_sec: f64,
    pub lanes: f64,
    pub modes: ModeSet,
    /// Derived storage capacity in pcu, floored at 1.0.
    pub storage_pcu: f64,
}

impl LinkAttributes {
    /// `true` if `mode` may use this link.
    #[inline]
    pub fn allows(&self, mode: qm_core::TransportMode) -> bool {
        self.modes.contains(mode)
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Immutable network topology: link attributes plus per-node adjacency.
///
/// Do not construct directly; use [`NetworkBuilder`].
#[derive(Debug)]
pub struct Network {
    links: Vec<LinkAttributes>,
    /// Links whose `to` is this node.  Indexed by `NodeId`.
    node_in_links: Vec<Vec<LinkId>>,
    /// Links whose `from` is this node.  Indexed by `NodeId`.
    node_out_links: Vec<Vec<LinkId>>,
    cell_size_m: f64,
}

impl Network {
    pub fn node_count(&self) -> usize {
        self.node_in_links.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn link(&self, id: LinkId) -> &LinkAttributes {
        &self.links[id.index()]
    }

    /// All links in stable id order.
    pub fn links(&self) -> &[LinkAttributes] {
        &self.links
    }

    /// Links entering `node`, in insertion order.
    #[inline]
    pub fn in_links(&self, node: NodeId) -> &[LinkId] {
        &self.node_in_links[node.index()]
    }

    /// Links leaving `node`, in insertion order.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> &[LinkId] {
        &self.node_out_links[node.index()]
    }

    pub fn cell_size_m(&self) -> f64 {
        self.cell_size_m
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// Nodes and links may be added in any order; `build()` validates every link
/// against the registered nodes and normalises capacities.
///
/// # Example
///
/// ```
/// use qm_network::{LinkSpec, NetworkBuilder};
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node();
/// let c = b.add_node();
/// // 1 km, 10 m/s, 3600 veh/h, one lane
/// b.add_link(LinkSpec::new(a, c, 1_000.0, 10.0, 3_600.0, 1.0));
/// let net = b.build().unwrap();
/// assert_eq!(net.link_count(), 1);
/// assert!((net.link(qm_core::LinkId(0)).flow_pcu_per_sec - 1.0).abs() < 1e-12);
/// ```
pub struct NetworkBuilder {
    node_count: usize,
    raw_links: Vec<LinkSpec>,
    cell_size_m: f64,
    capacity_period_secs: f64,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            node_count: 0,
            raw_links: Vec::new(),
            cell_size_m: DEFAULT_CELL_SIZE_M,
            capacity_period_secs: DEFAULT_CAPACITY_PERIOD_SECS,
        }
    }

    /// Pre-allocate for the expected number of links to reduce reallocations
    /// when bulk-loading a large network.
    pub fn with_capacity(links: usize) -> Self {
        let mut b = Self::new();
        b.raw_links = Vec::with_capacity(links);
        b
    }

    /// Override the queue cell size (default 7.5 m per car).
    #[must_use]
    pub fn cell_size_m(mut self, metres: f64) -> Self {
        self.cell_size_m = metres;
        self
    }

    /// Override the capacity period (default 3,600 s: capacities are veh/h).
    #[must_use]
    pub fn capacity_period_secs(mut self, secs: f64) -> Self {
        self.capacity_period_secs = secs;
        self
    }

    /// Register a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.node_count as u32);
        self.node_count += 1;
        id
    }

    /// Register a directed link and return its `LinkId` (sequential from 0).
    ///
    /// Validation is deferred to [`build`](Self::build).
    pub fn add_link(&mut self, spec: LinkSpec) -> LinkId {
        let id = LinkId(self.raw_links.len() as u32);
        self.raw_links.push(spec);
        id
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn link_count(&self) -> usize {
        self.raw_links.len()
    }

    /// Validate every link and freeze the topology.
    ///
    /// # Errors
    ///
    /// See [`NetworkBuildError`] — unknown node references and non-positive
    /// speed/capacity/lanes are all construction-time failures.
    pub fn build(self) -> NetworkResult<Network> {
        if self.capacity_period_secs <= 0.0 {
            return Err(NetworkBuildError::NonPositiveCapacityPeriod(
                self.capacity_period_secs,
            ));
        }
        if self.cell_size_m <= 0.0 {
            return Err(NetworkBuildError::NonPositiveCellSize(self.cell_size_m));
        }

        let mut links = Vec::with_capacity(self.raw_links.len());
        let mut node_in_links = vec![Vec::new(); self.node_count];
        let mut node_out_links = vec![Vec::new(); self.node_count];

        for (i, spec) in self.raw_links.into_iter().enumerate() {
            for node in [spec.from, spec.to] {
                if node.index() >= self.node_count {
                    return Err(NetworkBuildError::UnknownNode {
                        link_index: i,
                        node,
                    });
                }
            }
            if spec.freespeed_ms <= 0.0 {
                return Err(NetworkBuildError::NonPositiveFreespeed {
                    link_index: i,
                    value: spec.freespeed_ms,
                });
            }
            if spec.flow_capacity <= 0.0 {
                return Err(NetworkBuildError::NonPositiveFlowCapacity {
                    link_index: i,
                    value: spec.flow_capacity,
                });
            }
            if spec.lanes <= 0.0 {
                return Err(NetworkBuildError::NonPositiveLanes {
                    link_index: i,
                    value: spec.lanes,
                });
            }
            if spec.length_m < 0.0 {
                return Err(NetworkBuildError::NegativeLength {
                    link_index: i,
                    value: spec.length_m,
                });
            }

            let id = LinkId(i as u32);
            node_out_links[spec.from.index()].push(id);
            node_in_links[spec.to.index()].push(id);

            // Floor at one pcu so a lone vehicle can always occupy the link.
            let storage_pcu =
                (spec.length_m / self.cell_size_m * spec.lanes).max(1.0);

            links.push(LinkAttributes {
                from: spec.from,
                to: spec.to,
                length_m: spec.length_m,
                freespeed_ms: spec.freespeed_ms,
                flow_pcu_per_sec: spec.flow_capacity / self.capacity_period_secs,
                lanes: spec.lanes,
                modes: spec.modes,
                storage_pcu,
            });
        }

        log::debug!(
            "built network: {} nodes, {} links, cell size {} m",
            self.node_count,
            links.len(),
            self.cell_size_m
        );

        Ok(Network {
            links,
            node_in_links,
            node_out_links,
            cell_size_m: self.cell_size_m,
        })
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
