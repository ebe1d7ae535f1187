//! M-block slot layouts and the port/cross-lane mapping.
//!
//! A LUCIDAC cluster carries two M-block slots of eight cross-lanes each.
//! Slot `s` owns cross-lanes `8s..8s+8` on both the output side (feeding the
//! U-block) and the input side (fed by the I-block). The [`MBlockSetup`]
//! trait maps element ports onto these cross-lanes and back.

use crate::assigned::AssignedElementPort;
use crate::element::{Direction, ElementKind};
use lucidac_common::{Clane, CLANES_PER_SLOT, NUM_SLOTS};
use serde::{Deserialize, Serialize};

/// The kind of M-block plugged into a slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum MBlockKind {
    /// Integrator block: eight integrators, one cross-lane each.
    Int,
    /// Multiplier block: four multipliers with inputs `a`, `b`.
    Mul,
}

impl MBlockKind {
    /// Number of element instances one block of this kind provides.
    pub fn capacity(self) -> u32 {
        match self {
            MBlockKind::Int => 8,
            MBlockKind::Mul => 4,
        }
    }

    /// Returns the element kind instantiated by this block.
    pub fn element_kind(self) -> ElementKind {
        match self {
            MBlockKind::Int => ElementKind::Int,
            MBlockKind::Mul => ElementKind::Mul,
        }
    }

    fn for_element(kind: ElementKind) -> Option<MBlockKind> {
        match kind {
            ElementKind::Int => Some(MBlockKind::Int),
            ElementKind::Mul => Some(MBlockKind::Mul),
            ElementKind::Daq
            | ElementKind::Extout
            | ElementKind::Extin
            | ElementKind::Const
            | ElementKind::Pot => None,
        }
    }
}

/// A concrete assignment of physical element ports to matrix cross-lanes.
pub trait MBlockSetup: std::fmt::Debug {
    /// Returns the cross-lane a physical element port is wired to.
    ///
    /// Output ports map to M-block output cross-lanes (U-block inputs), input
    /// ports to M-block input cross-lanes (I-block outputs). Virtual elements
    /// and instances beyond the hardware's capacity are not assignable.
    fn port_to_clane(&self, port: &AssignedElementPort) -> Option<Clane>;

    /// Inverse of [`port_to_clane`](Self::port_to_clane).
    ///
    /// `Direction::Source` reads the M-block output layout, `Direction::Sink`
    /// the input layout.
    fn clane_to_port(&self, clane: Clane, direction: Direction) -> AssignedElementPort;
}

/// Which M-block kind sits in which slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SlotLayout {
    /// Block kind per slot, slot 0 first.
    pub slots: [MBlockKind; NUM_SLOTS],
}

impl SlotLayout {
    /// The standard LUCIDAC: multipliers in slot 0, integrators in slot 1.
    ///
    /// Output cross-lanes are `[mul0..mul3, ref, ref, ref, ref, int0..int7]`,
    /// input cross-lanes `[mul0a, mul0b, .., mul3a, mul3b, int0..int7]`.
    pub const fn standard() -> Self {
        Self {
            slots: [MBlockKind::Mul, MBlockKind::Int],
        }
    }

    /// Creates a layout from explicit slot kinds.
    pub const fn new(slots: [MBlockKind; NUM_SLOTS]) -> Self {
        Self { slots }
    }

    /// Returns the first slot holding integrators, if any.
    pub fn integrator_slot(&self) -> Option<usize> {
        self.slots.iter().position(|&k| k == MBlockKind::Int)
    }

    /// Returns how many instances of a physical element kind fit this layout.
    pub fn capacity(&self, kind: ElementKind) -> u32 {
        MBlockKind::for_element(kind).map_or(0, |block| {
            let count = self.slots.iter().filter(|&&k| k == block).count() as u32;
            count * block.capacity()
        })
    }

    /// Index of the `nth` slot holding `block`.
    fn nth_slot(&self, block: MBlockKind, nth: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, &k)| k == block)
            .nth(nth)
            .map(|(slot, _)| slot)
    }

    /// Number of slots of the same kind before `slot`.
    fn rank_of(&self, slot: usize) -> usize {
        let kind = self.slots[slot];
        self.slots[..slot].iter().filter(|&&k| k == kind).count()
    }
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self::standard()
    }
}

impl MBlockSetup for SlotLayout {
    fn port_to_clane(&self, port: &AssignedElementPort) -> Option<Clane> {
        let block = MBlockKind::for_element(port.kind())?;
        let capacity = block.capacity();
        let slot = self.nth_slot(block, (port.id() / capacity) as usize)?;
        let local = (port.id() % capacity) as usize;

        let slotlane = match (block, port.port()) {
            (MBlockKind::Int, "in" | "out") => local,
            (MBlockKind::Mul, "out") => local,
            (MBlockKind::Mul, "a") => 2 * local,
            (MBlockKind::Mul, "b") => 2 * local + 1,
            _ => return None,
        };
        Clane::new(slot * CLANES_PER_SLOT + slotlane)
    }

    fn clane_to_port(&self, clane: Clane, direction: Direction) -> AssignedElementPort {
        let slot = clane.index() / CLANES_PER_SLOT;
        let slotlane = clane.index() % CLANES_PER_SLOT;
        let block = self.slots[slot];
        let base = self.rank_of(slot) as u32 * block.capacity();

        match (block, direction) {
            (MBlockKind::Int, Direction::Source) => {
                AssignedElementPort::from_catalog(ElementKind::Int, base + slotlane as u32, "out")
            }
            (MBlockKind::Int, Direction::Sink) => {
                AssignedElementPort::from_catalog(ElementKind::Int, base + slotlane as u32, "in")
            }
            (MBlockKind::Mul, Direction::Source) if slotlane < block.capacity() as usize => {
                AssignedElementPort::from_catalog(ElementKind::Mul, base + slotlane as u32, "out")
            }
            // Unused multiplier outputs carry constant references.
            (MBlockKind::Mul, Direction::Source) => {
                AssignedElementPort::from_catalog(ElementKind::Const, clane.as_raw() as u32, "source")
            }
            (MBlockKind::Mul, Direction::Sink) => AssignedElementPort::from_catalog(
                ElementKind::Mul,
                base + (slotlane / 2) as u32,
                if slotlane % 2 == 0 { "a" } else { "b" },
            ),
        }
    }
}
