
//! Owns the byte regions that slices point into.
//! Regions are addressed by index and generation,
//! so an id of a released region can never reach a newer region in the same slot.

use crate::error::*;


/// Identifies one region of a `MemoryArena`.
/// Two slices reference the same memory exactly if their ids are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId {
    index: usize,
    generation: u32,
}

/// A byte buffer with a readable window `position .. limit`.
/// Slices may only reach bytes inside that window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    bytes: Vec<u8>,
    position: usize,
    limit: usize,
}

/// The observable layout of a region, used to detect changes after binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionState {

    /// The id of the region, including its generation.
    pub id: RegionId,

    /// Start of the readable window.
    pub position: usize,

    /// End of the readable window, exclusive.
    pub limit: usize,

    /// Number of bytes in the region.
    pub len: usize,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    region: Option<Region>,
}

/// Owns all memory that frame buffers refer to.
#[derive(Clone, Debug, Default)]
pub struct MemoryArena {
    slots: Vec<Slot>,
}


impl Region {

    /// All bytes of this region, ignoring the readable window.
    pub fn bytes(&self) -> &[u8] { &self.bytes }

    /// All bytes of this region, ignoring the readable window.
    pub fn bytes_mut(&mut self) -> &mut [u8] { &mut self.bytes }

    /// The bytes inside the readable window.
    pub fn readable(&self) -> &[u8] { &self.bytes[self.position .. self.limit] }

    /// Start of the readable window.
    pub fn position(&self) -> usize { self.position }

    /// End of the readable window, exclusive.
    pub fn limit(&self) -> usize { self.limit }

    /// Number of bytes in the whole region.
    pub fn len(&self) -> usize { self.bytes.len() }

    /// Whether this region has no bytes.
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }
}

impl MemoryArena {

    /// Create an arena without any regions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zeroed region of the specified size, readable as a whole.
    pub fn allocate(&mut self, byte_count: usize) -> RegionId {
        self.insert(vec![0; byte_count])
    }

    /// Take ownership of the bytes as a new region, readable as a whole.
    pub fn insert(&mut self, bytes: Vec<u8>) -> RegionId {
        let region = Region { position: 0, limit: bytes.len(), bytes };

        if let Some(index) = self.slots.iter().position(|slot| slot.region.is_none()) {
            let slot = &mut self.slots[index];
            slot.region = Some(region);
            RegionId { index, generation: slot.generation }
        }

        else {
            self.slots.push(Slot { generation: 0, region: Some(region) });
            RegionId { index: self.slots.len() - 1, generation: 0 }
        }
    }

    /// Remove the region and return its bytes.
    /// Afterwards, the id refers to no region at all.
    pub fn release(&mut self, id: RegionId) -> Result<Vec<u8>> {
        self.get(id)?;

        let slot = &mut self.slots[id.index];
        slot.generation = slot.generation.wrapping_add(1);

        slot.region.take().map(|region| region.bytes)
            .ok_or_else(|| Error::invalid(format!("memory region {:?} has been released", id)))
    }

    /// The region with this id.
    /// Returns `Error::Invalid` if it has been released.
    pub fn get(&self, id: RegionId) -> Result<&Region> {
        self.slots.get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.region.as_ref())
            .ok_or_else(|| Error::invalid(format!("memory region {:?} has been released", id)))
    }

    /// The region with this id.
    /// Returns `Error::Invalid` if it has been released.
    pub fn get_mut(&mut self, id: RegionId) -> Result<&mut Region> {
        self.slots.get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.region.as_mut())
            .ok_or_else(|| Error::invalid(format!("memory region {:?} has been released", id)))
    }

    /// Whether the id refers to a region that has not been released.
    pub fn contains(&self, id: RegionId) -> bool {
        self.get(id).is_ok()
    }

    /// Restrict the readable window of a region.
    /// Requires `position <= limit <= len`.
    pub fn set_window(&mut self, id: RegionId, position: usize, limit: usize) -> UnitResult {
        let region = self.get_mut(id)?;

        if position > limit || limit > region.bytes.len() {
            return Err(Error::invalid(format!(
                "window {} .. {} does not fit into memory region of {} bytes",
                position, limit, region.bytes.len()
            )));
        }

        region.position = position;
        region.limit = limit;
        Ok(())
    }

    /// The current layout of a region, or none if it has been released.
    pub fn state(&self, id: RegionId) -> Option<RegionState> {
        self.get(id).ok().map(|region| RegionState {
            id, position: region.position, limit: region.limit, len: region.bytes.len(),
        })
    }
}
