/// Ring of the most recent magnitudes. Snapshots are in slot order, not
/// rotated back into time order.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    slots: Vec<f32>,
    ingested: u64,
}

impl SampleWindow {
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0.0; capacity.max(1)],
            ingested: 0,
        }
    }

    pub fn ingest(&mut self, magnitude: f32) {
        let slot = (self.ingested % self.slots.len() as u64) as usize;
        self.slots[slot] = magnitude;
        self.ingested += 1;
    }

    pub fn is_full(&self) -> bool {
        self.ingested >= self.slots.len() as u64
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn ingested(&self) -> u64 {
        self.ingested
    }

    pub fn snapshot(&self) -> Vec<f32> {
        self.slots.clone()
    }

    /// Copies the slots into `out` without allocating. `out` must hold exactly
    /// `capacity()` values.
    pub fn snapshot_into(&self, out: &mut [f32]) {
        out.copy_from_slice(&self.slots);
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = 0.0);
        self.ingested = 0;
    }
}
