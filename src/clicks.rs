pub const DEFAULT_CLICK_CAPACITY: usize = 20;
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 2000;

/// Ripple marker for a replayed click, positioned in percent space
#[derive(Debug, Clone, PartialEq)]
pub struct ClickMarker {
    pub x: f64,
    pub y: f64,
    pub id: String,
}

/// Recent click markers. Grows freely between sweeps; a sweep keeps only the
/// newest `capacity` entries in their original order.
#[derive(Debug, Clone)]
pub struct ClickBuffer {
    markers: Vec<ClickMarker>,
    capacity: usize,
    sweep_interval_ms: u64,
    last_sweep_ms: Option<f64>,
    next_id: u64,
}

impl ClickBuffer {
    pub fn new(capacity: usize, sweep_interval_ms: u64) -> Self {
        Self {
            markers: Vec::new(),
            capacity,
            sweep_interval_ms,
            last_sweep_ms: None,
            next_id: 0,
        }
    }

    pub fn push(&mut self, x: f64, y: f64) -> &ClickMarker {
        self.next_id += 1;
        self.markers.push(ClickMarker {
            x,
            y,
            id: format!("click-{}", self.next_id),
        });
        &self.markers[self.markers.len() - 1]
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Drop the oldest markers beyond capacity. Returns how many were evicted.
    pub fn sweep(&mut self) -> usize {
        let excess = self.markers.len().saturating_sub(self.capacity);
        if excess > 0 {
            self.markers.drain(..excess);
        }
        excess
    }

    /// Sweep when a full interval of wall-clock time has passed since the
    /// previous sweep. The first call only starts the interval.
    pub fn maybe_sweep(&mut self, now_ms: f64) -> bool {
        match self.last_sweep_ms {
            None => {
                self.last_sweep_ms = Some(now_ms);
                false
            }
            Some(last) if now_ms - last >= self.sweep_interval_ms as f64 => {
                self.last_sweep_ms = Some(now_ms);
                let evicted = self.sweep();
                if evicted > 0 {
                    tracing::trace!(evicted, kept = self.markers.len(), "click buffer swept");
                }
                true
            }
            Some(_) => false,
        }
    }

    pub fn markers(&self) -> &[ClickMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ClickBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CLICK_CAPACITY, DEFAULT_SWEEP_INTERVAL_MS)
    }
}
