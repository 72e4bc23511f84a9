use crate::error::{QuadtreeError, QuadtreeResult};

#[derive(Debug, Clone)]
pub struct Config {
    /// A leaf partitions once it holds this many entities.
    pub node_capacity: usize,
    /// A node is only partitioned if each quadrant would be at least this wide.
    pub min_cell_width: f32,
    /// A node is only partitioned if each quadrant would be at least this tall.
    pub min_cell_height: f32,
    /// Node slots reserved up front in the arena.
    pub pool_size: usize,
}

impl Config {
    pub fn validate(&self) -> QuadtreeResult<()> {
        if self.node_capacity == 0 {
            return Err(QuadtreeError::InvalidConfig {
                reason: "node_capacity must be at least 1",
            });
        }
        if !self.min_cell_width.is_finite() || self.min_cell_width <= 0.0 {
            return Err(QuadtreeError::InvalidConfig {
                reason: "min_cell_width must be finite and positive",
            });
        }
        if !self.min_cell_height.is_finite() || self.min_cell_height <= 0.0 {
            return Err(QuadtreeError::InvalidConfig {
                reason: "min_cell_height must be finite and positive",
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            node_capacity: 4,
            min_cell_width: 16.0,
            min_cell_height: 16.0,
            pool_size: 64,
        }
    }
}
