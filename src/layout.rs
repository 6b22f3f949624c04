use crate::error::LayoutError;
use crate::geometry::Obstacle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Static obstacle layout of one maze level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeLayout {
    pub world_width: i32,
    pub world_height: i32,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl MazeLayout {
    pub fn new(world_width: i32, world_height: i32, obstacles: Vec<Obstacle>) -> Self {
        MazeLayout {
            world_width,
            world_height,
            obstacles,
        }
    }

    /// Open world surrounded by a ring of cell-sized wall blocks
    pub fn bordered(world_width: i32, world_height: i32, cell_size: i32) -> Self {
        let cell_size = cell_size.max(1);
        let mut obstacles = Vec::new();

        for x in (0..world_width).step_by(cell_size as usize) {
            obstacles.push(Obstacle::new(x, 0, cell_size, cell_size));
            obstacles.push(Obstacle::new(x, world_height - cell_size, cell_size, cell_size));
        }
        for y in (0..world_height).step_by(cell_size as usize) {
            obstacles.push(Obstacle::new(0, y, cell_size, cell_size));
            obstacles.push(Obstacle::new(world_width - cell_size, y, cell_size, cell_size));
        }

        MazeLayout::new(world_width, world_height, obstacles)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LayoutError> {
        let layout: MazeLayout = serde_json::from_str(json)?;
        if layout.world_width <= 0 || layout.world_height <= 0 {
            return Err(LayoutError::InvalidWorld {
                width: layout.world_width,
                height: layout.world_height,
            });
        }
        Ok(layout)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
