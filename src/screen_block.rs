use std::num::NonZeroU32;

use itertools::iproduct;
use nalgebra::Vector2;

use crate::geometry::{FloatType, ScreenBlock, ScreenPoint, ScreenSize};

pub trait ScreenBlockExt {
    fn from_size(size: ScreenSize) -> Self;

    fn is_empty(&self) -> bool;

    fn area(&self) -> usize;

    /// Iterates over coordinates inside the block, in C order (x changes first, then y)
    fn internal_points(&self) -> impl Iterator<Item = ScreenPoint>;

    /// Splits the block into tiles of at most `tile_size` * `tile_size` pixels
    /// (tiles on the right and bottom edge get clipped), ordered by distance of the
    /// tile center from the center of the block.
    fn tile_ordering(&self, tile_size: NonZeroU32) -> Vec<ScreenBlock>;
}

impl ScreenBlockExt for ScreenBlock {
    fn from_size(size: ScreenSize) -> Self {
        ScreenBlock::new(ScreenPoint::origin(), ScreenPoint::from(size))
    }

    fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    fn internal_points(&self) -> impl Iterator<Item = ScreenPoint> {
        iproduct!(self.min.y..self.max.y, self.min.x..self.max.x).map(|(y, x)| ScreenPoint::new(x, y))
    }

    fn tile_ordering(&self, tile_size: NonZeroU32) -> Vec<ScreenBlock> {
        if self.is_empty() {
            return Vec::new();
        }

        let tile_size = tile_size.get();
        let tile_counts = Vector2::new(
            self.width().div_ceil(tile_size),
            self.height().div_ceil(tile_size),
        );

        let mut tiles: Vec<ScreenBlock> = iproduct!(0..tile_counts.y, 0..tile_counts.x)
            .map(|(ty, tx)| {
                let min = self.min + Vector2::new(tx, ty) * tile_size;
                let max = ScreenPoint::new(
                    (min.x + tile_size).min(self.max.x),
                    (min.y + tile_size).min(self.max.y),
                );
                ScreenBlock::new(min, max)
            })
            .collect();

        let center = block_center(self);
        // Stable sort, tiles at the same distance stay in row order
        tiles.sort_by(|a, b| {
            let da = (block_center(a) - center).norm_squared();
            let db = (block_center(b) - center).norm_squared();
            da.total_cmp(&db)
        });

        tiles
    }
}

fn block_center(block: &ScreenBlock) -> Vector2<FloatType> {
    (block.min.coords.cast::<FloatType>() + block.max.coords.cast::<FloatType>()) / 2.0
}
