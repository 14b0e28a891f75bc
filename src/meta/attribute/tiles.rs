
//! Block order and tiling of the pixel data.

use std::convert::TryFrom;

use crate::io::*;
use crate::error::*;
use crate::math::{RoundingMode, Vec2};
use super::bounds::IntegerBounds;


/// The order in which pixel blocks appear in a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineOrder {

    /// Top to bottom.
    Increasing,

    /// Bottom to top.
    Decreasing,

    /// Any order. Tiled images only.
    Unspecified,
}

coded_enum! {
    LineOrder as u8, "line order", Error::format;
    Increasing = 0, Decreasing = 1, Unspecified = 2,
}

impl Default for LineOrder {
    fn default() -> Self { LineOrder::Increasing }
}


/// Which reduced resolutions a tiled image stores besides the full one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelMode {

    /// Only the full resolution.
    Singular,

    /// Resolutions halved in both directions at once.
    MipMap,

    /// Resolutions halved in each direction independently.
    RipMap,
}

coded_enum! {
    LevelMode as u8, "tile level mode", Error::format;
    Singular = 0, MipMap = 1, RipMap = 2,
}


/// The `tiledesc` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileDescription {

    /// Pixels per tile, the same on every level.
    pub tile_size: Vec2<usize>,

    /// Which levels exist.
    pub level_mode: LevelMode,

    /// How odd resolutions are halved.
    pub rounding_mode: RoundingMode,
}

impl TileDescription {

    /// Two `u32` sizes and one mode byte.
    pub fn byte_size() -> usize {
        2 * u32::BYTE_SIZE + u8::BYTE_SIZE
    }

    /// Write the sizes, then `level mode + 16 * rounding mode`.
    pub fn write<W: Write>(&self, write: &mut W) -> UnitResult {
        for &length in &[self.tile_size.width(), self.tile_size.height()] {
            u32::try_from(length).map_err(|_| Error::invalid(format!(
                "tile size {:?} does not fit into 32 bits", self.tile_size
            )))?.write(write)?;
        }

        let rounding: u8 = match self.rounding_mode {
            RoundingMode::Down => 0,
            RoundingMode::Up => 1,
        };

        (self.level_mode.code() | rounding << 4).write(write)
    }

    /// Read without validating the sizes.
    /// Unknown level or rounding modes are `Error::Format`.
    pub fn read<R: Read>(read: &mut R) -> Result<Self> {
        let width = u32_to_usize(u32::read(read)?, "tile width")?;
        let height = u32_to_usize(u32::read(read)?, "tile height")?;
        let mode = u8::read(read)?;

        let level_mode = LevelMode::from_code(mode & 0x0f)
            .ok_or_else(|| Error::format(format!("unknown tile level mode {}", mode & 0x0f)))?;

        let rounding_mode = match mode >> 4 {
            0 => RoundingMode::Down,
            1 => RoundingMode::Up,
            other => return Err(Error::format(format!("unknown tile rounding mode {}", other))),
        };

        Ok(TileDescription { tile_size: Vec2(width, height), level_mode, rounding_mode })
    }

    /// Fails with `Error::Invalid` unless both tile sizes are positive and below the coordinate limit.
    pub fn validate(&self) -> UnitResult {
        let limit = IntegerBounds::COORDINATE_LIMIT as usize;
        let is_valid = |length: usize| length > 0 && length <= limit;

        if is_valid(self.tile_size.width()) && is_valid(self.tile_size.height()) { Ok(()) }
        else {
            Err(Error::invalid(format!("tile size {:?} must be positive and at most {}", self.tile_size, limit)))
        }
    }

    /// How many levels exist in each direction for an image of this full resolution.
    /// Mip maps have the same count in both directions.
    pub fn level_count(&self, full_resolution: Vec2<usize>) -> Vec2<usize> {
        let levels = |length: usize| {
            let length = u32::try_from(length).unwrap_or(u32::MAX);
            self.rounding_mode.log2(length) as usize + 1
        };

        match self.level_mode {
            LevelMode::Singular => Vec2(1, 1),
            LevelMode::RipMap => full_resolution.map(levels),
            LevelMode::MipMap => {
                let count = levels(full_resolution.width().max(full_resolution.height()));
                Vec2(count, count)
            },
        }
    }

    /// The length of one axis on a level, at least one pixel.
    pub fn level_size(&self, full_resolution: usize, level: usize) -> usize {
        let divisor = u32::try_from(level).ok()
            .and_then(|level| 1_usize.checked_shl(level))
            .unwrap_or(usize::MAX);

        self.rounding_mode.divide(full_resolution, divisor).max(1)
    }

    /// Number of tiles that cover a level of this resolution.
    pub fn tile_count(&self, level_resolution: Vec2<usize>) -> Vec2<usize> {
        let tiles = |length: usize, tile: usize| RoundingMode::Up.divide(length, tile.max(1));
        Vec2(
            tiles(level_resolution.width(), self.tile_size.width()),
            tiles(level_resolution.height(), self.tile_size.height()),
        )
    }
}

/// Single level tiles of 32 by 32 pixels.
impl Default for TileDescription {
    fn default() -> Self {
        TileDescription {
            tile_size: Vec2(32, 32),
            level_mode: LevelMode::Singular,
            rounding_mode: RoundingMode::Down,
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tile_description_round_trip(){
        let descriptions = [
            TileDescription { tile_size: Vec2(31, 7), level_mode: LevelMode::MipMap, rounding_mode: RoundingMode::Down },
            TileDescription { tile_size: Vec2(0, 0), level_mode: LevelMode::Singular, rounding_mode: RoundingMode::Up },
            TileDescription { tile_size: Vec2(4294967294, 4294967295), level_mode: LevelMode::RipMap, rounding_mode: RoundingMode::Down },
        ];

        for description in &descriptions {
            let mut bytes = Vec::new();
            description.write(&mut bytes).unwrap();
            assert_eq!(bytes.len(), TileDescription::byte_size());
            assert_eq!(&TileDescription::read(&mut bytes.as_slice()).unwrap(), description);
        }
    }

    #[test]
    fn mode_byte(){
        let mut bytes = Vec::new();
        TileDescription { tile_size: Vec2(64, 32), level_mode: LevelMode::MipMap, rounding_mode: RoundingMode::Up }
            .write(&mut bytes).unwrap();

        assert_eq!(bytes, vec![64, 0, 0, 0, 32, 0, 0, 0, 0x11]);

        let unknown_level: &[u8] = &[64, 0, 0, 0, 32, 0, 0, 0, 0x03];
        assert!(matches!(TileDescription::read(&mut &unknown_level[..]), Err(Error::Format(_))));

        let unknown_rounding: &[u8] = &[64, 0, 0, 0, 32, 0, 0, 0, 0x21];
        assert!(matches!(TileDescription::read(&mut &unknown_rounding[..]), Err(Error::Format(_))));
    }

    #[test]
    fn validation(){
        assert!(TileDescription::default().validate().is_ok());
        assert!(TileDescription { tile_size: Vec2(0, 64), .. TileDescription::default() }.validate().is_err());
        assert!(TileDescription { tile_size: Vec2(64, usize::MAX), .. TileDescription::default() }.validate().is_err());
    }

    #[test]
    fn levels(){
        let tiles = TileDescription {
            tile_size: Vec2(64, 64),
            level_mode: LevelMode::MipMap,
            rounding_mode: RoundingMode::Down,
        };

        assert_eq!(tiles.level_count(Vec2(1024, 300)), Vec2(11, 11));
        assert_eq!(tiles.level_size(300, 3), 37);
        assert_eq!(tiles.level_size(300, 12), 1);
        assert_eq!(tiles.level_size(300, 200), 1);
        assert_eq!(tiles.tile_count(Vec2(1024, 300)), Vec2(16, 5));

        let rip = TileDescription { level_mode: LevelMode::RipMap, rounding_mode: RoundingMode::Up, .. tiles };
        assert_eq!(rip.level_count(Vec2(1024, 300)), Vec2(11, 10));
        assert_eq!(rip.level_size(300, 3), 38);

        let single = TileDescription { level_mode: LevelMode::Singular, .. tiles };
        assert_eq!(single.level_count(Vec2(1024, 300)), Vec2(1, 1));
    }

    #[test]
    fn line_order_codes(){
        for code in 0 ..= 2_u8 {
            let order = LineOrder::read(&mut [code].as_slice()).unwrap();
            assert_eq!(order.code(), code);
        }

        assert!(matches!(LineOrder::read(&mut [3_u8].as_slice()), Err(Error::Format(_))));
        assert_eq!(LineOrder::default(), LineOrder::Increasing);
    }
}
