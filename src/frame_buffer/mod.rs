
//! Describes where the samples of each channel are located in memory,
//! and checks these locations before handing them to a pixel engine.

pub mod arena;

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;

use crate::error::*;
use crate::math::Vec2;
use crate::meta::attribute::{ChannelList, IntegerBounds, SampleType, Text};
use crate::meta::header::Header;
pub use self::arena::{MemoryArena, Region, RegionId, RegionState};


/// Describes how the samples of one channel are laid out in a memory region.
///
/// The sample of pixel `(x, y)` is located at
/// `base_offset + (x / sampling.x) * stride.x + (y / sampling.y) * stride.y`,
/// where `x` and `y` are relative to the tile origin if `tile_coordinates` is set.
/// Strides may be negative.
///
/// Two slices are equal if they reference the same region and all other fields are equal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slice {

    /// The type of each sample in memory.
    pub sample_type: SampleType,

    /// The memory that contains the samples.
    pub region: RegionId,

    /// Byte offset of the sample of pixel `(0, 0)`, relative to the start of the readable window.
    pub base_offset: i64,

    /// Byte distance between horizontally and vertically adjacent samples.
    pub stride: Vec2<i64>,

    /// Only pixels whose coordinates are multiples of these values have a sample.
    pub sampling: Vec2<usize>,

    /// The value used when the image does not contain this channel.
    pub fill_value: f64,

    /// Whether the coordinates are relative to the origin of the current tile, per axis.
    pub tile_coordinates: Vec2<bool>,
}

/// The slices for one pixel transfer, sorted by channel name.
/// May contain channels that the image does not contain, and may omit some of its channels.
#[derive(Clone, Debug, PartialEq, Default, Hash)]
pub struct FrameBuffer {
    slices: BTreeMap<Text, Slice>,
}

/// The parts of a pixel transfer that a pixel engine receives.
#[derive(Debug, Clone)]
pub struct Transfer<'t> {

    /// Magic number, version, and header attributes, as written by `Header::to_bytes`.
    pub header_bytes: &'t [u8],

    /// The validated frame buffer. Base offsets are absolute positions in the regions.
    pub frame_buffer: &'t FrameBuffer,

    /// The data window of the image.
    pub data_window: IntegerBounds,

    /// The scan lines to transfer, in increasing order.
    pub scan_lines: RangeInclusive<i32>,
}

/// The external component that compresses, decompresses,
/// and moves samples between memory and pixel blocks.
pub trait PixelEngine {

    /// Store the samples of the scan lines into the regions of the frame buffer.
    fn read_pixels(&mut self, transfer: Transfer<'_>, arena: &mut MemoryArena) -> UnitResult;

    /// Take the samples of the scan lines from the regions of the frame buffer.
    fn write_pixels(&mut self, transfer: Transfer<'_>, arena: &MemoryArena) -> UnitResult;
}

/// A frame buffer that has been checked against a header.
/// Pixel transfers fail if any referenced region changed since binding.
#[derive(Debug)]
pub struct BoundFrameBuffer {
    frame_buffer: FrameBuffer,
    header_bytes: Vec<u8>,
    data_window: IntegerBounds,
    snapshot: u64,
    closed: bool,
}


impl Slice {

    /// A slice of tightly packed samples of a single channel,
    /// starting at the beginning of the region, with rows of one sample.
    /// Use the `with_` methods to describe other layouts.
    pub fn new(sample_type: SampleType, region: RegionId) -> Self {
        let sample_size = sample_type.bytes_per_sample() as i64;

        Slice {
            sample_type, region,
            base_offset: 0,
            stride: Vec2(sample_size, sample_size),
            sampling: Vec2(1, 1),
            fill_value: 0.0,
            tile_coordinates: Vec2(false, false),
        }
    }

    /// A slice of one channel inside interleaved pixels that cover the data window, row by row.
    /// The sample of the top left pixel of the window is located `byte_offset` bytes into the region.
    pub fn packed(
        sample_type: SampleType, region: RegionId, data_window: IntegerBounds,
        byte_offset: usize, bytes_per_pixel: usize
    ) -> Self
    {
        let x_stride = bytes_per_pixel as i64;
        let y_stride = x_stride * data_window.size().width();

        let base_offset = byte_offset as i64
            - data_window.min.x() as i64 * x_stride
            - data_window.min.y() as i64 * y_stride;

        Slice::new(sample_type, region)
            .with_strides(x_stride, y_stride)
            .with_base_offset(base_offset)
    }

    /// Set the offset of the sample of pixel `(0, 0)`.
    pub fn with_base_offset(self, base_offset: i64) -> Self {
        Slice { base_offset, .. self }
    }

    /// Set the distances between adjacent samples.
    pub fn with_strides(self, x_stride: i64, y_stride: i64) -> Self {
        Slice { stride: Vec2(x_stride, y_stride), .. self }
    }

    /// Set the subsampling rates.
    pub fn with_sampling(self, sampling: impl Into<Vec2<usize>>) -> Self {
        Slice { sampling: sampling.into(), .. self }
    }

    /// Set the value for missing channels.
    pub fn with_fill_value(self, fill_value: f64) -> Self {
        Slice { fill_value, .. self }
    }

    /// Set whether coordinates are relative to the tile origin.
    pub fn with_tile_coordinates(self, x: bool, y: bool) -> Self {
        Slice { tile_coordinates: Vec2(x, y), .. self }
    }

    /// The byte offset of the sample of a pixel, relative to the same origin as `base_offset`.
    /// Returns none if the slice has no sample at that pixel because of subsampling.
    pub fn sample_offset(&self, x: i32, y: i32, tile_origin: Vec2<i32>) -> Option<i64> {
        let sampling = self.sampling.map(|sampling| sampling as i64);
        if sampling.x() == 0 || sampling.y() == 0 { return None; }

        let (x, y) = (x as i64, y as i64);
        if x.rem_euclid(sampling.x()) != 0 || y.rem_euclid(sampling.y()) != 0 {
            return None;
        }

        let relative_x = if self.tile_coordinates.x() { x - tile_origin.x() as i64 } else { x };
        let relative_y = if self.tile_coordinates.y() { y - tile_origin.y() as i64 } else { y };

        Some(
            self.base_offset
                + (relative_x / sampling.x()) * self.stride.x()
                + (relative_y / sampling.y()) * self.stride.y()
        )
    }

    /// The smallest reachable byte offset and the offset one past the largest reachable byte,
    /// over the whole width of the data window and the specified scan lines.
    /// Offsets have the same origin as `base_offset`.
    /// Returns `Error::OutOfBounds` if the scan lines are not inside the data window.
    pub fn reachable_bytes(&self, data_window: IntegerBounds, scan_line_1: i32, scan_line_2: i32) -> Result<(i64, i64)> {
        let first_line = scan_line_1.min(scan_line_2);
        let last_line = scan_line_1.max(scan_line_2);

        if first_line < data_window.min.y() || last_line > data_window.max.y() {
            return Err(Error::out_of_bounds(format!(
                "scan lines {} ..= {} are not inside the data window lines {} ..= {}",
                first_line, last_line, data_window.min.y(), data_window.max.y()
            )));
        }

        if self.sampling.x() == 0 || self.sampling.y() == 0 {
            return Err(Error::invalid("slice sampling must be at least 1"));
        }

        // sampling divides the coordinates before the stride is applied,
        // so all terms are scaled by both sampling rates to stay exact
        let overflow = || Error::out_of_bounds(format!(
            "byte offsets of the slice with base offset {} and strides {:?} overflow",
            self.base_offset, self.stride
        ));

        let sampling_x = i128::try_from(self.sampling.x()).map_err(|_| overflow())?;
        let sampling_y = i128::try_from(self.sampling.y()).map_err(|_| overflow())?;
        let denominator = sampling_x.checked_mul(sampling_y).ok_or_else(overflow)?;

        let scaled = |stride: i64, coordinate: i32, sampling: i128| {
            i128::from(stride).checked_mul(i128::from(coordinate))?.checked_mul(sampling)
        };

        let horizontal = [
            scaled(self.stride.x(), data_window.min.x(), sampling_y).ok_or_else(overflow)?,
            scaled(self.stride.x(), data_window.max.x(), sampling_y).ok_or_else(overflow)?,
        ];

        let vertical = [
            scaled(self.stride.y(), first_line, sampling_x).ok_or_else(overflow)?,
            scaled(self.stride.y(), last_line, sampling_x).ok_or_else(overflow)?,
        ];

        let base = i128::from(self.base_offset).checked_mul(denominator).ok_or_else(overflow)?;
        let extreme = |pick: fn(i128, i128) -> i128| {
            base.checked_add(pick(horizontal[0], horizontal[1]))?
                .checked_add(pick(vertical[0], vertical[1]))
        };

        let min = extreme(i128::min).ok_or_else(overflow)?.div_euclid(denominator);

        // ceiling division, the denominator is positive
        let max = extreme(i128::max).ok_or_else(overflow)?;
        let max = max.div_euclid(denominator) + if max.rem_euclid(denominator) == 0 { 0 } else { 1 };

        let sample_size = self.sample_type.bytes_per_sample() as i128;
        let min = i64::try_from(min).map_err(|_| overflow())?;
        let end = i64::try_from(max + sample_size).map_err(|_| overflow())?;
        Ok((min, end))
    }

    /// Check that all samples of the scan lines are inside the readable window of the region.
    /// The base offset is relative to the start of that window.
    pub fn validate_for_data_window(&self, data_window: IntegerBounds, scan_line_1: i32, scan_line_2: i32, region: &Region) -> UnitResult {
        let readable = (region.limit() - region.position()) as i64;
        self.validate_reachable(&Text::default(), data_window, scan_line_1, scan_line_2, 0, readable)
    }

    fn validate_reachable(&self, name: &Text, data_window: IntegerBounds, scan_line_1: i32, scan_line_2: i32, start: i64, end: i64) -> UnitResult {
        let (min, max) = self.reachable_bytes(data_window, scan_line_1, scan_line_2)?;

        if min < start || max > end {
            return Err(Error::out_of_bounds(format!(
                "slice `{}` reaches bytes {} .. {} for lines {} ..= {}, but only {} .. {} are readable",
                name, min, max, scan_line_1.min(scan_line_2), scan_line_1.max(scan_line_2), start, end
            )));
        }

        Ok(())
    }
}

// floats are hashed by their bits, consistent with equality for all non-nan values
impl Hash for Slice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sample_type.hash(state);
        self.region.hash(state);
        self.base_offset.hash(state);
        self.stride.hash(state);
        self.sampling.hash(state);
        self.fill_value.to_bits().hash(state);
        self.tile_coordinates.hash(state);
    }
}


impl FrameBuffer {

    /// Create a frame buffer without slices.
    pub fn new() -> Self {
        Self::default()
    }

    /// One slice per channel, all channels interleaved per pixel in a single region,
    /// covering the data window row by row. The region needs
    /// `channels.bytes_per_pixel() * width * height` bytes.
    pub fn packed(channels: &ChannelList, data_window: IntegerBounds, region: RegionId) -> Result<Self> {
        let bytes_per_pixel = channels.bytes_per_pixel();
        let mut frame_buffer = FrameBuffer::new();

        for (byte_offset, name, channel) in channels.channels_with_byte_offset() {
            let slice = Slice::packed(channel.sample_type, region, data_window, byte_offset, bytes_per_pixel)
                .with_sampling(channel.sampling);

            frame_buffer.insert(name.clone(), slice)?;
        }

        Ok(frame_buffer)
    }

    /// Insert the slice, or replace the slice of the same name.
    /// Returns the previous slice of that name.
    /// Returns `Error::Invalid` for empty names and zero sampling rates.
    pub fn insert(&mut self, name: impl Into<Text>, slice: Slice) -> Result<Option<Slice>> {
        let name = name.into();

        if name.is_empty() {
            return Err(Error::invalid("slice name must not be empty"));
        }

        if slice.sampling.x() == 0 || slice.sampling.y() == 0 {
            return Err(Error::invalid(format!("slice `{}` has a sampling rate of zero", name)));
        }

        Ok(self.slices.insert(name, slice))
    }

    /// The slice with this name, if any.
    pub fn find(&self, name: impl AsRef<[u8]>) -> Option<&Slice> {
        self.slices.get(name.as_ref())
    }

    /// The slice with this name.
    /// Returns `Error::Invalid` if there is no such slice.
    pub fn get(&self, name: impl AsRef<[u8]>) -> Result<&Slice> {
        let name = name.as_ref();
        self.find(name).ok_or_else(|| Error::invalid(format!(
            "slice `{}` not found", Text::from_slice_unchecked(name)
        )))
    }

    /// Remove the slice with this name, returning it if it existed.
    pub fn remove(&mut self, name: impl AsRef<[u8]>) -> Option<Slice> {
        self.slices.remove(name.as_ref())
    }

    /// Iterate over the slices in ascending name order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (&Text, &Slice)> {
        self.slices.iter()
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether there are no slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Check all slices against the data window and the readable windows of their regions.
    /// Base offsets are relative to the start of each readable window.
    pub fn validate_for_data_window(&self, arena: &MemoryArena, data_window: IntegerBounds, scan_line_1: i32, scan_line_2: i32) -> UnitResult {
        for (name, slice) in self.iter() {
            let region = arena.get(slice.region)?;
            let readable = (region.limit() - region.position()) as i64;
            slice.validate_reachable(name, data_window, scan_line_1, scan_line_2, 0, readable)?;
        }

        Ok(())
    }
}


/// Values of `u32` fill values must be whole numbers of at most this magnitude.
const MAX_UINT_FILL_VALUE: f64 = 0xffff_ffff_u32 as f64;

impl BoundFrameBuffer {

    /// Check the frame buffer against the header, and copy it for later transfers.
    /// The header must pass `Header::sanity_check`, and the frame buffer must not be empty.
    ///
    /// Each slice that belongs to a channel must have the sampling of that channel.
    /// Slices without a channel are filled with their fill value.
    /// The base offsets of the copy are shifted by the start of the readable window of each region.
    pub fn bind(header: &Header, is_tiled: bool, frame_buffer: &FrameBuffer, arena: &MemoryArena) -> Result<Self> {
        if frame_buffer.is_empty() {
            return Err(Error::invalid("cannot bind an empty frame buffer"));
        }

        header.sanity_check(is_tiled)?;
        let mut bound = FrameBuffer::new();

        for (name, slice) in frame_buffer.iter() {
            if slice.sampling.x() == 0 || slice.sampling.y() == 0 {
                return Err(Error::invalid(format!("slice `{}` has a sampling rate of zero", name)));
            }

            match header.channels.find(name) {
                Some(channel) => {
                    if channel.sampling != slice.sampling {
                        return Err(Error::invalid(format!(
                            "slice `{}` has sampling {:?}, but the channel has sampling {:?}",
                            name, slice.sampling, channel.sampling
                        )));
                    }
                },

                None => tracing::warn!(
                    slice = %name, fill_value = slice.fill_value,
                    "frame buffer slice has no matching channel and will be filled"
                ),
            }

            if slice.sample_type == SampleType::U32 {
                let fill = slice.fill_value;

                if !fill.is_finite() || fill.abs() > MAX_UINT_FILL_VALUE {
                    return Err(Error::invalid(format!(
                        "fill value {} of unsigned integer slice `{}` is out of range", fill, name
                    )));
                }
            }

            let region = arena.get(slice.region)
                .map_err(|_| Error::invalid(format!("slice `{}` refers to a released memory region", name)))?;

            let shifted = slice.with_base_offset(slice.base_offset + region.position() as i64);
            bound.insert(name.clone(), shifted)?;
        }

        let header_bytes = header.to_bytes(is_tiled)?;
        let snapshot = Self::compute_snapshot(&bound, arena);

        tracing::debug!(slices = bound.len(), header_bytes = header_bytes.len(), "bound frame buffer");

        Ok(BoundFrameBuffer {
            frame_buffer: bound,
            header_bytes,
            data_window: header.data_window,
            snapshot,
            closed: false,
        })
    }

    fn compute_snapshot(frame_buffer: &FrameBuffer, arena: &MemoryArena) -> u64 {
        let mut hasher = DefaultHasher::new();
        frame_buffer.hash(&mut hasher);

        for (_, slice) in frame_buffer.iter() {
            arena.state(slice.region).hash(&mut hasher);
        }

        hasher.finish()
    }

    /// The copied frame buffer, with base offsets relative to the start of each region.
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// The serialized header that the pixel engine receives.
    pub fn header_bytes(&self) -> &[u8] {
        &self.header_bytes
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Check that all samples of the scan lines are inside the readable windows of their regions.
    pub fn validate_for_data_window(&self, arena: &MemoryArena, scan_line_1: i32, scan_line_2: i32) -> UnitResult {
        for (name, slice) in self.frame_buffer.iter() {
            let region = arena.get(slice.region)?;

            slice.validate_reachable(
                name, self.data_window, scan_line_1, scan_line_2,
                region.position() as i64, region.limit() as i64
            )?;
        }

        Ok(())
    }

    fn prepare(&self, arena: &MemoryArena, scan_line_1: i32, scan_line_2: i32) -> Result<RangeInclusive<i32>> {
        if self.closed {
            return Err(Error::invalid("frame buffer has been closed"));
        }

        if Self::compute_snapshot(&self.frame_buffer, arena) != self.snapshot {
            return Err(Error::modified("a memory region of the frame buffer changed since it was bound"));
        }

        self.validate_for_data_window(arena, scan_line_1, scan_line_2)?;
        Ok(scan_line_1.min(scan_line_2) ..= scan_line_1.max(scan_line_2))
    }

    /// Let the pixel engine store the samples of the scan lines into the regions.
    pub fn read_pixels(&mut self, engine: &mut impl PixelEngine, arena: &mut MemoryArena, scan_line_1: i32, scan_line_2: i32) -> UnitResult {
        let scan_lines = self.prepare(arena, scan_line_1, scan_line_2)?;

        engine.read_pixels(Transfer {
            header_bytes: &self.header_bytes,
            frame_buffer: &self.frame_buffer,
            data_window: self.data_window,
            scan_lines,
        }, arena)
    }

    /// Let the pixel engine take the samples of the scan lines from the regions.
    pub fn write_pixels(&mut self, engine: &mut impl PixelEngine, arena: &MemoryArena, scan_line_1: i32, scan_line_2: i32) -> UnitResult {
        let scan_lines = self.prepare(arena, scan_line_1, scan_line_2)?;

        engine.write_pixels(Transfer {
            header_bytes: &self.header_bytes,
            frame_buffer: &self.frame_buffer,
            data_window: self.data_window,
            scan_lines,
        }, arena)
    }

    /// End all transfers. Any later transfer returns `Error::Invalid`.
    pub fn close(&mut self) {
        self.closed = true;
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::meta::attribute::{Channel, LineOrder};

    fn float_slice(arena: &mut MemoryArena, byte_count: usize) -> Slice {
        let region = arena.allocate(byte_count);
        Slice::new(SampleType::F32, region).with_strides(12, 12 * 1024)
    }

    #[test]
    fn sample_offsets(){
        let region = MemoryArena::new().allocate(0);
        let slice = Slice::new(SampleType::F16, region)
            .with_strides(2, 200)
            .with_base_offset(10)
            .with_sampling((2, 2));

        assert_eq!(slice.sample_offset(4, 6, Vec2(0, 0)), Some(10 + 2 * 2 + 3 * 200));
        assert_eq!(slice.sample_offset(3, 6, Vec2(0, 0)), None);
        assert_eq!(slice.sample_offset(4, -2, Vec2(0, 0)), Some(10 + 2 * 2 - 200));

        let tiled = Slice::new(SampleType::F16, region).with_strides(2, 20).with_tile_coordinates(true, true);
        assert_eq!(tiled.sample_offset(65, 66, Vec2(64, 64)), Some(2 + 2 * 20));
        assert_eq!(tiled.sample_offset(65, 66, Vec2(0, 0)), Some(65 * 2 + 66 * 20));
    }

    #[test]
    fn negative_strides(){
        // bottom-up rows: the first scan line is stored at the end of the region
        let mut arena = MemoryArena::new();
        let region = arena.allocate(4 * 10 * 10);
        let window = IntegerBounds::from_dimensions((10, 10));

        let slice = Slice::new(SampleType::F32, region)
            .with_strides(4, -40)
            .with_base_offset(4 * 10 * 9);

        slice.validate_for_data_window(window, 0, 9, arena.get(region).unwrap()).unwrap();
        assert_eq!(slice.reachable_bytes(window, 0, 9).unwrap(), (0, 400));

        let shifted = slice.with_base_offset(4 * 10 * 9 + 4);
        assert!(matches!(
            shifted.validate_for_data_window(window, 0, 9, arena.get(region).unwrap()),
            Err(Error::OutOfBounds(_))
        ));
    }

    #[test]
    fn subsampled_reach_uses_floor_and_ceil(){
        let mut arena = MemoryArena::new();
        let region = arena.allocate(1000);
        let window = IntegerBounds::new((0, 0), (9, 9));

        let slice = Slice::new(SampleType::F16, region)
            .with_strides(2, 10)
            .with_sampling((2, 2));

        // the last sample is at 9 * 2 / 2 horizontally and 9 * 10 / 2 vertically
        assert_eq!(slice.reachable_bytes(window, 0, 9).unwrap(), (0, 9 + 45 + 2));
    }

    #[test]
    fn frame_buffer_lookup(){
        let mut arena = MemoryArena::new();
        let mut frame_buffer = FrameBuffer::new();
        let slice = float_slice(&mut arena, 0);

        assert_eq!(frame_buffer.insert("Z", slice).unwrap(), None);
        assert_eq!(frame_buffer.insert("Z", slice.with_fill_value(1.0)).unwrap(), Some(slice));
        assert!(frame_buffer.insert("", slice).is_err());
        assert!(frame_buffer.insert("A", slice.with_sampling((0, 1))).is_err());

        assert_eq!(frame_buffer.get("Z").unwrap().fill_value, 1.0);
        assert!(frame_buffer.find("Y").is_none());
        assert!(matches!(frame_buffer.get("Y"), Err(Error::Invalid(_))));
    }

    #[test]
    fn packed_layout(){
        let mut channels = ChannelList::new();
        channels.insert("B", Channel::new(SampleType::F16, false)).unwrap();
        channels.insert("G", Channel::new(SampleType::F32, false)).unwrap();
        channels.insert("R", Channel::new(SampleType::F16, false)).unwrap();

        let window = IntegerBounds::new((-5, 10), (4, 19));
        let mut arena = MemoryArena::new();
        let region = arena.allocate(channels.bytes_per_pixel() * 100);

        let frame_buffer = FrameBuffer::packed(&channels, window, region).unwrap();
        frame_buffer.validate_for_data_window(&arena, window, 10, 19).unwrap();

        let green = frame_buffer.get("G").unwrap();
        assert_eq!(green.sample_offset(-5, 10, Vec2(0, 0)), Some(2));
        assert_eq!(green.sample_offset(-4, 10, Vec2(0, 0)), Some(8 + 2));
        assert_eq!(green.sample_offset(-5, 11, Vec2(0, 0)), Some(80 + 2));
    }

    #[test]
    fn binding_checks_sampling_and_fill(){
        let mut header = Header::new((16, 16));
        header.channels.insert("Y", Channel::new(SampleType::F16, false)).unwrap();

        let mut arena = MemoryArena::new();
        let region = arena.allocate(16 * 16 * 4);

        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.insert("Y", Slice::new(SampleType::U32, region).with_strides(4, 64).with_sampling((2, 1))).unwrap();
        assert!(matches!(BoundFrameBuffer::bind(&header, false, &frame_buffer, &arena), Err(Error::Invalid(_))));

        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.insert("count", Slice::new(SampleType::U32, region).with_strides(4, 64).with_fill_value(-1.0e10)).unwrap();
        assert!(matches!(BoundFrameBuffer::bind(&header, false, &frame_buffer, &arena), Err(Error::Invalid(_))));

        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.insert("count", Slice::new(SampleType::U32, region).with_strides(4, 64).with_fill_value(7.0)).unwrap();
        assert!(BoundFrameBuffer::bind(&header, false, &frame_buffer, &arena).is_ok());

        arena.release(region).unwrap();
        assert!(matches!(BoundFrameBuffer::bind(&header, false, &frame_buffer, &arena), Err(Error::Invalid(_))));
    }

    #[test]
    fn reach_is_exact_for_large_offsets(){
        let mut arena = MemoryArena::new();
        let region = arena.allocate(16);

        // a single pixel far to the right, with a stride so large that
        // the base offset and the horizontal term only cancel out exactly in integers
        let x: i32 = (1 << 29) + 1;
        let window = IntegerBounds::new((x, 0), (x, 0));
        let stride: i64 = (1 << 33) + 1;

        let slice = Slice::new(SampleType::F32, region)
            .with_strides(stride, 4)
            .with_base_offset(-(i64::from(x) * stride) - 8);

        assert_eq!(slice.sample_offset(x, 0, Vec2(0, 0)), Some(-8));
        assert_eq!(slice.reachable_bytes(window, 0, 0).unwrap(), (-8, -4));

        assert!(matches!(
            slice.validate_for_data_window(window, 0, 0, arena.get(region).unwrap()),
            Err(Error::OutOfBounds(_))
        ));

        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.insert("Z", slice).unwrap();
        assert!(matches!(frame_buffer.validate_for_data_window(&arena, window, 0, 0), Err(Error::OutOfBounds(_))));

        let inside = slice.with_base_offset(-(i64::from(x) * stride) + 12);
        assert_eq!(inside.reachable_bytes(window, 0, 0).unwrap(), (12, 16));
        inside.validate_for_data_window(window, 0, 0, arena.get(region).unwrap()).unwrap();
    }

    #[test]
    fn overflowing_reach_is_out_of_bounds(){
        let region = MemoryArena::new().allocate(0);
        let window = IntegerBounds::new((-1000, 0), (1000, 0));

        let slice = Slice::new(SampleType::F16, region)
            .with_strides(i64::MAX, 2)
            .with_base_offset(i64::MAX);

        assert!(matches!(slice.reachable_bytes(window, 0, 0), Err(Error::OutOfBounds(_))));
    }

    #[test]
    fn binding_requires_a_valid_header_and_slices(){
        let mut arena = MemoryArena::new();
        let region = arena.allocate(4 * 4 * 4);

        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.insert("Z", Slice::new(SampleType::F32, region).with_strides(4, 16)).unwrap();

        let mut header = Header::new((4, 4));
        header.pixel_aspect = 0.0;
        header.line_order = LineOrder::Unspecified;
        assert!(matches!(BoundFrameBuffer::bind(&header, false, &frame_buffer, &arena), Err(Error::Invalid(_))));

        let header = Header::new((4, 4));
        assert!(BoundFrameBuffer::bind(&header, true, &frame_buffer, &arena).is_err(), "tiled header without tiles");
        assert!(matches!(BoundFrameBuffer::bind(&header, false, &FrameBuffer::new(), &arena), Err(Error::Invalid(_))));
        assert!(BoundFrameBuffer::bind(&header, false, &frame_buffer, &arena).is_ok());
    }

    #[test]
    fn binding_shifts_base_offset_by_window_start(){
        let header = Header::new((4, 4));
        let mut arena = MemoryArena::new();
        let region = arena.allocate(100 + 4 * 4 * 4);
        arena.set_window(region, 100, 100 + 4 * 4 * 4).unwrap();

        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.insert("Z", Slice::new(SampleType::F32, region).with_strides(4, 16)).unwrap();
        frame_buffer.validate_for_data_window(&arena, header.data_window, 0, 3).unwrap();

        let bound = BoundFrameBuffer::bind(&header, false, &frame_buffer, &arena).unwrap();
        assert_eq!(bound.frame_buffer().get("Z").unwrap().base_offset, 100);
        bound.validate_for_data_window(&arena, 0, 3).unwrap();
    }
}
