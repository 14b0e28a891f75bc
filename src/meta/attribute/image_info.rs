
//! Descriptive attributes: color space, environment maps, film key codes and previews.

use std::convert::TryFrom;
use std::fmt;

use crate::io::*;
use crate::error::*;
use crate::math::Vec2;


/// CIE xy coordinates of the three primaries and the white point.
/// Without this attribute, readers assume the values of `Default`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chromaticities {

    /// Red primary.
    pub red: Vec2<f32>,

    /// Green primary.
    pub green: Vec2<f32>,

    /// Blue primary.
    pub blue: Vec2<f32>,

    /// White point.
    pub white: Vec2<f32>,
}

impl Chromaticities {

    /// Eight `f32` values.
    pub fn byte_size() -> usize {
        8 * f32::BYTE_SIZE
    }

    fn coordinates(&self) -> [f32; 8] {
        [
            self.red.x(), self.red.y(), self.green.x(), self.green.y(),
            self.blue.x(), self.blue.y(), self.white.x(), self.white.y(),
        ]
    }

    /// Write red, green, blue and white, each as x then y.
    pub fn write<W: Write>(&self, write: &mut W) -> UnitResult {
        f32::write_slice(write, &self.coordinates())
    }

    /// Read red, green, blue and white, each as x then y.
    pub fn read<R: Read>(read: &mut R) -> Result<Self> {
        let mut values = [0_f32; 8];
        f32::read_slice(read, &mut values)?;

        let point = |index: usize| Vec2(values[2 * index], values[2 * index + 1]);
        Ok(Chromaticities { red: point(0), green: point(1), blue: point(2), white: point(3) })
    }

    // floats are hashed by their bits
    pub(crate) fn hash_bits(&self) -> [u32; 8] {
        let mut bits = [0_u32; 8];

        for (slot, value) in bits.iter_mut().zip(self.coordinates().iter()) {
            *slot = value.to_bits();
        }

        bits
    }
}

/// Rec. ITU-R BT.709-3 primaries with a D65 white point.
impl Default for Chromaticities {
    fn default() -> Self {
        Chromaticities {
            red: Vec2(0.64, 0.33),
            green: Vec2(0.30, 0.60),
            blue: Vec2(0.15, 0.06),
            white: Vec2(0.3127, 0.3290),
        }
    }
}


/// How an environment map is projected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvironmentMap {

    /// Longitude on the horizontal axis, latitude on the vertical axis.
    LatitudeLongitude,

    /// Six cube faces stacked vertically.
    Cube,
}

coded_enum! {
    EnvironmentMap as u8, "environment map", Error::format;
    LatitudeLongitude = 0, Cube = 1,
}


/// The key code of a motion picture film frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode {

    /// `0 ..= 99`.
    pub film_manufacturer_code: i32,

    /// `0 ..= 99`.
    pub film_type: i32,

    /// `0 ..= 999999`.
    pub film_roll_prefix: i32,

    /// `0 ..= 9999`.
    pub count: i32,

    /// `0 ..= 119`.
    pub perforation_offset: i32,

    /// `1 ..= 15`.
    pub perforations_per_frame: i32,

    /// `20 ..= 120`.
    pub perforations_per_count: i32,
}

impl KeyCode {

    /// Seven `i32` values.
    pub fn byte_size() -> usize {
        7 * i32::BYTE_SIZE
    }

    fn fields(&self) -> [i32; 7] {
        [
            self.film_manufacturer_code, self.film_type, self.film_roll_prefix, self.count,
            self.perforation_offset, self.perforations_per_frame, self.perforations_per_count,
        ]
    }

    /// Fails with `Error::Invalid` if a field is outside the range of its documentation.
    pub fn validate(&self) -> UnitResult {
        const RANGES: [(&str, i32, i32); 7] = [
            ("film manufacturer code", 0, 99),
            ("film type", 0, 99),
            ("film roll prefix", 0, 999_999),
            ("count", 0, 9999),
            ("perforation offset", 0, 119),
            ("perforations per frame", 1, 15),
            ("perforations per count", 20, 120),
        ];

        for (&(field, min, max), &value) in RANGES.iter().zip(self.fields().iter()) {
            if value < min || value > max {
                return Err(Error::invalid(format!("key code {} is {}, expected {} ..= {}", field, value, min, max)));
            }
        }

        Ok(())
    }

    /// Write the seven fields in declaration order.
    pub fn write<W: Write>(&self, write: &mut W) -> UnitResult {
        i32::write_slice(write, &self.fields())
    }

    /// Read the seven fields in declaration order, without validating.
    pub fn read<R: Read>(read: &mut R) -> Result<Self> {
        let mut fields = [0_i32; 7];
        i32::read_slice(read, &mut fields)?;

        let [film_manufacturer_code, film_type, film_roll_prefix, count,
            perforation_offset, perforations_per_frame, perforations_per_count] = fields;

        Ok(KeyCode {
            film_manufacturer_code, film_type, film_roll_prefix, count,
            perforation_offset, perforations_per_frame, perforations_per_count,
        })
    }
}

/// Zero everywhere, with four perforations per frame and 64 per count.
impl Default for KeyCode {
    fn default() -> Self {
        KeyCode {
            film_manufacturer_code: 0,
            film_type: 0,
            film_roll_prefix: 0,
            count: 0,
            perforation_offset: 0,
            perforations_per_frame: 4,
            perforations_per_count: 64,
        }
    }
}


/// A small 8-bit image that approximates the full image.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Preview {

    /// Width and height in pixels.
    pub size: Vec2<usize>,

    /// `4 * width * height` bytes: red, green, blue and alpha of each pixel,
    /// rows from top to bottom.
    pub pixel_data: Vec<u8>,
}

impl Preview {

    /// Two `u32` sizes and the pixel bytes.
    pub fn byte_size(&self) -> usize {
        2 * u32::BYTE_SIZE + self.pixel_data.len()
    }

    fn expected_byte_count(size: Vec2<usize>) -> Option<usize> {
        size.width().checked_mul(size.height())?.checked_mul(4)
    }

    /// Fails with `Error::Invalid` unless there are exactly four bytes per pixel.
    pub fn validate(&self) -> UnitResult {
        if Self::expected_byte_count(self.size) == Some(self.pixel_data.len()) { Ok(()) }
        else {
            Err(Error::invalid(format!(
                "preview of {} by {} pixels has {} bytes instead of four per pixel",
                self.size.width(), self.size.height(), self.pixel_data.len()
            )))
        }
    }

    /// Validate, then write width, height and pixels.
    pub fn write<W: Write>(&self, write: &mut W) -> UnitResult {
        self.validate()?;

        for &length in &[self.size.width(), self.size.height()] {
            u32::try_from(length)?.write(write)?;
        }

        u8::write_slice(write, &self.pixel_data)
    }

    /// Read width, height and pixels.
    /// Fails with `Error::Format` if the pixels would exceed `max_byte_size`.
    pub fn read<R: Read>(read: &mut R, max_byte_size: usize) -> Result<Self> {
        let width = u32_to_usize(u32::read(read)?, "preview width")?;
        let height = u32_to_usize(u32::read(read)?, "preview height")?;

        let byte_count = Self::expected_byte_count(Vec2(width, height))
            .ok_or_else(|| Error::format(format!("preview of {} by {} pixels cannot be addressed", width, height)))?;

        let pixel_data = u8::read_vec(read, byte_count, Some(max_byte_size), "preview pixel bytes")?;
        Ok(Preview { size: Vec2(width, height), pixel_data })
    }
}

impl fmt::Debug for Preview {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Preview({}x{})", self.size.width(), self.size.height())
    }
}
