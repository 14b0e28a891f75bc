
//! Rectangles, ratios and matrices.

use std::convert::TryFrom;

use crate::io::*;
use crate::error::*;
use crate::math::Vec2;


/// Row-major 3x3 `f32` matrix.
pub type Matrix3x3 = [f32; 9];

/// Row-major 4x4 `f32` matrix.
pub type Matrix4x4 = [f32; 16];

/// Row-major 3x3 `f64` matrix.
pub type DoubleMatrix3x3 = [f64; 9];

/// Row-major 4x4 `f64` matrix.
pub type DoubleMatrix4x4 = [f64; 16];


/// An integer rectangle with inclusive corners, as stored in `box2i` attributes.
/// Valid rectangles have `min <= max` and keep all coordinates
/// strictly between `-COORDINATE_LIMIT` and `COORDINATE_LIMIT`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntegerBounds {

    /// Inclusive top left corner.
    pub min: Vec2<i32>,

    /// Inclusive bottom right corner.
    pub max: Vec2<i32>,
}

/// A float rectangle, as stored in `box2f` attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatRect {

    /// Top left corner.
    pub min: Vec2<f32>,

    /// Bottom right corner.
    pub max: Vec2<f32>,
}

/// A signed numerator over an unsigned denominator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {

    /// May be negative.
    pub numerator: i32,

    /// Zero is representable, but not a meaningful ratio.
    pub denominator: u32,
}


impl IntegerBounds {

    /// Half of the `i32` range.
    pub const COORDINATE_LIMIT: i32 = i32::MAX / 2;

    /// The single pixel at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A rectangle from its inclusive corners.
    pub fn new(min: impl Into<Vec2<i32>>, max: impl Into<Vec2<i32>>) -> Self {
        IntegerBounds { min: min.into(), max: max.into() }
    }

    /// The rectangle from the origin to `size - 1`.
    /// Sizes beyond `i32` saturate, and fail validation later.
    pub fn from_dimensions(size: impl Into<Vec2<usize>>) -> Self {
        let size: Vec2<usize> = size.into();
        let last_index = |length: usize| i32::try_from(length).map_or(i32::MAX, |length| length - 1);
        IntegerBounds::new(Vec2(0, 0), size.map(last_index))
    }

    /// Width and height. Zero or negative for inverted rectangles.
    pub fn size(self) -> Vec2<i64> {
        let extent = |min: i32, max: i32| i64::from(max) - i64::from(min) + 1;
        Vec2(extent(self.min.x(), self.max.x()), extent(self.min.y(), self.max.y()))
    }

    /// Whether the pixel lies inside, corners included.
    pub fn contains(self, position: Vec2<i32>) -> bool {
        let within = |value: i32, min: i32, max: i32| min <= value && value <= max;
        within(position.x(), self.min.x(), self.max.x()) && within(position.y(), self.min.y(), self.max.y())
    }

    /// Fails with `Error::Invalid` for inverted rectangles and coordinates outside the limit.
    /// `name` identifies the rectangle in the message.
    pub fn validate(&self, name: &str) -> UnitResult {
        if self.min.x() > self.max.x() || self.min.y() > self.max.y() {
            return Err(Error::invalid(format!(
                "{} is inverted: min {:?}, max {:?}", name, self.min, self.max
            )));
        }

        let limit = Self::COORDINATE_LIMIT;
        let corners = [self.min.x(), self.min.y(), self.max.x(), self.max.y()];

        if corners.iter().any(|&coordinate| coordinate <= -limit || coordinate >= limit) {
            return Err(Error::invalid(format!(
                "{} from {:?} to {:?} has coordinates beyond ±{}", name, self.min, self.max, limit
            )));
        }

        Ok(())
    }

    /// Four `i32` values.
    pub fn byte_size() -> usize {
        4 * i32::BYTE_SIZE
    }

    /// Write `xmin, ymin, xmax, ymax`. Does not validate.
    pub fn write<W: Write>(&self, write: &mut W) -> UnitResult {
        i32::write_slice(write, &[self.min.x(), self.min.y(), self.max.x(), self.max.y()])
    }

    /// Read `xmin, ymin, xmax, ymax`. Does not validate.
    pub fn read<R: Read>(read: &mut R) -> Result<Self> {
        let mut corners = [0_i32; 4];
        i32::read_slice(read, &mut corners)?;

        let [x_min, y_min, x_max, y_max] = corners;
        Ok(IntegerBounds::new(Vec2(x_min, y_min), Vec2(x_max, y_max)))
    }
}


impl FloatRect {

    /// Four `f32` values.
    pub fn byte_size() -> usize {
        4 * f32::BYTE_SIZE
    }

    /// Write `xmin, ymin, xmax, ymax`.
    pub fn write<W: Write>(&self, write: &mut W) -> UnitResult {
        f32::write_slice(write, &[self.min.x(), self.min.y(), self.max.x(), self.max.y()])
    }

    /// Read `xmin, ymin, xmax, ymax`.
    pub fn read<R: Read>(read: &mut R) -> Result<Self> {
        let mut corners = [0_f32; 4];
        f32::read_slice(read, &mut corners)?;

        let [x_min, y_min, x_max, y_max] = corners;
        Ok(FloatRect { min: Vec2(x_min, y_min), max: Vec2(x_max, y_max) })
    }
}


impl Rational {

    /// A ratio from its parts.
    pub fn new(numerator: i32, denominator: u32) -> Self {
        Rational { numerator, denominator }
    }

    /// The quotient. Infinite or NaN when the denominator is zero.
    pub fn to_f64(self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// An `i32` and a `u32`.
    pub fn byte_size() -> usize {
        i32::BYTE_SIZE + u32::BYTE_SIZE
    }

    /// Write numerator, then denominator.
    pub fn write<W: Write>(self, write: &mut W) -> UnitResult {
        self.numerator.write(write)?;
        self.denominator.write(write)
    }

    /// Read numerator, then denominator.
    pub fn read<R: Read>(read: &mut R) -> Result<Self> {
        Ok(Rational::new(i32::read(read)?, u32::read(read)?))
    }
}

/// Zero over one.
impl Default for Rational {
    fn default() -> Self { Rational::new(0, 1) }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bounds_validation(){
        let window = IntegerBounds::from_dimensions((640, 480));
        assert!(window.validate("data window").is_ok());
        assert_eq!(window.max, Vec2(639, 479));
        assert_eq!(window.size(), Vec2(640, 480));

        assert!(IntegerBounds::new((5, 0), (4, 10)).validate("data window").is_err());
        assert!(IntegerBounds::new((0, 0), (i32::MAX / 2, 10)).validate("data window").is_err());
        assert!(IntegerBounds::new((-(i32::MAX / 2), 0), (10, 10)).validate("data window").is_err());
        assert!(IntegerBounds::new((-(i32::MAX / 2) + 1, 0), (i32::MAX / 2 - 1, 10)).validate("data window").is_ok());

        assert!(IntegerBounds::from_dimensions((usize::MAX, 1)).validate("data window").is_err());
        assert_eq!(IntegerBounds::zero().size(), Vec2(1, 1));
    }

    #[test]
    fn bounds_contain_their_corners(){
        let window = IntegerBounds::new((-2, -2), (9, 9));
        assert!(window.contains(Vec2(-2, 9)));
        assert!(window.contains(Vec2(9, -2)));
        assert!(!window.contains(Vec2(10, 0)));
        assert!(!window.contains(Vec2(0, -3)));
    }

    #[test]
    fn wire_layouts(){
        let mut bytes = Vec::new();
        IntegerBounds::new((1, -1), (2, 3)).write(&mut bytes).unwrap();
        assert_eq!(bytes, vec![1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff, 2, 0, 0, 0, 3, 0, 0, 0]);
        assert_eq!(IntegerBounds::read(&mut bytes.as_slice()).unwrap(), IntegerBounds::new((1, -1), (2, 3)));

        let rect = FloatRect { min: Vec2(0.5, 1.5), max: Vec2(-2.0, 8.25) };
        let mut bytes = Vec::new();
        rect.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), FloatRect::byte_size());
        assert_eq!(FloatRect::read(&mut bytes.as_slice()).unwrap(), rect);

        let mut bytes = Vec::new();
        Rational::new(-24000, 1001).write(&mut bytes).unwrap();
        assert_eq!(&bytes[4..], &1001_u32.to_le_bytes());
        assert_eq!(Rational::read(&mut bytes.as_slice()).unwrap().numerator, -24000);
        assert!(Rational::new(1, 0).to_f64().is_infinite());
    }
}
