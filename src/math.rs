
//! Two-dimensional vectors and rounding rules for resolution levels.

use std::convert::TryFrom;


/// A pair of values, used for positions, sizes and sampling rates.
/// Only offers the arithmetic that header validation needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec2<T> (pub T, pub T);

impl<T> Vec2<T> {

    /// Apply a function to both components.
    pub fn map<B>(self, map: impl Fn(T) -> B) -> Vec2<B> {
        Vec2(map(self.0), map(self.1))
    }

    /// Convert both components, failing if either conversion fails.
    pub fn try_from<S>(value: Vec2<S>) -> std::result::Result<Self, T::Error> where T: TryFrom<S> {
        Ok(Vec2(T::try_from(value.0)?, T::try_from(value.1)?))
    }

    /// The product of both components.
    pub fn area(self) -> T where T: std::ops::Mul<T, Output = T> {
        self.0 * self.1
    }

    /// The horizontal component.
    #[inline] pub fn x(self) -> T { self.0 }

    /// The vertical component.
    #[inline] pub fn y(self) -> T { self.1 }

    /// The horizontal component, for sizes.
    #[inline] pub fn width(self) -> T { self.0 }

    /// The vertical component, for sizes.
    #[inline] pub fn height(self) -> T { self.1 }
}

impl<T: std::ops::Add<T>> std::ops::Add<Vec2<T>> for Vec2<T> {
    type Output = Vec2<T::Output>;
    fn add(self, other: Vec2<T>) -> Self::Output {
        Vec2(self.0 + other.0, self.1 + other.1)
    }
}

impl<T: std::ops::Sub<T>> std::ops::Sub<Vec2<T>> for Vec2<T> {
    type Output = Vec2<T::Output>;
    fn sub(self, other: Vec2<T>) -> Self::Output {
        Vec2(self.0 - other.0, self.1 - other.1)
    }
}

impl<T> From<(T, T)> for Vec2<T> {
    fn from((x, y): (T, T)) -> Self { Vec2(x, y) }
}

impl<T> From<Vec2<T>> for (T, T) {
    fn from(Vec2(x, y): Vec2<T>) -> Self { (x, y) }
}


/// Whether to round up or down when halving resolutions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RoundingMode {

    /// Towards zero.
    Down,

    /// Away from zero.
    Up,
}

impl RoundingMode {

    /// The binary logarithm, rounded. Zero for zero.
    pub fn log2(self, number: u32) -> u32 {
        if number <= 1 { return 0; }

        let floor = 31 - number.leading_zeros();

        match self {
            RoundingMode::Down => floor,
            RoundingMode::Up => floor + (!number.is_power_of_two()) as u32,
        }
    }

    /// The quotient, rounded. The divisor must not be zero.
    pub fn divide(self, dividend: usize, divisor: usize) -> usize {
        let quotient = dividend / divisor;

        match self {
            RoundingMode::Down => quotient,
            RoundingMode::Up => quotient + (dividend % divisor != 0) as usize,
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn divide_rounding() {
        assert_eq!(RoundingMode::Down.divide(9, 4), 2);
        assert_eq!(RoundingMode::Up.divide(9, 4), 3);
        assert_eq!(RoundingMode::Up.divide(8, 4), 2);
        assert_eq!(RoundingMode::Up.divide(usize::MAX, 2), usize::MAX / 2 + 1);
    }

    #[test]
    fn log2_rounding() {
        assert_eq!(RoundingMode::Down.log2(0), 0);
        assert_eq!(RoundingMode::Up.log2(1), 0);
        assert_eq!(RoundingMode::Down.log2(1024), 10);
        assert_eq!(RoundingMode::Down.log2(1025), 10);
        assert_eq!(RoundingMode::Up.log2(1025), 11);
        assert_eq!(RoundingMode::Up.log2(1024), 10);
        assert_eq!(RoundingMode::Up.log2(u32::MAX), 32);
    }

    #[test]
    fn conversions() {
        assert_eq!(Vec2::<usize>::try_from(Vec2(3_i32, 4)).unwrap(), Vec2(3, 4));
        assert!(Vec2::<usize>::try_from(Vec2(-3_i32, 4)).is_err());
        assert_eq!(Vec2(3_usize, 4).area(), 12);
        assert_eq!(Vec2(1, 2) + Vec2(3, 4), Vec2(4, 6));
    }
}
