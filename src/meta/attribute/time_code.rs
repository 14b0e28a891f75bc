//! SMPTE 12M time codes, stored as two packed `u32` words.

use bit_field::BitField;
use std::ops::Range;

use crate::io::*;
use crate::error::*;


/// The time of a frame within a sequence, plus user-defined control bits.
/// Files store it in the TV60 layout. TV50 and FILM24 move or drop some flags.
///
/// The two words are kept as they were read, so that decoding a file and
/// writing it again produces the same bytes, even if a field is not a valid digit pair.
/// The setters only accept values inside the range of each field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TimeCode {
    time_and_flags: u32,
    user_data: u32,
}

const FRAME: Range<usize> = 0 .. 6;
const SECONDS: Range<usize> = 8 .. 15;
const MINUTES: Range<usize> = 16 .. 23;
const HOURS: Range<usize> = 24 .. 30;

const DROP_FRAME: usize = 6;
const COLOR_FRAME: usize = 7;
const FIELD_PHASE: usize = 15;

// positions of the three binary group flags in the TV60 layout
const GROUP_FLAGS: [usize; 3] = [23, 30, 31];

// bits that every layout uses for the time fields
const TIME_MASK: u32 = 0x3f7f_7f3f;

// two decimal digits in the low and high nibble
fn to_bcd(value: u8) -> u32 {
    let value = u32::from(value);
    (value / 10 % 10) << 4 | value % 10
}

// the bit ranges hold at most two digits, so the result fits into u8
fn from_bcd(bcd: u32) -> u8 {
    ((bcd >> 4 & 0xf) * 10 + (bcd & 0xf)) as u8
}

fn group_bits(group: usize) -> Range<usize> {
    4 * group .. 4 * group + 4
}

impl TimeCode {

    /// Two `u32` words.
    pub const BYTE_SIZE: usize = 2 * u32::BYTE_SIZE;

    /// A time code with the specified time and no flags or user data.
    /// Fails with `Error::Invalid` if a field is outside its range.
    pub fn new(hours: u8, minutes: u8, seconds: u8, frame: u8) -> Result<Self> {
        let mut code = TimeCode::default();
        code.set_hours(hours)?;
        code.set_minutes(minutes)?;
        code.set_seconds(seconds)?;
        code.set_frame(frame)?;
        Ok(code)
    }

    /// Use both words unchanged. The time-and-flags word is in the TV60 layout.
    pub fn from_raw(time_and_flags: u32, user_data: u32) -> Self {
        TimeCode { time_and_flags, user_data }
    }

    /// The time-and-flags word in the TV60 layout.
    pub fn time_and_flags(&self) -> u32 { self.time_and_flags }

    /// The eight binary groups packed into one word, the first group in the lowest bits.
    pub fn user_data(&self) -> u32 { self.user_data }

    fn set_digits(&mut self, field: &str, bits: Range<usize>, value: u8, max: u8) -> UnitResult {
        if value > max {
            return Err(Error::invalid(format!("time code {} is {}, but at most {}", field, value, max)));
        }

        self.time_and_flags.set_bits(bits, to_bcd(value));
        Ok(())
    }

    /// Usually `0 ..= 23`, but a time code from a file may contain any two digits.
    pub fn hours(&self) -> u8 { from_bcd(self.time_and_flags.get_bits(HOURS)) }

    /// Fails with `Error::Invalid` if the value is larger than 23.
    pub fn set_hours(&mut self, hours: u8) -> UnitResult {
        self.set_digits("hours", HOURS, hours, 23)
    }

    /// Usually `0 ..= 59`.
    pub fn minutes(&self) -> u8 { from_bcd(self.time_and_flags.get_bits(MINUTES)) }

    /// Fails with `Error::Invalid` if the value is larger than 59.
    pub fn set_minutes(&mut self, minutes: u8) -> UnitResult {
        self.set_digits("minutes", MINUTES, minutes, 59)
    }

    /// Usually `0 ..= 59`.
    pub fn seconds(&self) -> u8 { from_bcd(self.time_and_flags.get_bits(SECONDS)) }

    /// Fails with `Error::Invalid` if the value is larger than 59.
    pub fn set_seconds(&mut self, seconds: u8) -> UnitResult {
        self.set_digits("seconds", SECONDS, seconds, 59)
    }

    /// Usually `0 ..= 29`.
    pub fn frame(&self) -> u8 { from_bcd(self.time_and_flags.get_bits(FRAME)) }

    /// Fails with `Error::Invalid` if the value is larger than 29.
    pub fn set_frame(&mut self, frame: u8) -> UnitResult {
        self.set_digits("frame", FRAME, frame, 29)
    }

    /// Frame numbers are skipped to compensate for NTSC frame rates.
    pub fn drop_frame(&self) -> bool { self.time_and_flags.get_bit(DROP_FRAME) }
    pub fn set_drop_frame(&mut self, value: bool) { self.time_and_flags.set_bit(DROP_FRAME, value); }

    /// The frame belongs to a color frame sequence.
    pub fn color_frame(&self) -> bool { self.time_and_flags.get_bit(COLOR_FRAME) }
    pub fn set_color_frame(&mut self, value: bool) { self.time_and_flags.set_bit(COLOR_FRAME, value); }

    /// Also known as the parity bit.
    pub fn field_phase(&self) -> bool { self.time_and_flags.get_bit(FIELD_PHASE) }
    pub fn set_field_phase(&mut self, value: bool) { self.time_and_flags.set_bit(FIELD_PHASE, value); }

    /// One of the three flags that describe the format of the binary groups.
    /// Returns none if the index is not `0 ..= 2`.
    pub fn binary_group_flag(&self, index: usize) -> Option<bool> {
        GROUP_FLAGS.get(index).map(|&bit| self.time_and_flags.get_bit(bit))
    }

    /// Fails with `Error::Invalid` if the index is not `0 ..= 2`.
    pub fn set_binary_group_flag(&mut self, index: usize, value: bool) -> UnitResult {
        let bit = *GROUP_FLAGS.get(index)
            .ok_or_else(|| Error::invalid(format!("time code binary group flag {} does not exist", index)))?;

        self.time_and_flags.set_bit(bit, value);
        Ok(())
    }

    /// One of the eight user-defined values of 4 bits each.
    /// Returns none if the index is not `0 ..= 7`.
    pub fn binary_group(&self, index: usize) -> Option<u8> {
        if index >= 8 { return None; }
        Some(self.user_data.get_bits(group_bits(index)) as u8)
    }

    /// Fails with `Error::Invalid` if the index is not `0 ..= 7` or the value needs more than 4 bits.
    pub fn set_binary_group(&mut self, index: usize, value: u8) -> UnitResult {
        if index >= 8 {
            return Err(Error::invalid(format!("time code binary group {} does not exist", index)));
        }

        if value > 15 {
            return Err(Error::invalid(format!(
                "time code binary group {} is {}, which needs more than 4 bits", index, value
            )));
        }

        self.user_data.set_bits(group_bits(index), u32::from(value));
        Ok(())
    }

    /// The time-and-flags word in the TV60 layout, which files use.
    pub fn pack_time_as_tv60_u32(&self) -> u32 {
        self.time_and_flags
    }

    /// The time-and-flags word in the TV50 layout. Drops `drop_frame`.
    pub fn pack_time_as_tv50_u32(&self) -> u32 {
        let mut packed = self.time_and_flags & TIME_MASK;
        let flag = |index| self.binary_group_flag(index).unwrap_or(false);

        packed
            .set_bit(COLOR_FRAME, self.color_frame())
            .set_bit(15, flag(0))
            .set_bit(23, flag(2))
            .set_bit(30, flag(1))
            .set_bit(31, self.field_phase());

        packed
    }

    /// The time-and-flags word in the FILM24 layout. Drops `drop_frame` and `color_frame`.
    pub fn pack_time_as_film24_u32(&self) -> u32 {
        let mut packed = self.time_and_flags;
        packed.set_bit(DROP_FRAME, false).set_bit(COLOR_FRAME, false);
        packed
    }

    /// Decode a TV60 time-and-flags word and the user data word.
    pub fn from_tv60_time(packed: u32, user_data: u32) -> Self {
        Self::from_raw(packed, user_data)
    }

    /// Decode a TV50 time-and-flags word. `drop_frame` is always false.
    pub fn from_tv50_time(packed: u32, user_data: u32) -> Self {
        let mut time_and_flags = packed & TIME_MASK;

        time_and_flags
            .set_bit(COLOR_FRAME, packed.get_bit(COLOR_FRAME))
            .set_bit(FIELD_PHASE, packed.get_bit(31))
            .set_bit(GROUP_FLAGS[0], packed.get_bit(15))
            .set_bit(GROUP_FLAGS[1], packed.get_bit(30))
            .set_bit(GROUP_FLAGS[2], packed.get_bit(23));

        Self::from_raw(time_and_flags, user_data)
    }

    /// Decode a FILM24 time-and-flags word. `drop_frame` and `color_frame` are always false.
    pub fn from_film24_time(packed: u32, user_data: u32) -> Self {
        let mut time_and_flags = packed;
        time_and_flags.set_bit(DROP_FRAME, false).set_bit(COLOR_FRAME, false);
        Self::from_raw(time_and_flags, user_data)
    }

    /// The binary groups packed into one word, the first group in the lowest bits.
    pub fn pack_user_data_as_u32(&self) -> u32 {
        self.user_data
    }

    /// Write both words unchanged.
    pub fn write<W: Write>(&self, write: &mut W) -> UnitResult {
        self.time_and_flags.write(write)?;
        self.user_data.write(write)
    }

    /// Read both words in the TV60 layout. Any bit pattern is accepted.
    pub fn read<R: Read>(read: &mut R) -> Result<Self> {
        let time_and_flags = u32::read(read)?;
        let user_data = u32::read(read)?;
        Ok(Self::from_raw(time_and_flags, user_data))
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use rand::{random, Rng};

    fn random_time_code(rng: &mut impl Rng) -> TimeCode {
        let mut code = TimeCode::new(
            rng.random_range(0 .. 24), rng.random_range(0 .. 60),
            rng.random_range(0 .. 60), rng.random_range(0 .. 30),
        ).unwrap();

        code.set_drop_frame(random());
        code.set_color_frame(random());
        code.set_field_phase(random());

        for index in 0 .. 3 { code.set_binary_group_flag(index, random()).unwrap(); }
        for index in 0 .. 8 { code.set_binary_group(index, rng.random_range(0 .. 16)).unwrap(); }

        code
    }

    #[test]
    fn packing_layouts(){
        let mut rng = rand::rng();

        for _ in 0 .. 500 {
            let code = random_time_code(&mut rng);
            let user_data = code.pack_user_data_as_u32();
            assert_eq!(TimeCode::from_tv60_time(code.pack_time_as_tv60_u32(), user_data), code);

            let mut bytes = Vec::new();
            code.write(&mut bytes).unwrap();
            assert_eq!(bytes.len(), TimeCode::BYTE_SIZE);
            assert_eq!(TimeCode::read(&mut bytes.as_slice()).unwrap(), code);

            let mut tv50 = code;
            tv50.set_drop_frame(false);
            assert_eq!(TimeCode::from_tv50_time(code.pack_time_as_tv50_u32(), user_data), tv50);

            let mut film24 = tv50;
            film24.set_color_frame(false);
            assert_eq!(TimeCode::from_film24_time(code.pack_time_as_film24_u32(), user_data), film24);
        }
    }

    #[test]
    fn hours_and_minutes(){
        let mut code = TimeCode::new(10, 53, 26, 0).unwrap();
        code.set_color_frame(true);
        code.set_field_phase(true);

        let packed = code.pack_time_as_tv60_u32();
        assert_eq!(packed, 0x1053_a680);

        let unpacked = TimeCode::from_tv60_time(packed, 0);
        assert_eq!(unpacked.hours(), 10);
        assert_eq!(unpacked.minutes(), 53);
        assert_eq!(unpacked, code);
    }

    #[test]
    fn out_of_range_fields(){
        assert!(TimeCode::new(23, 59, 59, 29).is_ok());
        assert!(TimeCode::new(24, 0, 0, 0).is_err());

        let mut code = TimeCode::default();
        assert!(matches!(code.set_minutes(60), Err(Error::Invalid(_))));
        assert!(code.set_frame(30).is_err());
        assert!(code.set_binary_group(5, 16).is_err());
        assert!(code.set_binary_group(8, 1).is_err());
        assert!(code.set_binary_group_flag(3, true).is_err());
        assert_eq!(code.binary_group_flag(3), None);

        // rejected values leave the words untouched
        assert_eq!(code, TimeCode::default());

        code.set_binary_group(5, 15).unwrap();
        assert_eq!(code.pack_user_data_as_u32(), 0xf << 20);
        assert_eq!(code.binary_group(5), Some(15));
    }

    #[test]
    fn invalid_digits_are_written_back_unchanged(){
        let mut bytes = Vec::new();
        0x3f7f_7f3f_u32.write(&mut bytes).unwrap();
        0xffff_ffff_u32.write(&mut bytes).unwrap();

        let code = TimeCode::read(&mut bytes.as_slice()).unwrap();
        assert_eq!(code.hours(), 45);
        assert_eq!(code.minutes(), 85);
        assert_eq!(code.binary_group(7), Some(15));

        let mut written = Vec::new();
        code.write(&mut written).unwrap();
        assert_eq!(written, bytes);

        let mut edited = code;
        edited.set_hours(12).unwrap();
        assert_eq!(edited.hours(), 12);
        assert_eq!(edited.minutes(), 85);
        assert_eq!(edited.time_and_flags() & !0x3f00_0000, code.time_and_flags() & !0x3f00_0000);
    }
}
