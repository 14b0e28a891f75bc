
//! The bytes in front of the pixel data of an exr file:
//! the magic number, the version word, and the header attributes.

pub mod attribute;
pub mod header;
pub mod standard;

use crate::io::*;
use crate::error::*;
use crate::meta::header::Header;
use bit_field::BitField;


/// The version word, which follows the magic number.
/// The low byte holds the format version, the remaining bits are feature flags.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct Version {

    /// Must be `2`.
    pub format_version: u8,

    /// Bit 9. The image is a single tiled part.
    pub is_single_layer_and_tiled: bool,

    /// Bit 10. Names may be up to 255 bytes long instead of 31.
    pub has_long_names: bool,

    /// Bit 11. Some part contains deep samples.
    pub has_deep_data: bool,

    /// Bit 12. The file contains several parts.
    pub has_multiple_layers: bool,
}


/// Identifies exr files.
pub mod magic_number {
    use super::*;

    /// The integer `20000630`, little-endian.
    pub const BYTES: [u8; 4] = [0x76, 0x2f, 0x31, 0x01];

    /// Write the four magic bytes.
    pub fn write(write: &mut impl Write) -> UnitResult {
        u8::write_slice(write, &BYTES)
    }

    /// Consume four bytes and compare them to the magic bytes.
    pub fn is_exr(read: &mut impl Read) -> Result<bool> {
        let mut bytes = [0_u8; 4];
        u8::read_slice(read, &mut bytes)?;
        Ok(bytes == BYTES)
    }

    /// Consume four bytes. Returns `Error::Format` unless they are the magic bytes.
    pub fn validate_exr(read: &mut impl Read) -> UnitResult {
        if is_exr(read)? { Ok(()) }
        else { Err(Error::format("missing exr magic number")) }
    }
}

/// The null byte that terminates names and record sequences.
pub mod sequence_end {
    use super::*;

    /// Always one byte.
    pub fn byte_size() -> usize {
        u8::BYTE_SIZE
    }

    /// Write the null byte.
    pub fn write<W: Write>(write: &mut W) -> UnitResult {
        0_u8.write(write)
    }

    /// Consume the next byte if it is null, and return whether it was.
    pub fn has_come(read: &mut PeekRead<impl Read>) -> Result<bool> {
        Ok(read.skip_if_eq(0)?)
    }
}


impl Version {

    /// The only format version that can be read or written.
    pub const SUPPORTED_FORMAT_VERSION: u8 = 2;

    /// Longest name without `has_long_names`.
    pub const SHORT_NAME_LENGTH: usize = 31;

    /// Longest name with `has_long_names`.
    pub const LONG_NAME_LENGTH: usize = 255;

    const TILED_BIT: usize = 9;
    const LONG_NAMES_BIT: usize = 10;
    const DEEP_DATA_BIT: usize = 11;
    const MULTIPLE_LAYERS_BIT: usize = 12;

    /// The flag bits 9 to 12.
    pub const KNOWN_FLAGS: u32 = 0x1e00;

    const FLAG_MASK: u32 = 0xffff_ff00;

    /// A version word without deep data or multiple parts.
    pub fn new(is_tiled: bool, has_long_names: bool) -> Self {
        Version {
            format_version: Self::SUPPORTED_FORMAT_VERSION,
            is_single_layer_and_tiled: is_tiled,
            has_long_names,
            has_deep_data: false,
            has_multiple_layers: false,
        }
    }

    /// The version word for writing this header.
    /// Long names are flagged only if some name needs them.
    pub fn infer(header: &Header, is_tiled: bool) -> Self {
        Self::new(is_tiled, header.has_long_names())
    }

    /// 255 with long names, 31 otherwise.
    pub fn max_name_length(&self) -> usize {
        if self.has_long_names { Self::LONG_NAME_LENGTH } else { Self::SHORT_NAME_LENGTH }
    }

    /// Whether the word sets no flag outside of bits 9 to 12.
    pub fn supports_flags(word: u32) -> bool {
        word & Self::FLAG_MASK & !Self::KNOWN_FLAGS == 0
    }

    /// Read and validate a version word.
    /// Unknown flags and versions other than 2 are `Error::NotSupported`.
    pub fn read<R: Read>(read: &mut R) -> Result<Self> {
        let word = u32::read(read)?;

        if !Self::supports_flags(word) {
            return Err(Error::unsupported(format!(
                "unknown feature flags {:#010x}", word & Self::FLAG_MASK & !Self::KNOWN_FLAGS
            )));
        }

        let version = Version {
            format_version: word.get_bits(0 .. 8) as u8,
            is_single_layer_and_tiled: word.get_bit(Self::TILED_BIT),
            has_long_names: word.get_bit(Self::LONG_NAMES_BIT),
            has_deep_data: word.get_bit(Self::DEEP_DATA_BIT),
            has_multiple_layers: word.get_bit(Self::MULTIPLE_LAYERS_BIT),
        };

        version.validate()?;
        Ok(version)
    }

    /// Write the version word without validating it.
    pub fn write<W: Write>(self, write: &mut W) -> UnitResult {
        let mut word = 0_u32;

        word.set_bits(0 .. 8, self.format_version as u32)
            .set_bit(Self::TILED_BIT, self.is_single_layer_and_tiled)
            .set_bit(Self::LONG_NAMES_BIT, self.has_long_names)
            .set_bit(Self::DEEP_DATA_BIT, self.has_deep_data)
            .set_bit(Self::MULTIPLE_LAYERS_BIT, self.has_multiple_layers);

        word.write(write)
    }

    /// Fails for format versions other than 2 and for tiled images that claim deep data or several parts.
    pub fn validate(&self) -> UnitResult {
        if self.format_version != Self::SUPPORTED_FORMAT_VERSION {
            return Err(Error::unsupported(format!(
                "format version {}, expected {}", self.format_version, Self::SUPPORTED_FORMAT_VERSION
            )));
        }

        if self.is_single_layer_and_tiled && (self.has_deep_data || self.has_multiple_layers) {
            return Err(Error::invalid("the single tiled part flag excludes deep data and multiple parts"));
        }

        Ok(())
    }
}

impl Default for Version {
    fn default() -> Self { Self::new(false, false) }
}
