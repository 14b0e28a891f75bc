
//! Little-endian binary input and output for header values.
//! All failures are reported as crate errors, truncated input becomes `Error::Format`.

pub use ::std::io::{Read, Write};
use lebe::prelude::*;
use crate::error::{Error, Result, UnitResult, IoResult};


/// Vectors read from untrusted input grow by at most this many bytes at once,
/// so a corrupt length field cannot exhaust memory before the input runs out.
pub const ALLOCATION_CHUNK_BYTES: usize = 1024 * 1024;


/// A reader that can look at the next byte before consuming it.
/// Used to detect the null byte that ends a sequence of records.
#[derive(Debug)]
pub struct PeekRead<T> {
    inner: T,
    peeked: Option<u8>,
}

impl<T: Read> PeekRead<T> {

    /// Wrap a reader. Nothing is read yet.
    pub fn new(inner: T) -> Self {
        PeekRead { inner, peeked: None }
    }

    /// The next byte, which stays available for the next read.
    pub fn peek_u8(&mut self) -> IoResult<u8> {
        if let Some(byte) = self.peeked {
            return Ok(byte);
        }

        let mut byte = [0_u8];
        self.inner.read_exact(&mut byte)?;
        self.peeked = Some(byte[0]);
        Ok(byte[0])
    }

    /// Consume the next byte only if it equals `value`, and return whether it did.
    pub fn skip_if_eq(&mut self, value: u8) -> IoResult<bool> {
        let matches = self.peek_u8()? == value;
        if matches { self.peeked = None; }
        Ok(matches)
    }

    /// The wrapped reader. A peeked byte has already been taken out of it.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Read> Read for PeekRead<T> {
    fn read(&mut self, buffer: &mut [u8]) -> IoResult<usize> {
        match (self.peeked, buffer.split_first_mut()) {
            (_, None) => Ok(0),
            (None, Some(_)) => self.inner.read(buffer),

            (Some(byte), Some((first, rest))) => {
                *first = byte;
                self.peeked = None;
                Ok(1 + self.inner.read(rest)?)
            }
        }
    }
}


/// Counts the bytes that pass through a reader or writer.
#[derive(Debug)]
pub struct Tracking<T> {
    inner: T,
    position: usize,
}

impl<T> Tracking<T> {

    /// Start counting at zero.
    pub fn new(inner: T) -> Self {
        Tracking { inner, position: 0 }
    }

    /// Number of bytes read or written so far.
    pub fn byte_position(&self) -> usize {
        self.position
    }
}

impl<T: Read> Read for Tracking<T> {
    fn read(&mut self, buffer: &mut [u8]) -> IoResult<usize> {
        let count = self.inner.read(buffer)?;
        self.position += count;
        Ok(count)
    }
}

impl<T: Write> Write for Tracking<T> {
    fn write(&mut self, buffer: &[u8]) -> IoResult<usize> {
        let count = self.inner.write(buffer)?;
        self.position += count;
        Ok(count)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.inner.flush()
    }
}


/// A primitive value with a fixed little-endian representation.
pub trait Data: Sized + Default + Clone {

    /// Number of bytes of one value.
    const BYTE_SIZE: usize = ::std::mem::size_of::<Self>();

    /// Read one value.
    fn read(read: &mut impl Read) -> Result<Self>;

    /// Fill the whole slice with values from the reader.
    fn read_slice(read: &mut impl Read, slice: &mut [Self]) -> UnitResult;

    /// Write one value.
    fn write(self, write: &mut impl Write) -> UnitResult;

    /// Write all values of the slice.
    fn write_slice(write: &mut impl Write, slice: &[Self]) -> UnitResult;

    /// Read `count` values. Fails with `Error::Format` if `count` exceeds `max`,
    /// or if the reader ends early.
    /// Memory is reserved chunk by chunk, as the values arrive.
    fn read_vec(read: &mut impl Read, count: usize, max: Option<usize>, purpose: &'static str) -> Result<Vec<Self>> {
        if max.map_or(false, |max| count > max) {
            return Err(Error::format(format!("{} of {} exceeds the remaining payload", purpose, count)));
        }

        let chunk = (ALLOCATION_CHUNK_BYTES / Self::BYTE_SIZE.max(1)).max(1);
        let mut values = Vec::with_capacity(count.min(chunk));

        while values.len() < count {
            let start = values.len();
            let end = count.min(start + chunk);

            values.resize(end, Self::default());
            Self::read_slice(read, &mut values[start .. end])?;
        }

        Ok(values)
    }

    /// Write an `i32` element count followed by the elements.
    fn write_i32_sized_slice(write: &mut impl Write, slice: &[Self]) -> UnitResult {
        crate::error::usize_to_i32(slice.len(), "element count")?.write(write)?;
        Self::write_slice(write, slice)
    }

    /// Read an `i32` element count followed by that many elements.
    /// Negative counts are `Error::Format`.
    fn read_i32_sized_vec(read: &mut impl Read, max: Option<usize>, purpose: &'static str) -> Result<Vec<Self>> {
        let count = i32::read(read)?;

        if count < 0 {
            return Err(Error::format(format!("{} {} is negative", purpose, count)));
        }

        Self::read_vec(read, count as usize, max, purpose)
    }
}

macro_rules! little_endian_data {
    ( $( $primitive: ty ),* ) => { $(
        impl Data for $primitive {
            fn read(read: &mut impl Read) -> Result<Self> {
                Ok(read.read_from_little_endian()?)
            }

            fn read_slice(read: &mut impl Read, slice: &mut [Self]) -> UnitResult {
                read.read_from_little_endian_into(slice)?;
                Ok(())
            }

            fn write(self, write: &mut impl Write) -> UnitResult {
                write.write_as_little_endian(&self)?;
                Ok(())
            }

            fn write_slice(write: &mut impl Write, slice: &[Self]) -> UnitResult {
                write.write_as_little_endian(slice)?;
                Ok(())
            }
        }
    )* };
}

little_endian_data!(u8, i8, u16, u32, i32, f32, f64);


/// Implements the codec of an enum that is stored as a single integer.
/// Generates `code`, `from_code`, `byte_size`, `write` and `read`.
/// `$unknown` constructs the error for codes without a variant.
macro_rules! coded_enum {
    (
        $type: ident as $code: ty, $purpose: expr, $unknown: expr;
        $( $variant: ident = $value: literal ),* $(,)?
    ) => {
        impl $type {

            /// The integer that represents this value in a file.
            pub fn code(self) -> $code {
                match self { $( $type::$variant => $value, )* }
            }

            /// The value that the integer represents, if any.
            pub fn from_code(code: $code) -> Option<Self> {
                match code {
                    $( $value => Some($type::$variant), )*
                    _ => None,
                }
            }

            /// Number of bytes this would consume in an exr file.
            pub fn byte_size() -> usize {
                <$code as $crate::io::Data>::BYTE_SIZE
            }

            /// Write the code of this value.
            pub fn write<W: $crate::io::Write>(self, write: &mut W) -> $crate::error::UnitResult {
                $crate::io::Data::write(self.code(), write)
            }

            /// Read a code and return its value.
            pub fn read<R: $crate::io::Read>(read: &mut R) -> $crate::error::Result<Self> {
                let code = <$code as $crate::io::Data>::read(read)?;

                Self::from_code(code).ok_or_else(||
                    ($unknown)(format!("unknown {} code {}", $purpose, code))
                )
            }
        }
    };
}
