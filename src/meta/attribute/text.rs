
//! Latin-1 byte strings, used for names and string attributes.

use smallvec::SmallVec;
use std::borrow::Borrow;
use std::convert::TryFrom;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::io::*;
use crate::error::*;
use crate::meta::sequence_end;


/// Storage of a `Text`. Most names are short enough to avoid the heap.
pub type TextBytes = SmallVec<[u8; 24]>;

/// A borrowed `Text`.
pub type TextSlice = [u8];


/// A string where every byte is one latin-1 character.
/// Ordered and hashed exactly like its bytes, so maps keyed by `Text`
/// can be queried with plain byte slices.
#[derive(Clone, PartialEq, Eq, Ord, PartialOrd, Default)]
pub struct Text {
    bytes: TextBytes,
}

impl Text {

    /// Convert a string, or return `None` if a character is above `U+00FF`.
    pub fn new_or_none(string: impl AsRef<str>) -> Option<Self> {
        string.as_ref().chars()
            .map(|character| u8::try_from(u32::from(character)).ok())
            .collect::<Option<TextBytes>>()
            .map(Self::from_bytes_unchecked)
    }

    /// Convert a string. Panics if a character is above `U+00FF`.
    pub fn new_or_panic(string: impl AsRef<str>) -> Self {
        let string = string.as_ref();

        Self::new_or_none(string).unwrap_or_else(||
            panic!("`{}` cannot be represented as latin-1 text", string)
        )
    }

    /// Copy the bytes as they are.
    pub fn from_slice_unchecked(bytes: &TextSlice) -> Self {
        Text { bytes: TextBytes::from_slice(bytes) }
    }

    /// Take the bytes as they are.
    pub fn from_bytes_unchecked(bytes: TextBytes) -> Self {
        Text { bytes }
    }

    /// The bytes of this text.
    pub fn as_slice(&self) -> &TextSlice {
        &self.bytes
    }

    /// Same as `as_slice`.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes, without terminator.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the text has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The characters of this text.
    pub fn chars(&self) -> impl '_ + Iterator<Item = char> {
        self.bytes.iter().copied().map(char::from)
    }

    /// Compare with a string, ignoring ascii case.
    pub fn eq_case_insensitive(&self, string: &str) -> bool {
        self.chars().map(|character| character.to_ascii_lowercase())
            .eq(string.chars().map(|character| character.to_ascii_lowercase()))
    }

    /// Fails with `Error::Invalid` if this text is empty or longer than `max_len` bytes.
    /// `purpose` names the text in the message, for example `"channel name"`.
    pub fn validate_name(&self, max_len: usize, purpose: &str) -> UnitResult {
        Self::validate_name_bytes(&self.bytes, max_len, purpose)
    }

    /// Same as `validate_name`, for a byte slice.
    pub fn validate_name_bytes(name: &TextSlice, max_len: usize, purpose: &str) -> UnitResult {
        if name.is_empty() {
            Err(Error::invalid(format!("{} is empty", purpose)))
        }
        else if name.len() > max_len {
            Err(Error::invalid(format!(
                "{} `{}` has {} bytes, but at most {} are allowed",
                purpose, Text::from_slice_unchecked(name), name.len(), max_len
            )))
        }
        else {
            Ok(())
        }
    }


    /// Bytes of the null-terminated encoding.
    pub fn null_terminated_byte_size(&self) -> usize {
        self.len() + sequence_end::byte_size()
    }

    /// Bytes of the length-prefixed encoding.
    pub fn i32_sized_byte_size(&self) -> usize {
        i32::BYTE_SIZE + self.len()
    }

    /// Write the bytes, then a null byte.
    /// Fails with `Error::Invalid` for empty texts and texts containing null.
    pub fn write_null_terminated<W: Write>(&self, write: &mut W) -> UnitResult {
        Self::write_null_terminated_bytes(&self.bytes, write)
    }

    pub(crate) fn write_null_terminated_bytes<W: Write>(bytes: &TextSlice, write: &mut W) -> UnitResult {
        // an empty name would end the enclosing sequence
        if bytes.is_empty() {
            return Err(Error::invalid("null-terminated text is empty"));
        }

        if bytes.contains(&0) {
            return Err(Error::invalid(format!(
                "null-terminated text `{}` contains a null byte", Text::from_slice_unchecked(bytes)
            )));
        }

        u8::write_slice(write, bytes)?;
        sequence_end::write(write)
    }

    /// Read bytes up to and including the next null byte.
    /// An immediate null byte gives an empty text.
    /// Fails with `Error::Format` after `max_len` bytes without terminator.
    pub fn read_null_terminated<R: Read>(read: &mut R, max_len: usize) -> Result<Self> {
        let mut bytes = TextBytes::new();

        loop {
            let byte = u8::read(read)?;
            if byte == 0 { return Ok(Text { bytes }); }

            if bytes.len() == max_len {
                return Err(Error::format(format!(
                    "name `{}...` exceeds {} bytes", Text { bytes }, max_len
                )));
            }

            bytes.push(byte);
        }
    }

    /// Write an `i32` length, then the bytes.
    pub fn write_i32_sized<W: Write>(&self, write: &mut W) -> UnitResult {
        u8::write_i32_sized_slice(write, &self.bytes)
    }

    /// Read an `i32` length, then that many bytes.
    /// Fails with `Error::Format` if the length exceeds `max_size`.
    pub fn read_i32_sized<R: Read>(read: &mut R, max_size: usize) -> Result<Self> {
        let bytes = u8::read_i32_sized_vec(read, Some(max_size), "string vector entry")?;
        Ok(Text::from_bytes_unchecked(TextBytes::from_vec(bytes)))
    }

    /// Read exactly `size` bytes.
    pub fn read_sized<R: Read>(read: &mut R, size: usize) -> Result<Self> {
        let mut bytes = TextBytes::new();

        if size <= bytes.inline_size() {
            bytes.resize(size, 0);
            u8::read_slice(read, &mut bytes)?;
        }
        else {
            bytes = TextBytes::from_vec(u8::read_vec(read, size, None, "string")?);
        }

        Ok(Text { bytes })
    }

    /// Read length-prefixed texts until `total_byte_size` bytes are consumed.
    /// Fails with `Error::Format` if the last entry would cross that limit.
    pub(crate) fn read_i32_sized_sequence(read: &mut impl Read, total_byte_size: usize) -> Result<Vec<Text>> {
        let mut texts = Vec::new();
        let mut remaining = total_byte_size;

        while remaining > 0 {
            if remaining < i32::BYTE_SIZE {
                return Err(Error::format(format!(
                    "string vector has {} trailing bytes, too few for a length", remaining
                )));
            }

            let text = Text::read_i32_sized(read, remaining - i32::BYTE_SIZE)?;
            remaining -= text.i32_sized_byte_size();
            texts.push(text);
        }

        Ok(texts)
    }

    /// Write every text with its length. The count is implied by the record size.
    pub(crate) fn write_i32_sized_sequence<W: Write>(write: &mut W, texts: &[Text]) -> UnitResult {
        texts.iter().try_for_each(|text| text.write_i32_sized(write))
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.chars().eq(other.chars())
    }
}

impl PartialEq<Text> for str {
    fn eq(&self, other: &Text) -> bool {
        other == self
    }
}

impl Borrow<TextSlice> for Text {
    fn borrow(&self) -> &TextSlice {
        &self.bytes
    }
}

impl AsRef<[u8]> for Text {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

// must equal the hash of the borrowed slice
impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<'s> From<&'s str> for Text {

    /// Panics if a character is above `U+00FF`.
    fn from(string: &'s str) -> Self {
        Self::new_or_panic(string)
    }
}

impl From<Text> for String {
    fn from(text: Text) -> Self {
        text.chars().collect()
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Text({:?})", self.to_string())
    }
}

impl fmt::Display for Text {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars().try_for_each(|character| fmt::Write::write_char(formatter, character))
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ordering_matches_strings() {
        for _ in 0 .. 1024 {
            let left = Text::from_bytes_unchecked((0 .. 4).map(|_| rand::random::<u8>() % 128).collect());
            let right = Text::from_bytes_unchecked((0 .. 4).map(|_| rand::random::<u8>() % 128).collect());

            assert_eq!(left.to_string().cmp(&right.to_string()), left.cmp(&right), "{:?} vs {:?}", left, right);
        }
    }

    #[test]
    fn latin1_conversion(){
        assert_eq!(Text::new_or_none("größe").unwrap().len(), 5);
        assert!(Text::new_or_none("\u{0100}").is_none());
        assert_eq!(String::from(Text::from("Grün")), "Grün");
        assert!(Text::from("Alpha").eq_case_insensitive("ALPHA"));
        assert!(!Text::from("Alpha").eq_case_insensitive("ALPHAS"));
        assert!(Text::from("R") == *"R");
    }

    #[test]
    fn null_terminated_text(){
        let bytes: &[u8] = b"R\0Green\0\0";
        let read = &mut &bytes[..];

        assert_eq!(Text::read_null_terminated(read, 31).unwrap(), Text::from("R"));
        assert_eq!(Text::read_null_terminated(read, 31).unwrap(), Text::from("Green"));
        assert!(Text::read_null_terminated(read, 31).unwrap().is_empty());

        let exact: &[u8] = b"Blue\0";
        assert_eq!(Text::read_null_terminated(&mut &exact[..], 4).unwrap(), Text::from("Blue"));

        let too_long: &[u8] = b"RedGreenBlue\0";
        assert!(matches!(Text::read_null_terminated(&mut &too_long[..], 4), Err(Error::Format(_))));

        let unterminated: &[u8] = b"Red";
        assert!(matches!(Text::read_null_terminated(&mut &unterminated[..], 31), Err(Error::Format(_))));

        assert!(Text::default().write_null_terminated(&mut Vec::new()).is_err());
        assert!(Text::from_slice_unchecked(b"a\0b").write_null_terminated(&mut Vec::new()).is_err());
    }

    #[test]
    fn name_validation(){
        assert!(Text::from("R").validate_name(31, "channel name").is_ok());
        assert!(matches!(Text::from("").validate_name(31, "channel name"), Err(Error::Invalid(_))));
        assert!(Text::from("x".repeat(32).as_str()).validate_name(31, "attribute name").is_err());
        assert!(Text::from("x".repeat(32).as_str()).validate_name(255, "attribute name").is_ok());
    }

    #[test]
    fn sized_texts(){
        let long = "long enough to spill onto the heap";
        assert_eq!(Text::read_sized(&mut long.as_bytes(), long.len()).unwrap(), Text::from(long));
        assert_eq!(Text::read_sized(&mut &b"RGBA"[..], 3).unwrap(), Text::from("RGB"));

        let texts = vec![Text::from("left"), Text::default(), Text::from("right")];
        let mut bytes = Vec::new();
        Text::write_i32_sized_sequence(&mut bytes, &texts).unwrap();
        assert_eq!(bytes.len(), texts.iter().map(Text::i32_sized_byte_size).sum::<usize>());
        assert_eq!(Text::read_i32_sized_sequence(&mut bytes.as_slice(), bytes.len()).unwrap(), texts);

        // the last entry claims more bytes than the record has
        assert!(matches!(Text::read_i32_sized_sequence(&mut bytes.as_slice(), bytes.len() - 1), Err(Error::Format(_))));
        assert!(matches!(Text::read_i32_sized_sequence(&mut &[1_u8, 0][..], 2), Err(Error::Format(_))));
    }
}
