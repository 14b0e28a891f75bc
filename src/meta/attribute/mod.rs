
//! Attribute values: one variant per type name of the format,
//! and an opaque variant that preserves attributes of any other type.

mod text;
mod bounds;
mod channels;
mod tiles;
mod time_code;
mod image_info;

pub use self::text::{Text, TextBytes, TextSlice};
pub use self::bounds::{IntegerBounds, FloatRect, Rational, Matrix3x3, Matrix4x4, DoubleMatrix3x3, DoubleMatrix4x4};
pub use self::channels::{SampleType, Channel, ChannelList};
pub use self::tiles::{LineOrder, LevelMode, TileDescription};
pub use self::time_code::TimeCode;
pub use self::image_info::{Chromaticities, EnvironmentMap, KeyCode, Preview};
pub use crate::compression::Compression;

use std::hash::{Hash, Hasher};

use crate::io::*;
use crate::error::*;
use crate::math::Vec2;
use crate::meta::{sequence_end, Version};


/// The type names of all attribute variants, as they appear in a file.
pub mod type_names {
    macro_rules! define_type_names {
        ( $( $name: ident = $value: literal ),* $(,)? ) => {
            $(
                #[allow(missing_docs)]
                pub const $name: &[u8] = $value;
            )*

            /// Every type name that is not decoded as opaque.
            pub const ALL: &[&[u8]] = &[ $( $name ),* ];
        };
    }

    define_type_names! {
        I32BOX2 = b"box2i",
        F32BOX2 = b"box2f",
        CHANNEL_LIST = b"chlist",
        CHROMATICITIES = b"chromaticities",
        COMPRESSION = b"compression",
        F64 = b"double",
        ENVIRONMENT_MAP = b"envmap",
        F32 = b"float",
        I32 = b"int",
        KEY_CODE = b"keycode",
        LINE_ORDER = b"lineOrder",
        F32MATRIX3X3 = b"m33f",
        F64MATRIX3X3 = b"m33d",
        F32MATRIX4X4 = b"m44f",
        F64MATRIX4X4 = b"m44d",
        PREVIEW = b"preview",
        RATIONAL = b"rational",
        TEXT = b"string",
        TEXT_VECTOR = b"stringvector",
        TILES = b"tiledesc",
        TIME_CODE = b"timecode",
        I32VEC2 = b"v2i",
        F32VEC2 = b"v2f",
        F64VEC2 = b"v2d",
        I32VEC3 = b"v3i",
        F32VEC3 = b"v3f",
        F64VEC3 = b"v3d",
    }
}


/// A Rust type that is the payload of exactly one attribute variant.
pub trait TypedValue: Sized {

    /// The type name of the variant.
    const TYPE_NAME: &'static TextSlice;

    /// A copy of the payload, if the value is this variant.
    fn from_value(value: &AttributeValue) -> Option<Self>;

    /// Wrap into the variant.
    fn into_value(self) -> AttributeValue;
}


// the binary codec of one variant payload
trait Payload: Sized {
    fn payload_size(&self) -> usize;
    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult;
    fn read_payload(read: &mut &[u8], size: usize, version: Version) -> Result<Self>;
    fn hash_payload<H: Hasher>(&self, state: &mut H);
}

macro_rules! define_attribute_values {
    ( $(
        $(#[$documentation: meta])*
        $variant: ident ( $payload: ty ) = $type_name: ident, default $default: expr;
    )* ) => {

        /// The value of an attribute. Knows its type name.
        #[derive(Debug, Clone, PartialEq)]
        pub enum AttributeValue {
            $( $(#[$documentation])* $variant($payload), )*

            /// An attribute of a type that this crate does not decode.
            /// Writing it produces the payload bytes that were read.
            Opaque {

                /// The type name from the file.
                kind: Text,

                /// The payload, exactly as stored.
                bytes: Vec<u8>,
            },
        }

        impl AttributeValue {

            /// The type name of this value.
            pub fn kind_name(&self) -> &TextSlice {
                match self {
                    $( AttributeValue::$variant(_) => type_names::$type_name, )*
                    AttributeValue::Opaque { kind, .. } => kind.as_slice(),
                }
            }

            /// The default value of a known type, or `None` for other type names.
            pub fn default_for_type(kind: impl AsRef<[u8]>) -> Option<Self> {
                match kind.as_ref() {
                    $( type_names::$type_name => Some(AttributeValue::$variant($default)), )*
                    _ => None,
                }
            }

            /// Number of payload bytes, without name, type name and size.
            pub fn byte_size(&self) -> usize {
                match self {
                    $( AttributeValue::$variant(value) => value.payload_size(), )*
                    AttributeValue::Opaque { bytes, .. } => bytes.len(),
                }
            }

            /// Write the payload.
            pub fn write<W: Write>(&self, write: &mut W) -> UnitResult {
                match self {
                    $( AttributeValue::$variant(value) => value.write_payload(write), )*
                    AttributeValue::Opaque { bytes, .. } => u8::write_slice(write, bytes),
                }
            }

            fn decode(payload: &mut &[u8], kind: &TextSlice, version: Version) -> Result<Self> {
                let size = payload.len();

                match kind {
                    $( type_names::$type_name => Ok(AttributeValue::$variant(
                        <$payload as Payload>::read_payload(payload, size, version)?
                    )), )*

                    _ => Err(Error::format(format!("cannot decode type `{}`", Text::from_slice_unchecked(kind)))),
                }
            }
        }

        // consistent with equality, floats are hashed by their bits
        impl Hash for AttributeValue {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.kind_name().hash(state);

                match self {
                    $( AttributeValue::$variant(value) => value.hash_payload(state), )*
                    AttributeValue::Opaque { bytes, .. } => bytes.hash(state),
                }
            }
        }

        $(
            impl TypedValue for $payload {
                const TYPE_NAME: &'static TextSlice = type_names::$type_name;

                fn from_value(value: &AttributeValue) -> Option<Self> {
                    match value {
                        AttributeValue::$variant(payload) => Some(payload.clone()),
                        _ => None,
                    }
                }

                fn into_value(self) -> AttributeValue {
                    AttributeValue::$variant(self)
                }
            }

            impl From<$payload> for AttributeValue {
                fn from(payload: $payload) -> Self {
                    AttributeValue::$variant(payload)
                }
            }
        )*
    };
}

const IDENTITY_3X3: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
const IDENTITY_4X4: [f64; 16] = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];

define_attribute_values! {

    /// `box2i`
    IntegerBounds(IntegerBounds) = I32BOX2, default IntegerBounds::zero();

    /// `box2f`
    FloatRect(FloatRect) = F32BOX2, default FloatRect::default();

    /// `chlist`
    ChannelList(ChannelList) = CHANNEL_LIST, default ChannelList::default();

    /// `chromaticities`
    Chromaticities(Chromaticities) = CHROMATICITIES, default Chromaticities::default();

    /// `compression`
    Compression(Compression) = COMPRESSION, default Compression::default();

    /// `double`
    F64(f64) = F64, default 0.0;

    /// `envmap`
    EnvironmentMap(EnvironmentMap) = ENVIRONMENT_MAP, default EnvironmentMap::LatitudeLongitude;

    /// `float`
    F32(f32) = F32, default 0.0;

    /// `int`
    I32(i32) = I32, default 0;

    /// `keycode`
    KeyCode(KeyCode) = KEY_CODE, default KeyCode::default();

    /// `lineOrder`
    LineOrder(LineOrder) = LINE_ORDER, default LineOrder::default();

    /// `m33f`
    Matrix3x3(Matrix3x3) = F32MATRIX3X3, default IDENTITY_3X3.map(|value| value as f32);

    /// `m33d`
    DoubleMatrix3x3(DoubleMatrix3x3) = F64MATRIX3X3, default IDENTITY_3X3;

    /// `m44f`
    Matrix4x4(Matrix4x4) = F32MATRIX4X4, default IDENTITY_4X4.map(|value| value as f32);

    /// `m44d`
    DoubleMatrix4x4(DoubleMatrix4x4) = F64MATRIX4X4, default IDENTITY_4X4;

    /// `preview`
    Preview(Preview) = PREVIEW, default Preview::default();

    /// `rational`
    Rational(Rational) = RATIONAL, default Rational::default();

    /// `string`, without length prefix.
    Text(Text) = TEXT, default Text::default();

    /// `stringvector`
    TextVector(Vec<Text>) = TEXT_VECTOR, default Vec::new();

    /// `tiledesc`
    TileDescription(TileDescription) = TILES, default TileDescription::default();

    /// `timecode`
    TimeCode(TimeCode) = TIME_CODE, default TimeCode::default();

    /// `v2i`
    IntVec2(Vec2<i32>) = I32VEC2, default Vec2(0, 0);

    /// `v2f`
    FloatVec2(Vec2<f32>) = F32VEC2, default Vec2(0.0, 0.0);

    /// `v2d`
    DoubleVec2(Vec2<f64>) = F64VEC2, default Vec2(0.0, 0.0);

    /// `v3i`
    IntVec3((i32, i32, i32)) = I32VEC3, default (0, 0, 0);

    /// `v3f`
    FloatVec3((f32, f32, f32)) = F32VEC3, default (0.0, 0.0, 0.0);

    /// `v3d`
    DoubleVec3((f64, f64, f64)) = F64VEC3, default (0.0, 0.0, 0.0);
}


impl AttributeValue {

    /// Whether both values have the same type name.
    pub fn has_same_kind(&self, other: &AttributeValue) -> bool {
        self.kind_name() == other.kind_name()
    }

    /// A copy of the payload, if this value has the type `T`.
    pub fn to_typed<T: TypedValue>(&self) -> Option<T> {
        T::from_value(self)
    }

    /// Read a payload of `byte_size` bytes and decode it as the named type.
    /// Unknown type names give `AttributeValue::Opaque`.
    /// A payload that is malformed or not consumed completely is `Error::Format`.
    pub fn read(read: &mut impl Read, kind: Text, byte_size: usize, version: Version) -> Result<Self> {
        let bytes = u8::read_vec(read, byte_size, None, "attribute payload")?;

        if !type_names::ALL.contains(&kind.as_slice()) {
            return Ok(AttributeValue::Opaque { kind, bytes });
        }

        let payload = &mut bytes.as_slice();
        let value = Self::decode(payload, kind.as_slice(), version)?;

        if payload.is_empty() { Ok(value) }
        else {
            Err(Error::format(format!(
                "`{}` payload of {} bytes has {} bytes left after decoding",
                kind, byte_size, payload.len()
            )))
        }
    }

    /// Check the constraints that the binary layout cannot express.
    pub fn validate(&self) -> UnitResult {
        match self {
            AttributeValue::TileDescription(tiles) => tiles.validate(),
            AttributeValue::Preview(preview) => preview.validate(),
            _ => Ok(()),
        }
    }
}


/// Whether `AttributeValue::read` decodes this type name instead of keeping it opaque.
/// An empty name is `Error::Invalid`.
pub fn is_known_type(kind: impl AsRef<[u8]>) -> Result<bool> {
    match kind.as_ref() {
        [] => Err(Error::invalid("attribute type name is empty")),
        kind => Ok(type_names::ALL.contains(&kind)),
    }
}

/// Bytes of a whole record: name, type name, size and payload.
pub fn byte_size(name: &TextSlice, value: &AttributeValue) -> usize {
    let terminated = |text: &TextSlice| text.len() + sequence_end::byte_size();
    terminated(name) + terminated(value.kind_name()) + i32::BYTE_SIZE + value.byte_size()
}

/// Write a whole record: name, type name, size and payload.
pub fn write<W: Write>(name: &TextSlice, value: &AttributeValue, write: &mut W) -> UnitResult {
    Text::write_null_terminated_bytes(name, write)?;
    Text::write_null_terminated_bytes(value.kind_name(), write)?;
    usize_to_i32(value.byte_size(), "attribute size")?.write(write)?;
    value.write(write)
}


macro_rules! payload_for_scalar {
    ( $( $scalar: ty => |$value: ident| $hashed: expr ),* ) => { $(
        impl Payload for $scalar {
            fn payload_size(&self) -> usize { <$scalar as Data>::BYTE_SIZE }
            fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { Data::write(*self, write) }
            fn read_payload(read: &mut &[u8], _: usize, _: Version) -> Result<Self> { <$scalar as Data>::read(read) }
            fn hash_payload<H: Hasher>(&self, state: &mut H) { let $value = *self; $hashed.hash(state) }
        }
    )* };
}

payload_for_scalar! {
    i32 => |value| value,
    f32 => |value| value.to_bits(),
    f64 => |value| value.to_bits()
}

macro_rules! payload_for_record {
    ( $( $record: ty ),* ) => { $(
        impl Payload for $record {
            fn payload_size(&self) -> usize { <$record>::byte_size() }
            fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { self.write(write) }
            fn read_payload(read: &mut &[u8], _: usize, _: Version) -> Result<Self> { <$record>::read(read) }
            fn hash_payload<H: Hasher>(&self, state: &mut H) { self.hash(state) }
        }
    )* };
}

payload_for_record!(IntegerBounds, Rational, Compression, EnvironmentMap, KeyCode, LineOrder, TileDescription);

impl Payload for FloatRect {
    fn payload_size(&self) -> usize { FloatRect::byte_size() }
    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { self.write(write) }
    fn read_payload(read: &mut &[u8], _: usize, _: Version) -> Result<Self> { FloatRect::read(read) }

    fn hash_payload<H: Hasher>(&self, state: &mut H) {
        self.min.hash_payload(state);
        self.max.hash_payload(state);
    }
}

impl Payload for Chromaticities {
    fn payload_size(&self) -> usize { Chromaticities::byte_size() }
    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { self.write(write) }
    fn read_payload(read: &mut &[u8], _: usize, _: Version) -> Result<Self> { Chromaticities::read(read) }
    fn hash_payload<H: Hasher>(&self, state: &mut H) { self.hash_bits().hash(state) }
}

impl Payload for TimeCode {
    fn payload_size(&self) -> usize { TimeCode::BYTE_SIZE }
    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { self.write(write) }
    fn read_payload(read: &mut &[u8], _: usize, _: Version) -> Result<Self> { TimeCode::read(read) }
    fn hash_payload<H: Hasher>(&self, state: &mut H) { self.hash(state) }
}

impl Payload for ChannelList {
    fn payload_size(&self) -> usize { self.byte_size() }
    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { self.write(write) }

    fn read_payload(read: &mut &[u8], _: usize, version: Version) -> Result<Self> {
        // the list ends with a null byte that is consumed, so nothing stays peeked
        ChannelList::read(&mut PeekRead::new(read), version.max_name_length())
    }

    fn hash_payload<H: Hasher>(&self, state: &mut H) { self.hash(state) }
}

impl Payload for Preview {
    fn payload_size(&self) -> usize { self.byte_size() }
    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { self.write(write) }
    fn read_payload(read: &mut &[u8], size: usize, _: Version) -> Result<Self> { Preview::read(read, size) }
    fn hash_payload<H: Hasher>(&self, state: &mut H) { self.hash(state) }
}

impl Payload for Text {
    fn payload_size(&self) -> usize { self.len() }
    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { u8::write_slice(write, self.as_slice()) }
    fn read_payload(read: &mut &[u8], size: usize, _: Version) -> Result<Self> { Text::read_sized(read, size) }
    fn hash_payload<H: Hasher>(&self, state: &mut H) { self.hash(state) }
}

impl Payload for Vec<Text> {
    fn payload_size(&self) -> usize { self.iter().map(Text::i32_sized_byte_size).sum() }
    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { Text::write_i32_sized_sequence(write, self) }
    fn read_payload(read: &mut &[u8], size: usize, _: Version) -> Result<Self> { Text::read_i32_sized_sequence(read, size) }
    fn hash_payload<H: Hasher>(&self, state: &mut H) { self.hash(state) }
}

impl<T: Data + Payload + Copy> Payload for Vec2<T> {
    fn payload_size(&self) -> usize { 2 * T::BYTE_SIZE }

    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult {
        self.x().write(write)?;
        self.y().write(write)
    }

    fn read_payload(read: &mut &[u8], _: usize, _: Version) -> Result<Self> {
        Ok(Vec2(T::read(read)?, T::read(read)?))
    }

    fn hash_payload<H: Hasher>(&self, state: &mut H) {
        self.x().hash_payload(state);
        self.y().hash_payload(state);
    }
}

impl<T: Data + Payload + Copy> Payload for (T, T, T) {
    fn payload_size(&self) -> usize { 3 * T::BYTE_SIZE }

    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult {
        T::write_slice(write, &[self.0, self.1, self.2])
    }

    fn read_payload(read: &mut &[u8], _: usize, _: Version) -> Result<Self> {
        Ok((T::read(read)?, T::read(read)?, T::read(read)?))
    }

    fn hash_payload<H: Hasher>(&self, state: &mut H) {
        for value in &[self.0, self.1, self.2] { value.hash_payload(state); }
    }
}

impl<T: Data + Payload + Copy, const N: usize> Payload for [T; N] {
    fn payload_size(&self) -> usize { N * T::BYTE_SIZE }
    fn write_payload<W: Write>(&self, write: &mut W) -> UnitResult { T::write_slice(write, self) }

    fn read_payload(read: &mut &[u8], _: usize, _: Version) -> Result<Self> {
        let mut values = [T::default(); N];
        T::read_slice(read, &mut values)?;
        Ok(values)
    }

    fn hash_payload<H: Hasher>(&self, state: &mut H) {
        for value in self { value.hash_payload(state); }
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn round_trip(value: &AttributeValue) -> AttributeValue {
        let mut bytes = Vec::new();
        value.write(&mut bytes).unwrap();
        assert_eq!(value.byte_size(), bytes.len(), "byte size of {:?}", value);

        let kind = Text::from_slice_unchecked(value.kind_name());
        AttributeValue::read(&mut bytes.as_slice(), kind, bytes.len(), Version::default()).unwrap()
    }

    fn hash(value: &AttributeValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn records_round_trip(){
        let attributes = vec![
            ("greeting", AttributeValue::Text(Text::from("hello"))),
            ("age", AttributeValue::I32(923)),
            ("weight", AttributeValue::F64(9.114939599234)),
            ("area", AttributeValue::FloatRect(FloatRect { min: Vec2(23.4234, 345.23), max: Vec2(68623.0, 3.12425926538) })),
            ("pixels", AttributeValue::IntegerBounds(IntegerBounds::new((23, 345), (68623, 347)))),
            ("inverted", AttributeValue::IntegerBounds(IntegerBounds::new((10, 10), (-10, -10)))),
            ("views", AttributeValue::TextVector(vec![Text::from("left"), Text::from(""), Text::from("a longer view name than usual")])),
            ("thumbnail", AttributeValue::Preview(Preview { size: Vec2(10, 30), pixel_data: vec![31; 10 * 30 * 4] })),
            ("film", AttributeValue::KeyCode(KeyCode { film_roll_prefix: 123_456, count: 17, .. KeyCode::default() })),
            ("depth transform", AttributeValue::DoubleMatrix4x4([0.5; 16])),
            ("position", AttributeValue::DoubleVec3((1.0, -2.0, 3.5))),
            ("frames per second", AttributeValue::Rational(Rational::new(24000, 1001))),
            ("layers", AttributeValue::ChannelList(ChannelList::try_from_iter(vec![
                ("Green", Channel { sample_type: SampleType::F16, quantize_linearly: false, sampling: Vec2(1, 2) }),
                ("Red", Channel { sample_type: SampleType::F32, quantize_linearly: true, sampling: Vec2(1, 2) }),
                ("Purple", Channel::new(SampleType::U32, false)),
            ]).unwrap())),
            ("extension", AttributeValue::Opaque { kind: Text::from("quaternion"), bytes: vec![1, 2, 3, 4, 5, 6, 7, 8] }),
        ];

        for (name, value) in &attributes {
            let mut bytes = Vec::new();
            write(name.as_bytes(), value, &mut bytes).unwrap();
            assert_eq!(byte_size(name.as_bytes(), value), bytes.len(), "record size of {}", name);

            assert_eq!(&round_trip(value), value, "round trip of {}", name);
        }
    }

    #[test]
    fn payload_must_be_consumed_exactly(){
        let bytes = [1_u8, 0, 0, 0, 9];
        let result = AttributeValue::read(&mut &bytes[..], Text::from("int"), 5, Version::default());
        assert!(matches!(result, Err(Error::Format(_))), "{:?}", result);

        let truncated = [1_u8, 0];
        let result = AttributeValue::read(&mut &truncated[..], Text::from("int"), 4, Version::default());
        assert!(matches!(result, Err(Error::Format(_))), "{:?}", result);

        let short_vector = [1_u8, 0, 0, 0, 9, 9];
        let result = AttributeValue::read(&mut &short_vector[..], Text::from("v2i"), 6, Version::default());
        assert!(matches!(result, Err(Error::Format(_))), "{:?}", result);
    }

    #[test]
    fn unknown_types_are_opaque(){
        let bytes = [9_u8, 8, 7];
        let value = AttributeValue::read(&mut &bytes[..], Text::from("mystery"), 3, Version::default()).unwrap();
        assert_eq!(value, AttributeValue::Opaque { kind: Text::from("mystery"), bytes: bytes.to_vec() });
        assert_eq!(value.kind_name(), b"mystery");
        assert_eq!(value.byte_size(), 3);
    }

    #[test]
    fn factory(){
        for &kind in type_names::ALL {
            assert!(is_known_type(kind).unwrap());

            let default = AttributeValue::default_for_type(kind).unwrap();
            assert_eq!(default.kind_name(), kind);
            assert_eq!(round_trip(&default), default);
        }

        assert_eq!(type_names::ALL.len(), 27);
        assert!(!is_known_type("quaternion").unwrap());
        assert!(AttributeValue::default_for_type("quaternion").is_none());
        assert!(matches!(is_known_type(""), Err(Error::Invalid(_))));

        assert_eq!(
            AttributeValue::default_for_type("m33f"),
            Some(AttributeValue::Matrix3x3([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]))
        );
    }

    #[test]
    fn typed_values(){
        let value: AttributeValue = 3.5_f32.into();
        assert_eq!(value.to_typed::<f32>(), Some(3.5));
        assert_eq!(value.to_typed::<f64>(), None);
        assert_eq!(<f32 as TypedValue>::TYPE_NAME, value.kind_name());

        let value: AttributeValue = Vec2(1.0_f64, 2.0).into();
        assert_eq!(value.kind_name(), b"v2d");
        assert!(value.has_same_kind(&AttributeValue::DoubleVec2(Vec2(0.0, 0.0))));
        assert!(!value.has_same_kind(&AttributeValue::FloatVec2(Vec2(0.0, 0.0))));
    }

    #[test]
    fn hash_is_consistent_with_equality(){
        let value = AttributeValue::FloatVec3((1.0, 2.0, 3.0));
        assert_eq!(hash(&value), hash(&value.clone()));
        assert_ne!(hash(&value), hash(&AttributeValue::FloatVec3((1.0, 2.0, 3.5))));
        assert_ne!(hash(&AttributeValue::I32(1)), hash(&AttributeValue::F32(1.0)));

        let chromaticities = AttributeValue::Chromaticities(Chromaticities::default());
        assert_eq!(hash(&chromaticities), hash(&AttributeValue::Chromaticities(Chromaticities::default())));
    }

    #[test]
    fn validation_of_constrained_values(){
        assert!(AttributeValue::TimeCode(TimeCode::from_raw(0x3f7f_7f3f, u32::MAX)).validate().is_ok());
        assert!(AttributeValue::Preview(Preview { size: Vec2(1, 1), pixel_data: vec![] }).validate().is_err());
        assert!(AttributeValue::I32(-5).validate().is_ok());
    }
}
