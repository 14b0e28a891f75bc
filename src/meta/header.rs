
//! Contains the header of an exr image: eight required attributes
//! and any number of additional attributes, each stored under a unique name.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::convert::TryFrom;

use crate::io::*;
use crate::error::*;
use crate::math::Vec2;
use crate::meta::{magic_number, sequence_end, Version};
use crate::meta::attribute::{
    self, AttributeValue, ChannelList, Compression, IntegerBounds, LineOrder,
    Text, TextSlice, TileDescription, TypedValue, type_names,
};


/// The names of the attributes that every header contains.
pub mod required_attribute_names {
    macro_rules! define_required_attribute_names {
        ( $($name: ident : $value: expr),* ) => {
            $(
                /// The byte-string name of this required attribute.
                pub const $name: &'static [u8] = $value;
            )*

            /// All required attribute names, in ascending byte order.
            pub const ALL: &'static [&'static [u8]] = &[ $( $name ),* ];
        };
    }

    define_required_attribute_names! {
        CHANNELS:       b"channels",
        COMPRESSION:    b"compression",
        DATA_WINDOW:    b"dataWindow",
        DISPLAY_WINDOW: b"displayWindow",
        LINE_ORDER:     b"lineOrder",
        PIXEL_ASPECT:   b"pixelAspectRatio",
        WINDOW_CENTER:  b"screenWindowCenter",
        WINDOW_WIDTH:   b"screenWindowWidth"
    }
}

/// The name of the tile description attribute, which tiled images require.
pub const TILES: &[u8] = b"tiles";

use self::required_attribute_names as required;


/// Describes a single exr image.
/// The required attributes are plain fields and can never be removed.
/// All other attributes are kept in a map that is sorted by name.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {

    /// The rectangle that positions this image within the infinite 2D space.
    pub display_window: IntegerBounds,

    /// The rectangle of pixels that are actually stored.
    pub data_window: IntegerBounds,

    /// Aspect ratio of each pixel in this image.
    pub pixel_aspect: f32,

    /// Part of the perspective projection. Default should be `(0, 0)`.
    pub screen_window_center: Vec2<f32>,

    /// Part of the perspective projection. Default should be `1`.
    pub screen_window_width: f32,

    /// In what order the pixel blocks are stored.
    pub line_order: LineOrder,

    /// How the pixel blocks are compressed.
    pub compression: Compression,

    /// Describes the channels of the pixels.
    pub channels: ChannelList,

    /// All other attributes, including attributes of unknown type.
    custom: BTreeMap<Text, AttributeValue>,
}


impl Header {

    /// Create a header for an image with the specified dimensions,
    /// with both windows covering `(0,0)` to `(width-1, height-1)` and no channels.
    pub fn new(dimensions: impl Into<Vec2<usize>>) -> Self {
        let window = IntegerBounds::from_dimensions(dimensions);

        Header {
            display_window: window,
            data_window: window,
            pixel_aspect: 1.0,
            screen_window_center: Vec2(0.0, 0.0),
            screen_window_width: 1.0,
            line_order: LineOrder::Increasing,
            compression: Compression::ZIP16,
            channels: ChannelList::new(),
            custom: BTreeMap::new(),
        }
    }

    /// Whether this name belongs to one of the eight attributes that every header contains.
    pub fn is_predefined_name(name: impl AsRef<[u8]>) -> bool {
        Self::predefined_kind(name.as_ref()).is_some()
    }

    fn predefined_kind(name: &TextSlice) -> Option<&'static TextSlice> {
        Some(match name {
            required::CHANNELS => type_names::CHANNEL_LIST,
            required::COMPRESSION => type_names::COMPRESSION,
            required::DATA_WINDOW => type_names::I32BOX2,
            required::DISPLAY_WINDOW => type_names::I32BOX2,
            required::LINE_ORDER => type_names::LINE_ORDER,
            required::PIXEL_ASPECT => type_names::F32,
            required::WINDOW_CENTER => type_names::F32VEC2,
            required::WINDOW_WIDTH => type_names::F32,
            _ => return None,
        })
    }

    fn predefined_value(&self, name: &TextSlice) -> Option<AttributeValue> {
        use self::AttributeValue as Value;

        Some(match name {
            required::CHANNELS => Value::ChannelList(self.channels.clone()),
            required::COMPRESSION => Value::Compression(self.compression),
            required::DATA_WINDOW => Value::IntegerBounds(self.data_window),
            required::DISPLAY_WINDOW => Value::IntegerBounds(self.display_window),
            required::LINE_ORDER => Value::LineOrder(self.line_order),
            required::PIXEL_ASPECT => Value::F32(self.pixel_aspect),
            required::WINDOW_CENTER => Value::FloatVec2(self.screen_window_center),
            required::WINDOW_WIDTH => Value::F32(self.screen_window_width),
            _ => return None,
        })
    }

    // the caller has already checked that the value has the type of the predefined name
    fn assign_predefined(&mut self, name: &TextSlice, value: AttributeValue) {
        use self::AttributeValue as Value;

        match (name, value) {
            (required::CHANNELS, Value::ChannelList(value)) => self.channels = value,
            (required::COMPRESSION, Value::Compression(value)) => self.compression = value,
            (required::DATA_WINDOW, Value::IntegerBounds(value)) => self.data_window = value,
            (required::DISPLAY_WINDOW, Value::IntegerBounds(value)) => self.display_window = value,
            (required::LINE_ORDER, Value::LineOrder(value)) => self.line_order = value,
            (required::PIXEL_ASPECT, Value::F32(value)) => self.pixel_aspect = value,
            (required::WINDOW_CENTER, Value::FloatVec2(value)) => self.screen_window_center = value,
            (required::WINDOW_WIDTH, Value::F32(value)) => self.screen_window_width = value,
            _ => {},
        }
    }

    /// Insert a copy of the value under the specified name.
    /// If an attribute of that name exists, it must have the same type, and its value is replaced.
    /// Returns `Error::Type` if the types differ, leaving the existing value unmodified.
    /// Returns `Error::Invalid` if the name is empty or longer than 255 bytes,
    /// or if an opaque value has the name of a known type.
    pub fn insert(&mut self, name: impl Into<Text>, value: impl Into<AttributeValue>) -> UnitResult {
        let name = name.into();
        let value = value.into();

        name.validate_name(Version::LONG_NAME_LENGTH, "attribute name")?;
        Text::validate_name_bytes(value.kind_name(), Version::LONG_NAME_LENGTH, "attribute type name")?;

        // reading would decode the bytes, so the value would not survive a round trip
        if let AttributeValue::Opaque { kind, .. } = &value {
            if attribute::is_known_type(kind)? {
                return Err(Error::invalid(format!(
                    "attribute `{}` has the known type `{}` and must not be opaque", name, kind
                )));
            }
        }

        if let Some(kind) = Self::predefined_kind(name.as_slice()) {
            if kind != value.kind_name() {
                return Err(mismatch(&name, kind, value.kind_name()));
            }

            self.assign_predefined(name.as_slice(), value);
            return Ok(());
        }

        if let Some(existing) = self.custom.get_mut(name.as_slice()) {
            if !existing.has_same_kind(&value) {
                return Err(mismatch(&name, existing.kind_name(), value.kind_name()));
            }

            *existing = value;
            return Ok(());
        }

        self.custom.insert(name, value);
        Ok(())
    }

    /// Remove an attribute. Does nothing if no attribute with this name exists.
    /// Returns `Error::Invalid` for the name of a required attribute.
    pub fn erase(&mut self, name: impl AsRef<[u8]>) -> UnitResult {
        let name = name.as_ref();

        if Self::is_predefined_name(name) {
            return Err(Error::invalid(format!(
                "the required attribute `{}` cannot be erased", Text::from_slice_unchecked(name)
            )));
        }

        self.custom.remove(name);
        Ok(())
    }

    /// The attribute with this name, if any.
    /// Required attributes are returned by value.
    pub fn find(&self, name: impl AsRef<[u8]>) -> Option<Cow<'_, AttributeValue>> {
        let name = name.as_ref();

        self.predefined_value(name).map(Cow::Owned)
            .or_else(|| self.custom.get(name).map(Cow::Borrowed))
    }

    /// The attribute with this name.
    /// Returns `Error::Invalid` if no such attribute exists.
    pub fn get(&self, name: impl AsRef<[u8]>) -> Result<Cow<'_, AttributeValue>> {
        let name = name.as_ref();
        self.find(name).ok_or_else(|| Error::invalid(format!(
            "attribute `{}` not found", Text::from_slice_unchecked(name)
        )))
    }

    /// The value of the attribute with this name, if it exists.
    /// Returns `Error::Type` if the attribute exists, but has a different type.
    pub fn find_typed<T: TypedValue>(&self, name: impl AsRef<[u8]>) -> Result<Option<T>> {
        let name = name.as_ref();

        match self.find(name) {
            None => Ok(None),
            Some(value) => T::from_value(&value).map(Some)
                .ok_or_else(|| mismatch(&Text::from_slice_unchecked(name), value.kind_name(), T::TYPE_NAME)),
        }
    }

    /// The value of the attribute with this name.
    /// Returns `Error::Invalid` if no such attribute exists,
    /// and `Error::Type` if the attribute has a different type.
    pub fn get_typed<T: TypedValue>(&self, name: impl AsRef<[u8]>) -> Result<T> {
        let name = name.as_ref();
        let value = self.get(name)?;

        T::from_value(&value)
            .ok_or_else(|| mismatch(&Text::from_slice_unchecked(name), value.kind_name(), T::TYPE_NAME))
    }

    /// Whether an attribute of this name exists.
    pub fn contains(&self, name: impl AsRef<[u8]>) -> bool {
        let name = name.as_ref();
        Self::is_predefined_name(name) || self.custom.contains_key(name)
    }

    /// Number of attributes, including the required attributes.
    pub fn len(&self) -> usize {
        required::ALL.len() + self.custom.len()
    }

    /// Headers always contain the required attributes.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All attributes that are not required, sorted by name.
    pub fn custom_attributes(&self) -> &BTreeMap<Text, AttributeValue> {
        &self.custom
    }

    /// Iterate over all attributes in ascending name order, including the required attributes.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (&TextSlice, Cow<'_, AttributeValue>)> {
        let required = required::ALL.iter()
            .filter_map(move |&name| self.predefined_value(name).map(|value| (name, Cow::Owned(value))));

        let custom = self.custom.iter()
            .map(|(name, value)| (name.as_slice(), Cow::Borrowed(value)));

        let mut all: Vec<(&TextSlice, Cow<'_, AttributeValue>)> = required.chain(custom).collect();
        all.sort_by(|(left, _), (right, _)| left.cmp(right));
        all.into_iter()
    }

    /// Set the tile description of this image.
    pub fn set_tiles(&mut self, tiles: TileDescription) -> UnitResult {
        self.insert(Text::from_slice_unchecked(TILES), tiles)
    }

    /// The tile description of this image, if any.
    pub fn tiles(&self) -> Option<TileDescription> {
        self.custom.get(TILES).and_then(AttributeValue::to_typed)
    }

    /// Whether any attribute name, type name, or channel name is longer than 31 bytes.
    pub fn has_long_names(&self) -> bool {
        let is_long = |name: &TextSlice| name.len() > Version::SHORT_NAME_LENGTH;
        let has_long_channel_names = |channels: &ChannelList| channels.iter().any(|(name, _)| is_long(name.as_slice()));

        has_long_channel_names(&self.channels) || self.custom.iter().any(|(name, value)|
            is_long(name.as_slice()) || is_long(value.kind_name()) || match value {
                AttributeValue::ChannelList(channels) => has_long_channel_names(channels),
                _ => false,
            }
        )
    }


    /// Check every constraint that readers of this header depend on.
    /// Aborts with a descriptive error at the first violation.
    pub fn sanity_check(&self, is_tiled: bool) -> UnitResult {
        self.display_window.validate("display window")?;
        self.data_window.validate("data window")?;

        // also rejects nan
        if !(self.pixel_aspect >= 1e-6 && self.pixel_aspect <= 1e6) {
            return Err(Error::invalid(format!("pixel aspect ratio {} is not in 1e-6 ..= 1e6", self.pixel_aspect)));
        }

        if !(self.screen_window_width >= 0.0) {
            return Err(Error::invalid(format!("screen window width {} is negative", self.screen_window_width)));
        }

        if is_tiled {
            let tiles = match self.custom.get(TILES) {
                Some(AttributeValue::TileDescription(tiles)) => tiles,
                Some(other) => return Err(Error::invalid(format!(
                    "tiled image has a `tiles` attribute of type `{}`", Text::from_slice_unchecked(other.kind_name())
                ))),
                None => return Err(Error::invalid("tiled image is missing the `tiles` attribute")),
            };

            tiles.validate()?;

            // subsampled tiles are not defined by the format
            for (name, channel) in self.channels.iter() {
                if channel.sampling != Vec2(1, 1) {
                    return Err(Error::invalid(format!(
                        "channel `{}` of a tiled image has sampling {:?}, but only (1, 1) is allowed",
                        name, channel.sampling
                    )));
                }
            }
        }

        else {
            if self.line_order == LineOrder::Unspecified {
                return Err(Error::invalid("scan line image must have increasing or decreasing line order"));
            }

            let size = self.data_window.size();

            for (name, channel) in self.channels.iter() {
                channel.validate_sampling(name)?;

                let sampling = channel.sampling.map(|sampling| i64::try_from(sampling).unwrap_or(i64::MAX));
                let minimum = self.data_window.min.map(i64::from);

                if minimum.x().rem_euclid(sampling.x()) != 0 || minimum.y().rem_euclid(sampling.y()) != 0 {
                    return Err(Error::invalid(format!(
                        "data window origin {:?} is not a multiple of the sampling {:?} of channel `{}`",
                        self.data_window.min, channel.sampling, name
                    )));
                }

                if size.width() % sampling.x() != 0 || size.height() % sampling.y() != 0 {
                    return Err(Error::invalid(format!(
                        "data window size {:?} is not a multiple of the sampling {:?} of channel `{}`",
                        size, channel.sampling, name
                    )));
                }
            }
        }

        for (name, value) in &self.custom {
            value.validate().map_err(|error| Error::invalid(format!("attribute `{}`: {}", name, error)))?;
        }

        Ok(())
    }


    /// Number of bytes the attribute records of this header would consume, including the terminator.
    pub fn byte_size(&self) -> usize {
        self.iter().map(|(name, value)| attribute::byte_size(name, &value)).sum::<usize>()
            + sequence_end::byte_size()
    }

    /// Write all attributes in ascending name order, followed by an empty name.
    /// Returns `Error::Invalid` if any name does not fit the version.
    pub fn write(&self, write: &mut impl Write, version: Version) -> UnitResult {
        let max_name_length = version.max_name_length();

        for (name, value) in self.iter() {
            Text::validate_name_bytes(name, max_name_length, "attribute name")?;
            Text::validate_name_bytes(value.kind_name(), max_name_length, "attribute type name")?;

            if let AttributeValue::ChannelList(channels) = value.as_ref() {
                for (channel_name, _) in channels.iter() {
                    channel_name.validate_name(max_name_length, "channel name")?;
                }
            }

            tracing::trace!(
                name = %Text::from_slice_unchecked(name),
                kind = %Text::from_slice_unchecked(value.kind_name()),
                size = value.byte_size(),
                "writing attribute"
            );

            attribute::write(name, &value, write)?;
        }

        sequence_end::write(write)
    }

    /// Read attribute records until an empty name is found.
    /// Starts with a default header, replacing values as they are encountered.
    /// Either returns the complete header or an error, never a partial header.
    pub fn read(read: &mut impl Read, version: Version) -> Result<Self> {
        let mut read = PeekRead::new(Tracking::new(read));
        let mut header = Header::default();

        while !sequence_end::has_come(&mut read)? {
            // the first byte of the name has already been peeked
            let record_start = read.inner().byte_position().saturating_sub(1);

            header.read_record(&mut read, version)
                .map_err(|error| locate(error, record_start))?;
        }

        Ok(header)
    }

    fn read_record(&mut self, read: &mut impl Read, version: Version) -> UnitResult {
        let max_name_length = version.max_name_length();

        let name = Text::read_null_terminated(read, max_name_length)?;
        let kind = Text::read_null_terminated(read, max_name_length)?;

        if kind.is_empty() {
            return Err(Error::format(format!("attribute `{}` has an empty type name", name)));
        }

        let size = i32::read(read)?;
        let size = usize::try_from(size).map_err(|_| Error::format(format!(
            "attribute `{}` has a negative size {}", name, size
        )))?;

        tracing::trace!(name = %name, kind = %kind, size, "reading attribute");

        if let Some(expected) = Self::predefined_kind(name.as_slice()) {
            if expected != kind.as_slice() {
                return Err(Error::format(format!(
                    "required attribute `{}` has type `{}` instead of `{}`",
                    name, kind, Text::from_slice_unchecked(expected)
                )));
            }

            let value = AttributeValue::read(read, kind, size, version)?;
            self.assign_predefined(name.as_slice(), value);
            return Ok(());
        }

        if let Some(existing) = self.custom.get(name.as_slice()) {
            if existing.kind_name() != kind.as_slice() {
                return Err(Error::format(format!(
                    "attribute `{}` has type `{}` instead of `{}`",
                    name, kind, Text::from_slice_unchecked(existing.kind_name())
                )));
            }

            tracing::debug!(name = %name, "overwriting existing attribute while reading");
        }

        let value = AttributeValue::read(read, kind, size, version)?;

        if let AttributeValue::Opaque { kind, bytes } = &value {
            tracing::debug!(name = %name, kind = %kind, size = bytes.len(), "keeping attribute of unknown type as opaque bytes");
        }

        self.custom.insert(name, value);
        Ok(())
    }

    /// Serialize the magic number, the version inferred from this header, and all attributes.
    /// These are the bytes that the pixel engine receives.
    pub fn to_bytes(&self, is_tiled: bool) -> Result<Vec<u8>> {
        let version = Version::infer(self, is_tiled);
        let mut bytes = Vec::with_capacity(magic_number::BYTES.len() + u32::BYTE_SIZE + self.byte_size());

        magic_number::write(&mut bytes)?;
        version.write(&mut bytes)?;
        self.write(&mut bytes, version)?;
        Ok(bytes)
    }

    /// Read the magic number, the version, and all attributes.
    /// Any bytes after the header are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Version, Self)> {
        let read = &mut &bytes[..];
        magic_number::validate_exr(read)?;

        let version = Version::read(read)?;
        let header = Header::read(read, version)?;
        Ok((version, header))
    }
}

/// A 64 by 64 pixel image without channels.
impl Default for Header {
    fn default() -> Self {
        Header::new(Vec2(64, 64))
    }
}

// floats are hashed by their bits
impl Hash for Header {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.display_window.hash(state);
        self.data_window.hash(state);
        self.pixel_aspect.to_bits().hash(state);
        self.screen_window_center.x().to_bits().hash(state);
        self.screen_window_center.y().to_bits().hash(state);
        self.screen_window_width.to_bits().hash(state);
        self.line_order.hash(state);
        self.compression.hash(state);
        self.channels.hash(state);
        self.custom.hash(state);
    }
}

fn mismatch(name: &Text, existing: &TextSlice, requested: &TextSlice) -> Error {
    Error::type_mismatch(format!(
        "attribute `{}` has type `{}`, not `{}`",
        name, Text::from_slice_unchecked(existing), Text::from_slice_unchecked(requested)
    ))
}

fn locate(error: Error, record_start: usize) -> Error {
    match error {
        Error::Format(message) => Error::format(format!("{} (in attribute record at header byte {})", message, record_start)),
        other => other,
    }
}
