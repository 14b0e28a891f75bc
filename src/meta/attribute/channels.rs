
//! The `chlist` attribute: which channels a pixel has, and how they are stored.

use smallvec::SmallVec;
use std::convert::TryFrom;

use crate::io::*;
use crate::error::*;
use crate::math::Vec2;
use crate::meta::sequence_end;
use super::text::{Text, TextSlice};


/// The numeric type of every sample in a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleType {

    /// `u32`, code 0.
    U32,

    /// `f16`, code 1.
    F16,

    /// `f32`, code 2.
    F32,
}

coded_enum! {
    SampleType as i32, "sample type", Error::format;
    U32 = 0, F16 = 1, F32 = 2,
}

impl SampleType {

    /// Size of one sample in memory and in a file.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleType::F16 => 2,
            SampleType::U32 | SampleType::F32 => 4,
        }
    }
}


/// Describes the samples of one channel. Holds no pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Channel {

    /// How each sample is stored.
    pub sample_type: SampleType,

    /// A hint for lossy codecs to quantize linearly instead of perceptually.
    /// Typically false for color and luminance, true for alpha and chroma.
    pub quantize_linearly: bool,

    /// Only every n-th pixel in each direction has a sample. At least one.
    /// Values above one are only allowed in scan line images.
    pub sampling: Vec2<usize>,
}

impl Channel {

    /// A channel with a sample at every pixel.
    pub fn new(sample_type: SampleType, quantize_linearly: bool) -> Self {
        Channel { sample_type, quantize_linearly, sampling: Vec2(1, 1) }
    }

    /// This channel, with a different sampling rate.
    pub fn with_sampling(self, sampling: impl Into<Vec2<usize>>) -> Self {
        Channel { sampling: sampling.into(), ..self }
    }

    /// Fails with `Error::Invalid` if a sampling rate is zero.
    pub fn validate_sampling(&self, name: &Text) -> UnitResult {
        if self.sampling.x() < 1 || self.sampling.y() < 1 {
            Err(Error::invalid(format!("channel `{}` has sampling {:?}, but both rates must be positive", name, self.sampling)))
        }
        else {
            Ok(())
        }
    }

    // name, sample type, linearity, three reserved bytes, two sampling rates
    fn byte_size(name: &Text) -> usize {
        name.null_terminated_byte_size() + SampleType::byte_size() + 4 * u8::BYTE_SIZE + 2 * i32::BYTE_SIZE
    }

    pub(crate) fn write<W: Write>(&self, name: &Text, write: &mut W) -> UnitResult {
        name.write_null_terminated(write)?;
        self.sample_type.write(write)?;

        u8::write_slice(write, &[u8::from(self.quantize_linearly), 0, 0, 0])?;

        for &rate in &[self.sampling.x(), self.sampling.y()] {
            usize_to_i32(rate, "channel sampling")?.write(write)?;
        }

        Ok(())
    }

    pub(crate) fn read<R: Read>(read: &mut R, max_name_length: usize) -> Result<(Text, Self)> {
        let name = Text::read_null_terminated(read, max_name_length)?;
        let sample_type = SampleType::read(read)?;

        // linearity, followed by three reserved bytes
        let mut flags = [0_u8; 4];
        u8::read_slice(read, &mut flags)?;

        let rates = Vec2(i32::read(read)?, i32::read(read)?);
        let sampling = Vec2::<usize>::try_from(rates).map_err(|_| Error::format(format!(
            "channel `{}` has negative sampling {:?}", name, rates
        )))?;

        Ok((name, Channel { sample_type, quantize_linearly: flags[0] != 0, sampling }))
    }
}


/// The channels of an image, sorted by name bytes, with unique names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelList {
    list: SmallVec<[(Text, Channel); 5]>,
}

impl ChannelList {

    /// No channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a channel, or overwrite the channel of the same name.
    /// Returns the overwritten channel.
    /// Empty names and zero sampling rates are `Error::Invalid`.
    pub fn insert(&mut self, name: impl Into<Text>, channel: Channel) -> Result<Option<Channel>> {
        let name = name.into();
        name.validate_name(usize::MAX, "channel name")?;
        channel.validate_sampling(&name)?;

        match self.position(name.as_slice()) {
            Ok(index) => Ok(Some(std::mem::replace(&mut self.list[index].1, channel))),
            Err(index) => {
                self.list.insert(index, (name, channel));
                Ok(None)
            },
        }
    }

    /// Remove and return the channel with exactly this name.
    pub fn remove(&mut self, name: impl AsRef<[u8]>) -> Option<Channel> {
        let index = self.position(name.as_ref()).ok()?;
        Some(self.list.remove(index).1)
    }

    /// The channel with exactly this name.
    pub fn find(&self, name: impl AsRef<[u8]>) -> Option<&Channel> {
        let index = self.position(name.as_ref()).ok()?;
        Some(&self.list[index].1)
    }

    /// The channel with exactly this name, mutable.
    /// The sampling rate must stay positive.
    pub fn find_mut(&mut self, name: impl AsRef<[u8]>) -> Option<&mut Channel> {
        let index = self.position(name.as_ref()).ok()?;
        Some(&mut self.list[index].1)
    }

    /// The channel with exactly this name, or `Error::Invalid`.
    pub fn get(&self, name: impl AsRef<[u8]>) -> Result<&Channel> {
        let name = name.as_ref();

        self.find(name).ok_or_else(|| Error::invalid(format!(
            "image has no channel named `{}`", Text::from_slice_unchecked(name)
        )))
    }

    /// Whether a channel has exactly this name.
    pub fn contains(&self, name: impl AsRef<[u8]>) -> bool {
        self.position(name.as_ref()).is_ok()
    }

    /// All channels, sorted by name.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (&Text, &Channel)> {
        self.list.iter().map(|(name, channel)| (name, channel))
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether there are no channels.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Size of one pixel with a sample of every channel.
    pub fn bytes_per_pixel(&self) -> usize {
        self.iter().map(|(_, channel)| channel.sample_type.bytes_per_sample()).sum()
    }

    /// The channels, each with its byte offset inside a pixel that stores all channels in this order.
    pub fn channels_with_byte_offset(&self) -> impl '_ + Iterator<Item = (usize, &Text, &Channel)> {
        let mut offset = 0;

        self.iter().map(move |(name, channel)| {
            let start = offset;
            offset += channel.sample_type.bytes_per_sample();
            (start, name, channel)
        })
    }

    fn position(&self, name: &TextSlice) -> std::result::Result<usize, usize> {
        self.list.binary_search_by(|(existing, _)| existing.as_slice().cmp(name))
    }

    /// Bytes of the encoded list, including the terminator.
    pub fn byte_size(&self) -> usize {
        sequence_end::byte_size() + self.list.iter()
            .map(|(name, _)| Channel::byte_size(name))
            .sum::<usize>()
    }

    /// Write every channel, then the terminating null byte.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        for (name, channel) in &self.list {
            channel.write(name, write)?;
        }

        sequence_end::write(write)
    }

    /// Read channels up to the terminating null byte.
    /// Fails with `Error::Format` unless the names are strictly ascending.
    pub fn read(read: &mut PeekRead<impl Read>, max_name_length: usize) -> Result<Self> {
        let mut channels = ChannelList::new();

        while !sequence_end::has_come(read)? {
            let (name, channel) = Channel::read(read, max_name_length)?;

            if let Some((previous, _)) = channels.list.last() {
                if name.as_slice() <= previous.as_slice() {
                    return Err(Error::format(format!(
                        "channel `{}` follows `{}`, but names must be strictly ascending", name, previous
                    )));
                }
            }

            channels.list.push((name, channel));
        }

        Ok(channels)
    }
}

impl ChannelList {

    /// Insert each channel in turn, as `insert` does. Later channels replace earlier ones of the same name.
    /// Fails at the first empty name or zero sampling rate.
    pub fn try_from_iter<N: Into<Text>>(channels: impl IntoIterator<Item = (N, Channel)>) -> Result<Self> {
        let mut list = ChannelList::new();

        for (name, channel) in channels {
            list.insert(name, channel)?;
        }

        Ok(list)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn upsert_keeps_names_sorted(){
        let mut channels = ChannelList::new();
        assert_eq!(channels.insert("G", Channel::new(SampleType::F16, false)).unwrap(), None);
        assert_eq!(channels.insert("B", Channel::new(SampleType::F16, false)).unwrap(), None);
        assert_eq!(channels.insert("R", Channel::new(SampleType::F16, false)).unwrap(), None);

        let previous = channels.insert("G", Channel::new(SampleType::F32, true)).unwrap();
        assert_eq!(previous, Some(Channel::new(SampleType::F16, false)));

        let names: Vec<String> = channels.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(names, vec!["B", "G", "R"]);
        assert_eq!(channels.bytes_per_pixel(), 2 + 4 + 2);

        let offsets: Vec<usize> = channels.channels_with_byte_offset().map(|(offset, _, _)| offset).collect();
        assert_eq!(offsets, vec![0, 2, 6]);

        assert_eq!(channels.get("G").unwrap().sample_type, SampleType::F32);
        assert!(channels.find("A").is_none());
        assert!(matches!(channels.get("A"), Err(Error::Invalid(_))));

        assert!(channels.insert("", Channel::new(SampleType::F16, false)).is_err());
        assert!(channels.insert("A", Channel::new(SampleType::F16, false).with_sampling((0, 1))).is_err());
        assert!(!channels.contains("A"));

        assert_eq!(channels.remove("B").map(|channel| channel.sample_type), Some(SampleType::F16));
        assert_eq!(channels.len(), 2);
    }

    #[test]
    fn names_are_case_sensitive(){
        let channels = ChannelList::try_from_iter(vec![
            ("a", Channel::new(SampleType::U32, false)),
            ("A", Channel::new(SampleType::F32, false)),
        ]).unwrap();

        assert_eq!(channels.len(), 2);
        assert_eq!(channels.get("a").unwrap().sample_type, SampleType::U32);
        assert_eq!(channels.iter().next().unwrap().0, &Text::from("A"));
    }

    #[test]
    fn collecting_stops_at_invalid_channels(){
        let channels = ChannelList::try_from_iter(vec![
            ("Z", Channel::new(SampleType::F32, false)),
            ("Z", Channel::new(SampleType::U32, false)),
        ]).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels.get("Z").unwrap().sample_type, SampleType::U32);

        let empty_name = ChannelList::try_from_iter(vec![("", Channel::new(SampleType::F16, false))]);
        assert!(matches!(empty_name, Err(Error::Invalid(_))));

        let zero_sampling = ChannelList::try_from_iter(vec![
            ("R", Channel::new(SampleType::F16, false)),
            ("G", Channel::new(SampleType::F16, false).with_sampling((1, 0))),
        ]);
        assert!(zero_sampling.is_err());
    }

    #[test]
    fn wire_layout(){
        let channels = ChannelList::try_from_iter(vec![
            ("Y", Channel::new(SampleType::F16, true).with_sampling((2, 2))),
        ]).unwrap();

        let mut bytes = Vec::new();
        channels.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), channels.byte_size());

        assert_eq!(bytes, vec![
            b'Y', 0,
            1, 0, 0, 0,
            1, 0, 0, 0,
            2, 0, 0, 0,
            2, 0, 0, 0,
            0,
        ]);

        let read = ChannelList::read(&mut PeekRead::new(bytes.as_slice()), 31).unwrap();
        assert_eq!(read, channels);
    }

    #[test]
    fn malformed_lists(){
        let mut unsorted = Vec::new();
        Channel::new(SampleType::F16, false).write(&Text::from("R"), &mut unsorted).unwrap();
        Channel::new(SampleType::F16, false).write(&Text::from("B"), &mut unsorted).unwrap();
        sequence_end::write(&mut unsorted).unwrap();
        assert!(matches!(ChannelList::read(&mut PeekRead::new(unsorted.as_slice()), 31), Err(Error::Format(_))));

        let mut duplicate = Vec::new();
        Channel::new(SampleType::F16, false).write(&Text::from("R"), &mut duplicate).unwrap();
        Channel::new(SampleType::F32, false).write(&Text::from("R"), &mut duplicate).unwrap();
        sequence_end::write(&mut duplicate).unwrap();
        assert!(matches!(ChannelList::read(&mut PeekRead::new(duplicate.as_slice()), 31), Err(Error::Format(_))));

        let unknown_type: &[u8] = &[b'R', 0, 7, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0];
        assert!(matches!(ChannelList::read(&mut PeekRead::new(unknown_type), 31), Err(Error::Format(_))));

        let negative_sampling: &[u8] = &[b'R', 0, 1, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, 0xff, 0xff, 1, 0, 0, 0, 0];
        assert!(matches!(ChannelList::read(&mut PeekRead::new(negative_sampling), 31), Err(Error::Format(_))));
    }

    #[test]
    fn sample_type_codes(){
        assert_eq!(SampleType::F16.code(), 1);
        assert_eq!(SampleType::from_code(2), Some(SampleType::F32));
        assert_eq!(SampleType::byte_size(), 4);
        assert_eq!(SampleType::F16.bytes_per_sample(), 2);
    }
}
