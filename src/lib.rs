
//! Read, write and validate the metadata of OpenEXR images:
//! the version word, the header attributes, and the memory layout
//! of the frame buffers that pixels are transferred through.
//!
//! Compression and pixel block encoding are delegated to a `frame_buffer::PixelEngine`.

#![forbid(unsafe_code)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused_extern_crates,
    unused,
)]

#[macro_use]
pub mod io;

pub mod math;
pub mod error;
pub mod half_bits;
pub mod compression;
pub mod meta;
pub mod frame_buffer;


/// Export the most important items.
pub mod prelude {

    // main exports
    pub use crate::meta::header::Header;
    pub use crate::meta::Version;
    pub use crate::frame_buffer::{
        FrameBuffer, Slice, BoundFrameBuffer, PixelEngine, Transfer,
        MemoryArena, RegionId,
    };

    // secondary data types
    pub use crate::meta;
    pub use crate::meta::attribute::{
        self, AttributeValue, TypedValue, Text, IntegerBounds, FloatRect,
        Channel, ChannelList, SampleType, LineOrder, TileDescription, LevelMode,
    };
    pub use crate::compression::Compression;
    pub use crate::math::Vec2;
    pub use crate::error::{self, Error, Result, UnitResult};

    // re-export external stuff
    pub use half::f16;
    pub use crate::half_bits::{float_to_half_bits, half_bits_to_float};
}
