
//! The compression method of the pixel blocks.
//! This crate only stores the method. The pixel engine runs the codecs.

use crate::meta::attribute::SampleType;
use crate::error::Error;


/// How the pixel engine compresses the pixel blocks of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {

    /// No compression.
    Uncompressed,

    /// Run-length encoding. Lossless.
    RLE,

    /// Deflate, one scan line per block. Lossless.
    ZIP1,

    /// Deflate, 16 scan lines per block. Lossless, and the default.
    ZIP16,

    /// Wavelet transform followed by Huffman coding. Lossless.
    PIZ,

    /// Deflate after reducing `f32` samples to 24 bits.
    PXR24,

    /// Fixed-rate 4x4 block compression of `f16` samples.
    B44,

    /// `B44` with a shorter encoding for flat blocks.
    B44A,

    /// Lossy DCT compression, 32 scan lines per block.
    DWAA,

    /// Lossy DCT compression, 256 scan lines per block.
    DWAB,
}

coded_enum! {
    Compression as u8, "compression method", Error::unsupported;
    Uncompressed = 0, RLE = 1, ZIP1 = 2, ZIP16 = 3, PIZ = 4,
    PXR24 = 5, B44 = 6, B44A = 7, DWAA = 8, DWAB = 9,
}

impl Default for Compression {
    fn default() -> Self { Compression::ZIP16 }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use self::Compression::*;

        formatter.write_str(match self {
            Uncompressed => "none",
            RLE => "rle",
            ZIP1 => "zips",
            ZIP16 => "zip",
            PIZ => "piz",
            PXR24 => "pxr24",
            B44 => "b44",
            B44A => "b44a",
            DWAA => "dwaa",
            DWAB => "dwab",
        })
    }
}

impl Compression {

    /// Number of scan lines in one pixel block of a scan line image.
    pub fn scan_lines_per_block(self) -> usize {
        use self::Compression::*;

        match self {
            Uncompressed | RLE | ZIP1 => 1,
            ZIP16 | PXR24 => 16,
            PIZ | B44 | B44A | DWAA => 32,
            DWAB => 256,
        }
    }

    /// Whether samples of this type are reconstructed exactly.
    pub fn is_lossless_for(self, sample_type: SampleType) -> bool {
        use self::Compression::*;

        match self {
            Uncompressed | RLE | ZIP1 | ZIP16 | PIZ => true,
            PXR24 => sample_type != SampleType::F32,
            B44 | B44A => sample_type != SampleType::F16,
            DWAA | DWAB => false,
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wire_codes(){
        for code in 0 ..= 9_u8 {
            let compression = Compression::from_code(code).unwrap();

            let mut bytes = Vec::new();
            compression.write(&mut bytes).unwrap();
            assert_eq!(bytes, vec![code]);
            assert_eq!(Compression::read(&mut bytes.as_slice()).unwrap(), compression);
        }

        assert_eq!(Compression::ZIP16.code(), 3);
        assert!(matches!(Compression::read(&mut [10_u8].as_slice()), Err(Error::NotSupported(_))));
    }

    #[test]
    fn block_sizes(){
        assert_eq!(Compression::default(), Compression::ZIP16);
        assert_eq!(Compression::default().scan_lines_per_block(), 16);
        assert_eq!(Compression::DWAB.scan_lines_per_block(), 256);
        assert!(Compression::PXR24.is_lossless_for(SampleType::F16));
        assert!(!Compression::B44.is_lossless_for(SampleType::F16));
    }
}
