//! Texture format selection for iOS
//!
//! iOS GPUs cannot sample BC (DXT) compressed textures, so every block
//! compressed format is swapped for the closest uncompressed format before
//! the texture is cooked. Other formats are left alone.

use std::fmt;
use std::str::FromStr;

/// Pixel formats known to the texture cooker
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Unknown,
    R8_Typeless,
    R8_UNorm,
    R8_SNorm,
    R8G8B8A8_Typeless,
    R8G8B8A8_UNorm,
    R8G8B8A8_UNorm_sRGB,
    B8G8R8A8_UNorm,
    B8G8R8A8_UNorm_sRGB,
    R16G16_Typeless,
    R16G16_UNorm,
    R16G16_SNorm,
    R16G16B16A16_Typeless,
    R16G16B16A16_Float,
    R16G16B16A16_UNorm,
    R32G32B32A32_Float,
    BC1_Typeless,
    BC1_UNorm,
    BC1_UNorm_sRGB,
    BC2_Typeless,
    BC2_UNorm,
    BC2_UNorm_sRGB,
    BC3_Typeless,
    BC3_UNorm,
    BC3_UNorm_sRGB,
    BC4_Typeless,
    BC4_UNorm,
    BC4_SNorm,
    BC5_Typeless,
    BC5_UNorm,
    BC5_SNorm,
    BC6H_Typeless,
    BC6H_Uf16,
    BC6H_Sf16,
    BC7_Typeless,
    BC7_UNorm,
    BC7_UNorm_sRGB,
}

impl PixelFormat {
    /// Every known format, in declaration order
    pub const ALL: [PixelFormat; 37] = [
        PixelFormat::Unknown,
        PixelFormat::R8_Typeless,
        PixelFormat::R8_UNorm,
        PixelFormat::R8_SNorm,
        PixelFormat::R8G8B8A8_Typeless,
        PixelFormat::R8G8B8A8_UNorm,
        PixelFormat::R8G8B8A8_UNorm_sRGB,
        PixelFormat::B8G8R8A8_UNorm,
        PixelFormat::B8G8R8A8_UNorm_sRGB,
        PixelFormat::R16G16_Typeless,
        PixelFormat::R16G16_UNorm,
        PixelFormat::R16G16_SNorm,
        PixelFormat::R16G16B16A16_Typeless,
        PixelFormat::R16G16B16A16_Float,
        PixelFormat::R16G16B16A16_UNorm,
        PixelFormat::R32G32B32A32_Float,
        PixelFormat::BC1_Typeless,
        PixelFormat::BC1_UNorm,
        PixelFormat::BC1_UNorm_sRGB,
        PixelFormat::BC2_Typeless,
        PixelFormat::BC2_UNorm,
        PixelFormat::BC2_UNorm_sRGB,
        PixelFormat::BC3_Typeless,
        PixelFormat::BC3_UNorm,
        PixelFormat::BC3_UNorm_sRGB,
        PixelFormat::BC4_Typeless,
        PixelFormat::BC4_UNorm,
        PixelFormat::BC4_SNorm,
        PixelFormat::BC5_Typeless,
        PixelFormat::BC5_UNorm,
        PixelFormat::BC5_SNorm,
        PixelFormat::BC6H_Typeless,
        PixelFormat::BC6H_Uf16,
        PixelFormat::BC6H_Sf16,
        PixelFormat::BC7_Typeless,
        PixelFormat::BC7_UNorm,
        PixelFormat::BC7_UNorm_sRGB,
    ];

    /// Whether this is one of the BC block compressed formats
    pub fn is_compressed_bc(self) -> bool {
        use PixelFormat::*;
        matches!(
            self,
            BC1_Typeless
                | BC1_UNorm
                | BC1_UNorm_sRGB
                | BC2_Typeless
                | BC2_UNorm
                | BC2_UNorm_sRGB
                | BC3_Typeless
                | BC3_UNorm
                | BC3_UNorm_sRGB
                | BC4_Typeless
                | BC4_UNorm
                | BC4_SNorm
                | BC5_Typeless
                | BC5_UNorm
                | BC5_SNorm
                | BC6H_Typeless
                | BC6H_Uf16
                | BC6H_Sf16
                | BC7_Typeless
                | BC7_UNorm
                | BC7_UNorm_sRGB
        )
    }

    pub fn name(self) -> &'static str {
        use PixelFormat::*;
        match self {
            Unknown => "Unknown",
            R8_Typeless => "R8_Typeless",
            R8_UNorm => "R8_UNorm",
            R8_SNorm => "R8_SNorm",
            R8G8B8A8_Typeless => "R8G8B8A8_Typeless",
            R8G8B8A8_UNorm => "R8G8B8A8_UNorm",
            R8G8B8A8_UNorm_sRGB => "R8G8B8A8_UNorm_sRGB",
            B8G8R8A8_UNorm => "B8G8R8A8_UNorm",
            B8G8R8A8_UNorm_sRGB => "B8G8R8A8_UNorm_sRGB",
            R16G16_Typeless => "R16G16_Typeless",
            R16G16_UNorm => "R16G16_UNorm",
            R16G16_SNorm => "R16G16_SNorm",
            R16G16B16A16_Typeless => "R16G16B16A16_Typeless",
            R16G16B16A16_Float => "R16G16B16A16_Float",
            R16G16B16A16_UNorm => "R16G16B16A16_UNorm",
            R32G32B32A32_Float => "R32G32B32A32_Float",
            BC1_Typeless => "BC1_Typeless",
            BC1_UNorm => "BC1_UNorm",
            BC1_UNorm_sRGB => "BC1_UNorm_sRGB",
            BC2_Typeless => "BC2_Typeless",
            BC2_UNorm => "BC2_UNorm",
            BC2_UNorm_sRGB => "BC2_UNorm_sRGB",
            BC3_Typeless => "BC3_Typeless",
            BC3_UNorm => "BC3_UNorm",
            BC3_UNorm_sRGB => "BC3_UNorm_sRGB",
            BC4_Typeless => "BC4_Typeless",
            BC4_UNorm => "BC4_UNorm",
            BC4_SNorm => "BC4_SNorm",
            BC5_Typeless => "BC5_Typeless",
            BC5_UNorm => "BC5_UNorm",
            BC5_SNorm => "BC5_SNorm",
            BC6H_Typeless => "BC6H_Typeless",
            BC6H_Uf16 => "BC6H_Uf16",
            BC6H_Sf16 => "BC6H_Sf16",
            BC7_Typeless => "BC7_Typeless",
            BC7_UNorm => "BC7_UNorm",
            BC7_UNorm_sRGB => "BC7_UNorm_sRGB",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized pixel format name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown pixel format: {0}")]
pub struct UnknownPixelFormat(pub String);

impl FromStr for PixelFormat {
    type Err = UnknownPixelFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PixelFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPixelFormat(s.to_string()))
    }
}

/// Map a BC format to the uncompressed format iOS should use instead
pub fn downgrade(format: PixelFormat) -> PixelFormat {
    use PixelFormat::*;
    match format {
        BC1_Typeless | BC2_Typeless | BC3_Typeless => R8G8B8A8_Typeless,
        BC1_UNorm | BC2_UNorm | BC3_UNorm => R8G8B8A8_UNorm,
        BC1_UNorm_sRGB | BC2_UNorm_sRGB | BC3_UNorm_sRGB => R8G8B8A8_UNorm_sRGB,
        BC4_Typeless => R8_Typeless,
        BC4_UNorm => R8_UNorm,
        BC4_SNorm => R8_SNorm,
        BC5_Typeless => R16G16_Typeless,
        BC5_UNorm => R16G16_UNorm,
        BC5_SNorm => R16G16_SNorm,
        BC7_Typeless | BC6H_Typeless => R16G16B16A16_Typeless,
        BC7_UNorm | BC6H_Uf16 | BC6H_Sf16 => R16G16B16A16_Float,
        BC7_UNorm_sRGB => R16G16B16A16_UNorm,
        other => other,
    }
}
