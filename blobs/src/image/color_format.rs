#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelCount {
    L = 1,
    LA = 2,
    #[default]
    Rgb = 3,
    Rgba = 4,
}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelSize {
    #[default]
    _8bit = 1,
    _16bit = 2,
    _32bit = 4,
}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelType {
    #[default]
    UInt,
    Float,
}

/// Pixel layout tag of an [`Image`](super::Image).
#[derive(Clone, Copy, Debug, Hash, Default, PartialEq, Eq)]
pub struct ColorFormat {
    pub channel_count: ChannelCount,
    pub channel_size: ChannelSize,
    pub channel_type: ChannelType,
}

impl ChannelCount {
    pub fn channel_count(&self) -> u8 {
        *self as u8
    }
    pub fn byte_count(&self, channel_size: ChannelSize) -> u8 {
        self.channel_count() * channel_size.byte_count()
    }
}

impl ChannelSize {
    pub fn byte_count(&self) -> u8 {
        *self as u8
    }
}

impl ColorFormat {
    /// 8-bit grayscale.
    pub const L_U8: ColorFormat = ColorFormat::new(ChannelCount::L, ChannelSize::_8bit);
    /// Single channel of 32-bit labels; the only format accepted as a label image.
    pub const L_U32: ColorFormat = ColorFormat::new(ChannelCount::L, ChannelSize::_32bit);
    /// Interleaved 8-bit R, G, B.
    pub const RGB_U8: ColorFormat = ColorFormat::new(ChannelCount::Rgb, ChannelSize::_8bit);
    pub const RGBA_U8: ColorFormat = ColorFormat::new(ChannelCount::Rgba, ChannelSize::_8bit);

    const fn new(channel_count: ChannelCount, channel_size: ChannelSize) -> Self {
        Self {
            channel_count,
            channel_size,
            channel_type: ChannelType::UInt,
        }
    }

    /// Bytes per pixel.
    pub fn byte_count(&self) -> u8 {
        self.channel_count.byte_count(self.channel_size)
    }
}

impl std::fmt::Display for ChannelCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelCount::L => write!(f, "L"),
            ChannelCount::LA => write!(f, "LA"),
            ChannelCount::Rgb => write!(f, "RGB"),
            ChannelCount::Rgba => write!(f, "RGBA"),
        }
    }
}

impl std::fmt::Display for ChannelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelSize::_8bit => write!(f, "8"),
            ChannelSize::_16bit => write!(f, "16"),
            ChannelSize::_32bit => write!(f, "32"),
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelType::UInt => write!(f, "u"),
            ChannelType::Float => write!(f, "f"),
        }
    }
}

impl std::fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.channel_count, self.channel_type, self.channel_size
        )
    }
}
