//! LED colour type shared by both units.

/// Brightness the 8-Angle unit treats as full scale.
pub const FULL_BRIGHTNESS: u8 = 100;

/// Colour of one RGB LED.
///
/// `brightness` only reaches the 8-Angle unit; the 8-Encoder LEDs take
/// plain RGB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub brightness: u8,
}

impl LedColor {
    pub const OFF: Self = Self::new(0, 0, 0, 0);

    /// Colour with an explicit brightness (0-100, used by the 8-Angle only).
    pub const fn new(r: u8, g: u8, b: u8, brightness: u8) -> Self {
        Self { r, g, b, brightness }
    }

    /// Colour at full brightness.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, FULL_BRIGHTNESS)
    }

    /// Unpack `0xWWBBGGRR` (brightness in the top byte, red in the bottom).
    pub const fn from_packed(packed: u32) -> Self {
        let [r, g, b, brightness] = packed.to_le_bytes();
        Self { r, g, b, brightness }
    }

    /// Inverse of [`from_packed`](Self::from_packed).
    pub const fn packed(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.brightness])
    }

    /// Register block for an 8-Angle LED: R, G, B, brightness.
    pub(crate) fn angle_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.brightness]
    }

    /// Register block for an 8-Encoder LED: R, G, B.
    pub(crate) fn encoder_bytes(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<u32> for LedColor {
    fn from(packed: u32) -> Self {
        Self::from_packed(packed)
    }
}
