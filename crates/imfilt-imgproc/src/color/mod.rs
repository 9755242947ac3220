mod adjust;
pub use adjust::*;

mod gray;
pub use gray::*;

/// How the three RGB channels are weighted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelWeights {
    /// Perceptual luminance weights: Y = 0.299 * R + 0.587 * G + 0.114 * B.
    #[default]
    Luminance,
    /// Equal weights: the plain average for grayscale, the same percentage for every channel.
    Uniform,
}

impl From<bool> for ChannelWeights {
    /// `true` selects [`ChannelWeights::Luminance`].
    fn from(use_luminance: bool) -> Self {
        if use_luminance {
            ChannelWeights::Luminance
        } else {
            ChannelWeights::Uniform
        }
    }
}

/// Define the RGB weights for the luminance.
pub(crate) const RW: f64 = 0.299;
pub(crate) const GW: f64 = 0.587;
pub(crate) const BW: f64 = 0.114;
