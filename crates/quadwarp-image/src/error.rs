/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image has a zero width or height.
    #[error("Invalid image dimensions ({0}x{1})")]
    InvalidDimensions(usize, usize),

    /// Error when the image buffer would not fit in addressable memory.
    #[error("Image dimensions ({0}x{1}) exceed the allowed buffer size")]
    DimensionsTooLarge(usize, usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when a palette index has no palette entry.
    #[error("Palette index {0} is out of bounds for a palette of {1} entries")]
    InvalidPaletteIndex(u8, usize),

    /// Error when a parallel execution strategy cannot be honoured.
    #[error("Parallel execution failed: {0}")]
    ParallelError(String),
}
