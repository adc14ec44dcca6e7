/// Converts lengths and coordinates between document and viewport units.
///
/// The document is whatever space the caller's sizes and corners are declared
/// in (millimetres, user units, points). The viewport is the space the
/// destination raster is laid out in, one viewport unit per output pixel.
pub trait UnitConverter {
    /// Document units to viewport units.
    fn to_viewport(&self, value: f64) -> f64;

    /// Viewport units back to document units.
    fn from_viewport(&self, value: f64) -> f64;
}

/// Document and viewport units are the same.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IdentityUnits;

impl UnitConverter for IdentityUnits {
    fn to_viewport(&self, value: f64) -> f64 {
        value
    }

    fn from_viewport(&self, value: f64) -> f64 {
        value
    }
}

/// One document unit spans `viewport_per_unit` viewport units.
///
/// # Example
///
/// ```
/// use quadwarp::{UniformScale, UnitConverter};
///
/// // 96 dpi viewport over a document in inches
/// let units = UniformScale::new(96.0);
/// assert_eq!(units.to_viewport(0.5), 48.0);
/// assert_eq!(units.from_viewport(48.0), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformScale {
    viewport_per_unit: f64,
}

impl UniformScale {
    /// Create a converter with the given factor.
    pub const fn new(viewport_per_unit: f64) -> Self {
        Self { viewport_per_unit }
    }

    /// Viewport units per document unit.
    pub fn factor(&self) -> f64 {
        self.viewport_per_unit
    }
}

impl UnitConverter for UniformScale {
    fn to_viewport(&self, value: f64) -> f64 {
        value * self.viewport_per_unit
    }

    fn from_viewport(&self, value: f64) -> f64 {
        value / self.viewport_per_unit
    }
}

/// A converter built from a pair of closures.
pub struct FnUnits<F, G> {
    to_viewport: F,
    from_viewport: G,
}

impl<F, G> FnUnits<F, G>
where
    F: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
{
    /// Create a converter from `to_viewport` and its inverse `from_viewport`.
    pub fn new(to_viewport: F, from_viewport: G) -> Self {
        Self {
            to_viewport,
            from_viewport,
        }
    }
}

impl<F, G> UnitConverter for FnUnits<F, G>
where
    F: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
{
    fn to_viewport(&self, value: f64) -> f64 {
        (self.to_viewport)(value)
    }

    fn from_viewport(&self, value: f64) -> f64 {
        (self.from_viewport)(value)
    }
}

impl<U: UnitConverter + ?Sized> UnitConverter for &U {
    fn to_viewport(&self, value: f64) -> f64 {
        (**self).to_viewport(value)
    }

    fn from_viewport(&self, value: f64) -> f64 {
        (**self).from_viewport(value)
    }
}
