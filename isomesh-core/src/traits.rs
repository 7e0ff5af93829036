//! Core traits for isomesh

/// A scalar density field sampled on the integer lattice.
///
/// Implementations must be side-effect free: the same arguments always give
/// the same density. `scale` is an opaque frequency parameter forwarded from
/// the caller; what it means is up to the field.
pub trait DensityFunction {
    /// Density at lattice position `(x, y, z)`
    fn density(&self, x: f32, y: f32, z: f32, scale: f32) -> f32;
}

impl<F> DensityFunction for F
where
    F: Fn(f32, f32, f32, f32) -> f32,
{
    #[inline]
    fn density(&self, x: f32, y: f32, z: f32, scale: f32) -> f32 {
        self(x, y, z, scale)
    }
}
