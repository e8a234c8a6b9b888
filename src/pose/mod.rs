pub(crate) mod interpolate;
pub(crate) mod model;
pub(crate) mod normalize;
