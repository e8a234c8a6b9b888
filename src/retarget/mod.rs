pub(crate) mod continuity;
pub(crate) mod keypoint;
pub(crate) mod mapper;
pub(crate) mod smooth;
