pub(crate) mod definition;
pub(crate) mod kinematics;
