pub(crate) mod player;
pub(crate) mod sample;
pub(crate) mod sink;
