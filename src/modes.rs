pub(crate) mod mistakes;
pub(crate) mod practice;
