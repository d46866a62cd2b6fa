mod ops;
mod tree;

pub(crate) use ops::Op;
