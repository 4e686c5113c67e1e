pub(crate) mod try_on;
