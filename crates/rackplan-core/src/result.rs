use crate::error::RackError;

pub type RackResult<T> = Result<T, RackError>;
