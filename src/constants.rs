/// How long a transient client notice stays visible
pub const NOTICE_TIMEOUT_SECONDS: u64 = 5;

/// Minimum length of a person's name
pub const MIN_NAME_LENGTH: usize = 3;

/// Minimum length of a phone number, dash included
pub const MIN_NUMBER_LENGTH: usize = 8;
