use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("string is too long to be a valid name")]
    TooLong,
    #[error("character '{0}' is not in allowed character set for names")]
    InvalidCharacter(char),
    #[error("thirteenth character in name cannot be a letter that comes after j")]
    InvalidThirteenthCharacter,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AddressError {
    #[error("invalid address hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),
}
