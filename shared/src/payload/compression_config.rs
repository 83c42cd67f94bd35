/// How payloads are compressed. Both ends of a session must agree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressionConfig {
    pub mode: CompressionMode,
}

impl CompressionConfig {
    pub fn new(mode: CompressionMode) -> Self {
        Self { mode }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            mode: CompressionMode::Default(DEFAULT_COMPRESSION_LEVEL),
        }
    }
}

pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompressionMode {
    /// Compression level; higher is smaller and slower
    Default(i32),
    /// Payload bytes are stored as-is
    None,
}
