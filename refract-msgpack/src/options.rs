/// Options for decoding MessagePack input.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Maximum container nesting depth (default: 256)
    pub max_depth: usize,

    /// Whether bytes after the root value are tolerated (default: false)
    pub allow_trailing_bytes: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            allow_trailing_bytes: false,
        }
    }
}

impl DecodeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum container nesting depth.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Ignore bytes that follow the root value instead of failing.
    pub const fn allow_trailing_bytes(mut self) -> Self {
        self.allow_trailing_bytes = true;
        self
    }
}

/// Options for building MessagePack output.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Bytes reserved up front in each new output buffer (default: 256)
    pub initial_capacity: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
        }
    }
}

impl WriterOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of bytes reserved in each new output buffer.
    pub const fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}
