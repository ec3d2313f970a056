//! Decoder configuration.

/// Default maximum container nesting depth.
///
/// The top-level value sits at depth 0. The encoder applies no limit, so a
/// value nested deeper than this encodes fine but needs a decoder built with
/// a larger [`max_depth`](DecodeOptionsBuilder::max_depth) to read it back.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How byte-string payloads are delivered by the decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringMode {
    /// Deliver payloads as `Value::Bytes`.
    #[default]
    Bytes,
    /// Deliver payloads as `Value::Text`; invalid UTF-8 is an error.
    Text,
}

/// Construction-time options for a [`Decoder`](super::Decoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub(crate) string_mode: StringMode,
    pub(crate) max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            string_mode: StringMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Creates a builder starting from the defaults.
    pub fn builder() -> DecodeOptionsBuilder {
        DecodeOptionsBuilder {
            options: Self::default(),
        }
    }

    pub fn string_mode(&self) -> StringMode {
        self.string_mode
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Builder for [`DecodeOptions`].
#[derive(Debug, Clone)]
pub struct DecodeOptionsBuilder {
    options: DecodeOptions,
}

impl DecodeOptionsBuilder {
    /// Sets how string payloads are delivered.
    pub fn string_mode(mut self, mode: StringMode) -> Self {
        self.options.string_mode = mode;
        self
    }

    /// Shorthand for `string_mode(StringMode::Text)`.
    pub fn decode_as_text(self) -> Self {
        self.string_mode(StringMode::Text)
    }

    /// Sets the maximum container nesting depth. The top-level value is depth 0.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }

    pub fn build(self) -> DecodeOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = DecodeOptions::default();
        assert_eq!(opts.string_mode(), StringMode::Bytes);
        assert_eq!(opts.max_depth(), DEFAULT_MAX_DEPTH);
        assert_eq!(DecodeOptions::builder().build(), opts);
    }

    #[test]
    fn builder_overrides() {
        let opts = DecodeOptions::builder().decode_as_text().max_depth(8).build();
        assert_eq!(opts.string_mode(), StringMode::Text);
        assert_eq!(opts.max_depth(), 8);
    }
}
