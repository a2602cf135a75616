//! Property-based tests for the regex algebra and the conversion.
