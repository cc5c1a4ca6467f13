//! Tests for the primitive codec
