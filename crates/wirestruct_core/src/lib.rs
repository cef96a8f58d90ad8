//! Declarative binary layouts for hand-crafted protocols and file formats.

/// Descriptor model, layout rules, and the wire (de)serialization engine.
pub mod wire;
