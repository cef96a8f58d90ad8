mod bytes;
mod descriptor;
mod endian;
mod engine;
mod enumeration;
mod error;
mod field;
mod instance;
mod scalar;
mod settings;
mod validator;
mod value;

/// Descriptor, field, and builder types.
pub use descriptor::{DescriptorBuilder, Field, SerializeHook, SizeClass, StructDescriptor, ValidateHook};
/// Byte-order policy and concrete orders.
pub use endian::{ByteOrder, Endian};
/// Enumeration type and builder.
pub use enumeration::{EnumBuilder, EnumMember, EnumType};
/// Error and result aliases.
pub use error::{Result, WireError};
/// Field type algebra.
pub use field::FieldType;
/// Live descriptor instances.
pub use instance::StructValue;
/// Primitive scalar types.
pub use scalar::{Scalar, ScalarKind};
/// Call-scoped settings snapshot.
pub use settings::Settings;
/// Boundary validators.
pub use validator::Validator;
/// Tagged runtime values.
pub use value::{EnumValue, Value};
