use std::sync::Arc;

use crate::wire::descriptor::{SizeClass, StructDescriptor};
use crate::wire::enumeration::EnumType;
use crate::wire::{Scalar, ScalarKind, Value};

/// Field type carried by one descriptor entry.
#[derive(Debug, Clone)]
pub enum FieldType {
	/// Primitive numeric scalar.
	Scalar(Scalar),
	/// Named enumeration over an integer scalar.
	Enum(Arc<EnumType>),
	/// Exact-length array; short values are padded with element defaults.
	Array {
		/// Element type; must be fixed-size.
		elem: Box<FieldType>,
		/// Declared element count.
		len: usize,
	},
	/// Bounded variable-length array; only valid as the final field.
	VarArray {
		/// Element type; must be fixed-size.
		elem: Box<FieldType>,
		/// Minimum element count.
		min: usize,
		/// Maximum element count, unbounded when absent.
		max: Option<usize>,
	},
	/// Nested aggregate.
	Struct(Arc<StructDescriptor>),
	/// Data-less padding bytes.
	Pad {
		/// Padding width in bytes.
		len: usize,
	},
}

impl FieldType {
	/// Exact-length array of `len` elements.
	pub fn array(elem: impl Into<FieldType>, len: usize) -> Self {
		Self::Array {
			elem: Box::new(elem.into()),
			len,
		}
	}

	/// Variable-length array bounded by `min..=max` elements.
	pub fn var_array(elem: impl Into<FieldType>, min: usize, max: Option<usize>) -> Self {
		Self::VarArray {
			elem: Box::new(elem.into()),
			min,
			max,
		}
	}

	/// Nested aggregate field.
	pub fn nested(desc: &Arc<StructDescriptor>) -> Self {
		Self::Struct(desc.clone())
	}

	/// Zero-filled padding of `len` bytes.
	pub fn pad(len: usize) -> Self {
		Self::Pad { len }
	}

	/// Encoded byte size when fixed; `None` for variable-size-tail types.
	pub fn fixed_byte_size(&self) -> Option<usize> {
		match self {
			Self::Scalar(scalar) => Some(scalar.kind.width()),
			Self::Enum(enumeration) => Some(enumeration.underlying().kind.width()),
			Self::Array { elem, len } => elem.fixed_byte_size().map(|size| size * len),
			Self::VarArray { .. } => None,
			Self::Struct(desc) => {
				if desc.is_variable_size() {
					None
				} else {
					Some(desc.total_fixed_size())
				}
			}
			Self::Pad { len } => Some(*len),
		}
	}

	/// Return `true` when the encoded size depends on the runtime value.
	pub fn is_variable_size(&self) -> bool {
		self.fixed_byte_size().is_none()
	}

	/// Derived size class.
	pub fn size_class(&self) -> SizeClass {
		if self.is_variable_size() {
			SizeClass::VariableTail
		} else {
			SizeClass::Fixed
		}
	}

	/// Implicit default when a field declares none.
	pub fn default_value(&self) -> Value {
		match self {
			Self::Scalar(scalar) => scalar.default_value(),
			Self::Enum(enumeration) => enumeration.default_value(),
			Self::Array { elem, len } => element_run(elem, *len),
			Self::VarArray { elem, min, .. } => element_run(elem, *min),
			Self::Struct(desc) => Value::Struct(desc.new_value()),
			Self::Pad { len } => Value::Bytes(vec![0; *len]),
		}
	}

	/// Logical kind label used in error reports.
	pub(crate) fn kind_name(&self) -> &'static str {
		match self {
			Self::Scalar(_) => "scalar",
			Self::Enum(_) => "enum",
			Self::Array { .. } => "array",
			Self::VarArray { .. } => "array",
			Self::Struct(_) => "struct",
			Self::Pad { .. } => "bytes",
		}
	}

	/// Return `true` for unsigned byte elements, the opaque-bytes fast path.
	pub(crate) fn is_byte(&self) -> bool {
		matches!(self, Self::Scalar(scalar) if scalar.kind == ScalarKind::U8)
	}
}

fn element_run(elem: &FieldType, count: usize) -> Value {
	if elem.is_byte() {
		return Value::Bytes(vec![0; count]);
	}
	Value::List((0..count).map(|_| elem.default_value()).collect())
}

impl From<Scalar> for FieldType {
	fn from(scalar: Scalar) -> Self {
		Self::Scalar(scalar)
	}
}

impl From<Arc<EnumType>> for FieldType {
	fn from(enumeration: Arc<EnumType>) -> Self {
		Self::Enum(enumeration)
	}
}

impl From<Arc<StructDescriptor>> for FieldType {
	fn from(desc: Arc<StructDescriptor>) -> Self {
		Self::Struct(desc)
	}
}
