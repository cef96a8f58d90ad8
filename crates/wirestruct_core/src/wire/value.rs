use crate::wire::instance::StructValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	U64(u64),
	I64(i64),
	F32(f32),
	F64(f64),
	Enum(EnumValue),
	Bytes(Vec<u8>),
	List(Vec<Value>),
	Struct(StructValue),
}

/// A named enum literal. Literals compare by numeric value.
#[derive(Debug, Clone)]
pub struct EnumValue {
	pub name: Box<str>,
	pub value: i128,
}

impl PartialEq for EnumValue {
	fn eq(&self, other: &Self) -> bool {
		self.value == other.value
	}
}

impl Value {
	/// Logical kind label used in error reports.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::U64(_) => "u64",
			Self::I64(_) => "i64",
			Self::F32(_) => "f32",
			Self::F64(_) => "f64",
			Self::Enum(_) => "enum",
			Self::Bytes(_) => "bytes",
			Self::List(_) => "list",
			Self::Struct(_) => "struct",
		}
	}

	pub fn as_u64(&self) -> Option<u64> {
		match self {
			Self::U64(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::I64(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::Bytes(bytes) => Some(bytes),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_struct(&self) -> Option<&StructValue> {
		match self {
			Self::Struct(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_enum(&self) -> Option<&EnumValue> {
		match self {
			Self::Enum(literal) => Some(literal),
			_ => None,
		}
	}

	/// Widened integer payload for integer-carrying values.
	pub(crate) fn as_int(&self) -> Option<i128> {
		match self {
			Self::U64(value) => Some(i128::from(*value)),
			Self::I64(value) => Some(i128::from(*value)),
			Self::Enum(literal) => Some(literal.value),
			_ => None,
		}
	}
}
