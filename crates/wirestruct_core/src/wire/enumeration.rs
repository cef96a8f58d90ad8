use std::sync::Arc;

use crate::wire::bytes::Cursor;
use crate::wire::value::EnumValue;
use crate::wire::{Result, Scalar, Settings, Value, WireError};

/// A named enumeration backed by an integer scalar.
#[derive(Debug)]
pub struct EnumType {
	name: Box<str>,
	underlying: Scalar,
	members: Vec<EnumMember>,
}

/// One declared enum member.
#[derive(Debug, Clone)]
pub struct EnumMember {
	/// Symbolic member name.
	pub name: Box<str>,
	/// Integer literal carried on the wire.
	pub value: i128,
}

impl EnumType {
	/// Start building an enum over the default `u32` underlying scalar.
	pub fn build(name: &str) -> EnumBuilder {
		Self::build_with(name, Scalar::u32())
	}

	/// Start building an enum over an explicit underlying scalar.
	pub fn build_with(name: &str, underlying: Scalar) -> EnumBuilder {
		EnumBuilder {
			name: name.into(),
			underlying,
			members: Vec::new(),
		}
	}

	/// Enumeration type name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Underlying integer scalar.
	pub fn underlying(&self) -> Scalar {
		self.underlying
	}

	/// Members in declaration order.
	pub fn members(&self) -> &[EnumMember] {
		&self.members
	}

	/// Literal value for a member name.
	pub fn literal(&self, member: &str) -> Option<Value> {
		self.member_by_name(member).map(|member| {
			Value::Enum(EnumValue {
				name: member.name.clone(),
				value: member.value,
			})
		})
	}

	/// Look up a member by symbolic name.
	pub fn member_by_name(&self, name: &str) -> Option<&EnumMember> {
		self.members.iter().find(|member| &*member.name == name)
	}

	/// Look up a member by literal value.
	pub fn member_by_value(&self, value: i128) -> Option<&EnumMember> {
		self.members.iter().find(|member| member.value == value)
	}

	/// First declared member as a value.
	pub(crate) fn default_value(&self) -> Value {
		// Construction rejects empty enums.
		let first = &self.members[0];
		Value::Enum(EnumValue {
			name: first.name.clone(),
			value: first.value,
		})
	}

	pub(crate) fn format(&self, value: &Value, settings: &Settings, out: &mut Vec<u8>, path: &str) -> Result<()> {
		let Some(literal) = value.as_int() else {
			return Err(WireError::ValueTypeMismatch {
				path: path.to_owned(),
				expected: self.name.to_string(),
				got: value.kind_name().to_owned(),
			});
		};

		if self.member_by_value(literal).is_none() {
			return Err(WireError::UnknownEnumLiteral {
				path: path.to_owned(),
				enum_name: self.name.to_string(),
				value: literal,
			});
		}

		self.underlying.format(&self.carrier(literal), settings, out, path)
	}

	pub(crate) fn parse(&self, cursor: &mut Cursor<'_>, settings: &Settings, path: &str) -> Result<Value> {
		let raw = self.underlying.parse(cursor, settings)?;
		let Some(literal) = raw.as_int() else {
			return Err(WireError::ValueTypeMismatch {
				path: path.to_owned(),
				expected: self.name.to_string(),
				got: raw.kind_name().to_owned(),
			});
		};

		match self.member_by_value(literal) {
			Some(member) => Ok(Value::Enum(EnumValue {
				name: member.name.clone(),
				value: literal,
			})),
			None if settings.strong_enum_literals => Err(WireError::UnknownEnumLiteral {
				path: path.to_owned(),
				enum_name: self.name.to_string(),
				value: literal,
			}),
			None => Ok(raw),
		}
	}

	/// Integer carrier matching the underlying scalar's signedness.
	fn carrier(&self, literal: i128) -> Value {
		if self.underlying.kind.is_signed() {
			Value::I64(literal as i64)
		} else {
			Value::U64(literal as u64)
		}
	}
}

/// Incremental enum declaration; members keep insertion order.
pub struct EnumBuilder {
	name: Box<str>,
	underlying: Scalar,
	members: Vec<EnumMember>,
}

impl EnumBuilder {
	/// Declare a member with an explicit literal.
	pub fn member(mut self, name: &str, value: i128) -> Self {
		self.members.push(EnumMember {
			name: name.into(),
			value,
		});
		self
	}

	/// Declare a member as predecessor-plus-one, or zero when first.
	pub fn member_auto(self, name: &str) -> Self {
		let value = self.members.last().map_or(0, |member| member.value + 1);
		self.member(name, value)
	}

	/// Check the declaration and freeze it into a shared type.
	pub fn finish(self) -> Result<Arc<EnumType>> {
		if self.underlying.kind.is_float() {
			return Err(WireError::FloatEnumUnderlying {
				enum_name: self.name.to_string(),
			});
		}
		if self.members.is_empty() {
			return Err(WireError::EmptyEnum {
				enum_name: self.name.to_string(),
			});
		}

		let Some((lo, hi)) = self.underlying.kind.int_bounds() else {
			return Err(WireError::FloatEnumUnderlying {
				enum_name: self.name.to_string(),
			});
		};

		for (idx, member) in self.members.iter().enumerate() {
			if member.value < lo || member.value > hi {
				return Err(WireError::EnumLiteralOutOfRange {
					enum_name: self.name.to_string(),
					member: member.name.to_string(),
					value: member.value,
				});
			}

			for earlier in &self.members[..idx] {
				if earlier.name == member.name {
					return Err(WireError::DuplicateEnumMember {
						enum_name: self.name.to_string(),
						member: member.name.to_string(),
					});
				}
				if earlier.value == member.value {
					return Err(WireError::DuplicateEnumLiteral {
						enum_name: self.name.to_string(),
						member: member.name.to_string(),
						value: member.value,
					});
				}
			}
		}

		Ok(Arc::new(EnumType {
			name: self.name,
			underlying: self.underlying,
			members: self.members,
		}))
	}
}
