use std::sync::Arc;

use crate::wire::bytes::Cursor;
use crate::wire::descriptor::StructDescriptor;
use crate::wire::instance::StructValue;
use crate::wire::{FieldType, Result, Settings, Value, WireError};

/// Serialize a whole instance into a fresh buffer.
pub(crate) fn serialize_value(value: &mut StructValue, settings: &Settings) -> Result<Vec<u8>> {
	let mut out = Vec::with_capacity(value.size());
	serialize_into(value, &mut out, settings, "")?;
	Ok(out)
}

/// Serialize an instance into `out`, dispatching its descriptor's hooks.
fn serialize_into(value: &mut StructValue, out: &mut Vec<u8>, settings: &Settings, path: &str) -> Result<()> {
	let desc = value.descriptor().clone();

	if !settings.dry_run {
		if let Some(hook) = desc.hooks.before_serialize.clone() {
			hook(value);
		}
	}

	if settings.validate_on_serialize {
		run_field_validators(value, path)?;
	}

	for (idx, field) in desc.fields().iter().enumerate() {
		let field_path = join_path(path, field.name());
		format_value(out, field.ty(), &mut value.values_mut()[idx], settings, &field_path)?;
	}

	if !settings.dry_run {
		if let Some(hook) = desc.hooks.after_serialize.clone() {
			hook(value);
		}
	}

	Ok(())
}

/// Encode one value of the given field type onto `out`.
pub(crate) fn format_value(
	out: &mut Vec<u8>,
	ty: &FieldType,
	value: &mut Value,
	settings: &Settings,
	path: &str,
) -> Result<()> {
	match ty {
		FieldType::Scalar(scalar) => scalar.format(value, settings, out, path),
		FieldType::Enum(enumeration) => enumeration.format(value, settings, out, path),
		FieldType::Array { elem, len } => format_array(out, elem, *len, value, settings, path),
		FieldType::VarArray { elem, min, max } => format_tail(out, elem, *min, *max, value, settings, path),
		FieldType::Struct(desc) => {
			let Value::Struct(nested) = value else {
				return Err(mismatch(path, desc.name(), value));
			};
			if !Arc::ptr_eq(desc, nested.descriptor()) {
				return Err(WireError::ValueTypeMismatch {
					path: path.to_owned(),
					expected: desc.name().to_owned(),
					got: nested.descriptor().name().to_owned(),
				});
			}
			serialize_into(nested, out, settings, path)
		}
		FieldType::Pad { len } => {
			let Value::Bytes(bytes) = value else {
				return Err(mismatch(path, "bytes", value));
			};
			let take = bytes.len().min(*len);
			out.extend_from_slice(&bytes[..take]);
			out.resize(out.len() + (*len - take), 0);
			Ok(())
		}
	}
}

fn format_array(
	out: &mut Vec<u8>,
	elem: &FieldType,
	len: usize,
	value: &mut Value,
	settings: &Settings,
	path: &str,
) -> Result<()> {
	match value {
		Value::Bytes(bytes) if elem.is_byte() => {
			if bytes.len() > len {
				return Err(WireError::ArrayOverflow {
					path: path.to_owned(),
					len: bytes.len(),
					capacity: len,
				});
			}
			out.extend_from_slice(bytes);
			out.resize(out.len() + (len - bytes.len()), 0);
			Ok(())
		}
		Value::List(items) => {
			if items.len() > len {
				return Err(WireError::ArrayOverflow {
					path: path.to_owned(),
					len: items.len(),
					capacity: len,
				});
			}
			for item in items.iter_mut() {
				format_value(out, elem, item, settings, path)?;
			}
			// Missing slots take the element default's encoding.
			for _ in items.len()..len {
				let mut slot = elem.default_value();
				format_value(out, elem, &mut slot, settings, path)?;
			}
			Ok(())
		}
		other => Err(mismatch(path, "array", other)),
	}
}

fn format_tail(
	out: &mut Vec<u8>,
	elem: &FieldType,
	min: usize,
	max: Option<usize>,
	value: &mut Value,
	settings: &Settings,
	path: &str,
) -> Result<()> {
	match value {
		Value::Bytes(bytes) if elem.is_byte() => {
			check_tail_bounds(bytes.len(), min, max, path)?;
			out.extend_from_slice(bytes);
			Ok(())
		}
		Value::List(items) => {
			check_tail_bounds(items.len(), min, max, path)?;
			for item in items.iter_mut() {
				format_value(out, elem, item, settings, path)?;
			}
			Ok(())
		}
		other => Err(mismatch(path, "array", other)),
	}
}

/// Parse one instance of `desc` from `bytes`.
///
/// A fixed-size descriptor must consume the buffer exactly; a variable
/// one hands everything after the fixed prefix to its tail field.
pub(crate) fn parse_struct(
	desc: &Arc<StructDescriptor>,
	bytes: &[u8],
	settings: &Settings,
	path: &str,
) -> Result<StructValue> {
	if bytes.len() < desc.total_fixed_size() {
		return Err(WireError::ShortBuffer {
			need: desc.total_fixed_size(),
			have: bytes.len(),
		});
	}

	let mut cursor = Cursor::new(bytes);
	let mut values = Vec::with_capacity(desc.fields().len());

	for field in desc.fields() {
		let field_path = join_path(path, field.name());
		let parsed = parse_value(&mut cursor, field.ty(), settings, &field_path)?;
		values.push(coerce_repr(parsed, field.default()));
	}

	if !desc.is_variable_size() && cursor.remaining() > 0 {
		return Err(WireError::TrailingBytes {
			type_name: desc.name().to_owned(),
			leftover: cursor.remaining(),
		});
	}

	let value = StructValue::from_parts(desc.clone(), values);

	if settings.validate {
		validate_struct(&value, path)?;
	}

	Ok(value)
}

fn parse_value(cursor: &mut Cursor<'_>, ty: &FieldType, settings: &Settings, path: &str) -> Result<Value> {
	match ty {
		FieldType::Scalar(scalar) => scalar.parse(cursor, settings),
		FieldType::Enum(enumeration) => enumeration.parse(cursor, settings, path),
		FieldType::Array { elem, len } => {
			if elem.is_byte() {
				return Ok(Value::Bytes(cursor.read_exact(*len)?.to_vec()));
			}
			let mut items = Vec::with_capacity(*len);
			for _ in 0..*len {
				items.push(parse_value(cursor, elem, settings, path)?);
			}
			Ok(Value::List(items))
		}
		FieldType::VarArray { elem, min, max } => parse_tail(cursor.rest(), elem, *min, *max, settings, path),
		FieldType::Struct(desc) => {
			let raw = if desc.is_variable_size() {
				cursor.rest()
			} else {
				cursor.read_exact(desc.total_fixed_size())?
			};
			Ok(Value::Struct(parse_struct(desc, raw, settings, path)?))
		}
		FieldType::Pad { len } => Ok(Value::Bytes(cursor.read_exact(*len)?.to_vec())),
	}
}

/// Divide the remaining tail into whole elements and parse each one.
fn parse_tail(
	tail: &[u8],
	elem: &FieldType,
	min: usize,
	max: Option<usize>,
	settings: &Settings,
	path: &str,
) -> Result<Value> {
	let Some(elem_size) = elem.fixed_byte_size().filter(|size| *size > 0) else {
		return Err(WireError::ZeroSizeElement {
			field: path.to_owned(),
		});
	};

	if tail.len() % elem_size != 0 {
		return Err(WireError::TailAlignment {
			path: path.to_owned(),
			tail_len: tail.len(),
			elem_size,
		});
	}

	let count = tail.len() / elem_size;
	check_tail_bounds(count, min, max, path)?;

	if elem.is_byte() {
		return Ok(Value::Bytes(tail.to_vec()));
	}

	let mut cursor = Cursor::new(tail);
	let mut items = Vec::with_capacity(count);
	for _ in 0..count {
		items.push(parse_value(&mut cursor, elem, settings, path)?);
	}
	Ok(Value::List(items))
}

/// Validate a whole instance: the descriptor's hook when present,
/// otherwise every field validator, recursing into nested aggregates.
pub(crate) fn validate_struct(value: &StructValue, path: &str) -> Result<()> {
	let desc = value.descriptor();
	if let Some(hook) = &desc.hooks.validate {
		if !hook(value) {
			return Err(WireError::ValidationFailed {
				descriptor: desc.name().to_owned(),
			});
		}
		return Ok(());
	}
	run_field_validators(value, path)
}

fn run_field_validators(value: &StructValue, path: &str) -> Result<()> {
	let desc = value.descriptor();
	for (field, item) in desc.fields().iter().zip(value.values()) {
		let field_path = join_path(path, field.name());
		if let Some(validator) = field.validator() {
			if !validator.check(item) {
				return Err(WireError::InvalidValue {
					path: field_path,
					value: format!("{item:?}"),
				});
			}
		}
		if let Value::Struct(nested) = item {
			validate_struct(nested, &field_path)?;
		}
	}
	Ok(())
}

/// Byte length contributed by a live variable-size tail.
pub(crate) fn tail_size(ty: &FieldType, value: &Value) -> usize {
	match (ty, value) {
		(FieldType::VarArray { .. }, Value::Bytes(bytes)) => bytes.len(),
		(FieldType::VarArray { elem, .. }, Value::List(items)) => {
			items.len() * elem.fixed_byte_size().unwrap_or(0)
		}
		(FieldType::Struct(_), Value::Struct(nested)) => nested.size(),
		_ => 0,
	}
}

fn check_tail_bounds(count: usize, min: usize, max: Option<usize>, path: &str) -> Result<()> {
	if count < min || max.is_some_and(|max| count > max) {
		return Err(WireError::ArrayLengthOutOfRange {
			path: path.to_owned(),
			len: count,
			min,
			max,
		});
	}
	Ok(())
}

/// Parsed byte runs follow the field's declared representation: a field
/// whose default is a list reads back as a per-element list.
fn coerce_repr(parsed: Value, declared: &Value) -> Value {
	match (parsed, declared) {
		(Value::Bytes(bytes), Value::List(_)) => {
			Value::List(bytes.iter().map(|byte| Value::U64(u64::from(*byte))).collect())
		}
		(parsed, _) => parsed,
	}
}

fn mismatch(path: &str, expected: &str, got: &Value) -> WireError {
	WireError::ValueTypeMismatch {
		path: path.to_owned(),
		expected: expected.to_owned(),
		got: got.kind_name().to_owned(),
	}
}

fn join_path(prefix: &str, name: &str) -> String {
	if prefix.is_empty() {
		name.to_owned()
	} else {
		format!("{prefix}.{name}")
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use crate::wire::descriptor::StructDescriptor;
	use crate::wire::{FieldType, Scalar, Settings, Validator, Value, WireError};

	fn packet() -> Arc<StructDescriptor> {
		StructDescriptor::build("Packet")
			.field("n", Scalar::u16().le())
			.field("tail", FieldType::var_array(Scalar::u8(), 0, None))
			.finish()
			.expect("descriptor builds")
	}

	#[test]
	fn short_fixed_arrays_are_padded_with_defaults() {
		let desc = StructDescriptor::build("Record")
			.field("payload", FieldType::array(Scalar::u8(), 6))
			.finish()
			.expect("descriptor builds");

		let mut value = desc.new_value();
		value.set("payload", Value::Bytes(vec![1, 2, 3])).expect("set succeeds");
		assert_eq!(value.serialize().expect("serialize succeeds"), [1, 2, 3, 0, 0, 0]);
	}

	#[test]
	fn short_element_lists_are_padded_with_defaults() {
		let desc = StructDescriptor::build("Record")
			.field("words", FieldType::array(Scalar::u16().le(), 3))
			.finish()
			.expect("descriptor builds");

		let mut value = desc.new_value();
		value
			.set("words", Value::List(vec![Value::U64(0x0102)]))
			.expect("set succeeds");
		assert_eq!(value.serialize().expect("serialize succeeds"), [0x02, 0x01, 0, 0, 0, 0]);
	}

	#[test]
	fn oversized_fixed_arrays_are_rejected() {
		let desc = StructDescriptor::build("Record")
			.field("payload", FieldType::array(Scalar::u8(), 2))
			.finish()
			.expect("descriptor builds");

		let mut value = desc.new_value();
		value.set("payload", Value::Bytes(vec![1, 2, 3])).expect("set succeeds");
		let err = value.serialize().expect_err("three bytes exceed capacity");
		assert!(matches!(err, WireError::ArrayOverflow { len: 3, capacity: 2, .. }));
	}

	#[test]
	fn fixed_parse_rejects_trailing_bytes() {
		let desc = StructDescriptor::build("Record")
			.field("a", Scalar::u8())
			.finish()
			.expect("descriptor builds");

		let err = desc.deserialize(&[1, 2]).expect_err("extra byte should fail");
		assert!(matches!(err, WireError::TrailingBytes { leftover: 1, .. }));
	}

	#[test]
	fn tail_round_trip_recovers_length_from_buffer() {
		let desc = packet();
		let mut value = desc.new_value();
		value.set("n", Value::U64(5)).expect("set succeeds");
		value.set("tail", Value::Bytes(vec![0x41, 0x42, 0x43])).expect("set succeeds");

		let bytes = value.serialize().expect("serialize succeeds");
		assert_eq!(bytes, [0x05, 0x00, 0x41, 0x42, 0x43]);

		let back = desc.deserialize(&bytes).expect("deserialize succeeds");
		assert_eq!(back, value);
	}

	#[test]
	fn misaligned_tail_is_rejected() {
		let desc = StructDescriptor::build("Packet")
			.field("tail", FieldType::var_array(Scalar::u16().le(), 0, None))
			.finish()
			.expect("descriptor builds");

		let err = desc.deserialize(&[1, 2, 3]).expect_err("odd tail should fail");
		assert!(matches!(err, WireError::TailAlignment { tail_len: 3, elem_size: 2, .. }));
	}

	#[test]
	fn tail_bounds_are_enforced_both_ways() {
		let desc = StructDescriptor::build("Packet")
			.field("tail", FieldType::var_array(Scalar::u8(), 2, Some(3)))
			.finish()
			.expect("descriptor builds");

		let err = desc.deserialize(&[1]).expect_err("one element is below the minimum");
		assert!(matches!(err, WireError::ArrayLengthOutOfRange { len: 1, min: 2, .. }));

		let mut value = desc.new_value();
		value.set("tail", Value::Bytes(vec![1, 2, 3, 4])).expect("set succeeds");
		let err = value.serialize().expect_err("four elements exceed the maximum");
		assert!(matches!(err, WireError::ArrayLengthOutOfRange { len: 4, max: Some(3), .. }));
	}

	#[test]
	fn tail_of_nested_structs_round_trips() {
		let point = StructDescriptor::build("Point")
			.field("x", Scalar::u8())
			.field("y", Scalar::u8())
			.finish()
			.expect("point builds");
		let desc = StructDescriptor::build("Path")
			.field("points", FieldType::var_array(FieldType::nested(&point), 0, None))
			.finish()
			.expect("path builds");

		let bytes = [1, 2, 3, 4];
		let value = desc.deserialize(&bytes).expect("deserialize succeeds");
		let points = value.get("points").expect("field exists").as_list().expect("list value");
		assert_eq!(points.len(), 2);

		let first = points[0].as_struct().expect("struct element");
		assert_eq!(first.get("x").expect("field exists"), &Value::U64(1));
		assert_eq!(first.get("y").expect("field exists"), &Value::U64(2));

		let mut value = value;
		assert_eq!(value.serialize().expect("serialize succeeds"), bytes);
	}

	#[test]
	fn nested_fixed_struct_round_trips() {
		let header = StructDescriptor::build("Header")
			.field("kind", Scalar::u8())
			.field("len", Scalar::u16().le())
			.finish()
			.expect("header builds");
		let desc = StructDescriptor::build("Frame")
			.field("header", FieldType::nested(&header))
			.field("crc", Scalar::u8())
			.finish()
			.expect("frame builds");

		let mut value = desc.new_value();
		let mut inner = header.new_value();
		inner.set("kind", Value::U64(2)).expect("set succeeds");
		inner.set("len", Value::U64(0x0304)).expect("set succeeds");
		value.set("header", Value::Struct(inner)).expect("set succeeds");
		value.set("crc", Value::U64(0xAA)).expect("set succeeds");

		let bytes = value.serialize().expect("serialize succeeds");
		assert_eq!(bytes, [2, 0x04, 0x03, 0xAA]);
		assert_eq!(desc.deserialize(&bytes).expect("deserialize succeeds"), value);
	}

	#[test]
	fn foreign_nested_value_is_rejected() {
		let header = StructDescriptor::build("Header")
			.field("kind", Scalar::u8())
			.finish()
			.expect("header builds");
		let imposter = StructDescriptor::build("Header")
			.field("kind", Scalar::u8())
			.finish()
			.expect("imposter builds");
		let desc = StructDescriptor::build("Frame")
			.field("header", FieldType::nested(&header))
			.finish()
			.expect("frame builds");

		let mut value = desc.new_value();
		value.set("header", Value::Struct(imposter.new_value())).expect("set succeeds");
		let err = value.serialize().expect_err("foreign descriptor should fail");
		assert!(matches!(err, WireError::ValueTypeMismatch { .. }));
	}

	#[test]
	fn pad_fields_emit_and_absorb_filler() {
		let desc = StructDescriptor::build("Record")
			.field("a", Scalar::u8())
			.field("gap", FieldType::pad(3))
			.field("b", Scalar::u8())
			.finish()
			.expect("descriptor builds");

		let mut value = desc.new_value();
		value.set("a", Value::U64(1)).expect("set succeeds");
		value.set("b", Value::U64(2)).expect("set succeeds");
		assert_eq!(value.serialize().expect("serialize succeeds"), [1, 0, 0, 0, 2]);

		let back = desc.deserialize(&[1, 9, 9, 9, 2]).expect("deserialize succeeds");
		assert_eq!(back.get("gap").expect("field exists"), &Value::Bytes(vec![9, 9, 9]));
	}

	#[test]
	fn deserialize_runs_field_validators() {
		let desc = StructDescriptor::build("Validated")
			.field_validated("m", Scalar::i8(), Validator::Range { lo: -15, hi: 15 })
			.finish()
			.expect("descriptor builds");

		let err = desc.deserialize(&[0x10]).expect_err("16 is outside the range");
		assert!(matches!(err, WireError::InvalidValue { ref path, .. } if path == "m"));

		let off = Settings {
			validate: false,
			..Settings::default()
		};
		let value = desc.deserialize_with(&[0x10], &off).expect("unvalidated parse succeeds");
		assert_eq!(value.get("m").expect("field exists"), &Value::I64(16));
	}

	#[test]
	fn nested_validator_failures_carry_a_dotted_path() {
		let inner = StructDescriptor::build("Inner")
			.field_validated("m", Scalar::u8(), Validator::Range { lo: 0, hi: 9 })
			.finish()
			.expect("inner builds");
		let desc = StructDescriptor::build("Outer")
			.field("inner", FieldType::nested(&inner))
			.finish()
			.expect("outer builds");

		let err = desc.deserialize(&[100]).expect_err("nested value is out of range");
		assert!(matches!(err, WireError::InvalidValue { ref path, .. } if path == "inner.m"));
	}

	#[test]
	fn serialize_validation_is_opt_in() {
		let desc = StructDescriptor::build("Validated")
			.field_validated("m", Scalar::i8(), Validator::Range { lo: -15, hi: 15 })
			.finish()
			.expect("descriptor builds");

		let mut value = desc.new_value();
		value.set("m", Value::I64(20)).expect("writes are unchecked");
		assert_eq!(value.serialize().expect("serialize succeeds"), [20]);

		let strict = Settings {
			validate_on_serialize: true,
			..Settings::default()
		};
		let err = value.serialize_with(&strict).expect_err("validator rejects 20");
		assert!(matches!(err, WireError::InvalidValue { ref path, .. } if path == "m"));
	}

	#[test]
	fn before_serialize_hook_rewrites_fields() {
		let desc = StructDescriptor::build("Packet")
			.field("n", Scalar::u16().le())
			.field("tail", FieldType::var_array(Scalar::u8(), 0, None))
			.before_serialize(|value| {
				let len = value.get("tail").ok().and_then(|tail| tail.as_bytes().map(<[u8]>::len));
				if let Some(len) = len {
					let _ = value.set("n", Value::U64(len as u64));
				}
			})
			.finish()
			.expect("descriptor builds");

		let mut value = desc.new_value();
		value.set("tail", Value::Bytes(vec![7, 8, 9])).expect("set succeeds");
		let bytes = value.serialize().expect("serialize succeeds");
		assert_eq!(bytes, [3, 0, 7, 8, 9]);
		assert_eq!(value.get("n").expect("field exists"), &Value::U64(3));
	}

	#[test]
	fn dry_run_suppresses_serialize_hooks() {
		let desc = StructDescriptor::build("Packet")
			.field("n", Scalar::u16().le())
			.before_serialize(|value| {
				let _ = value.set("n", Value::U64(0xFFFF));
			})
			.finish()
			.expect("descriptor builds");

		let dry = Settings {
			dry_run: true,
			..Settings::default()
		};
		let mut value = desc.new_value();
		assert_eq!(value.serialize_with(&dry).expect("serialize succeeds"), [0, 0]);
	}

	#[test]
	fn validate_hook_replaces_field_validators() {
		let desc = StructDescriptor::build("Checked")
			.field_validated("m", Scalar::u8(), Validator::AlwaysFalse)
			.validate_with(|_| true)
			.finish()
			.expect("descriptor builds");
		let value = desc.deserialize(&[1]).expect("hook overrides the field validator");
		assert_eq!(value.get("m").expect("field exists"), &Value::U64(1));

		let rejecting = StructDescriptor::build("Checked")
			.field("m", Scalar::u8())
			.validate_with(|_| false)
			.finish()
			.expect("descriptor builds");
		let err = rejecting.deserialize(&[1]).expect_err("hook rejects everything");
		assert!(matches!(err, WireError::ValidationFailed { .. }));
	}

	#[test]
	fn list_representation_follows_the_declared_default() {
		let desc = StructDescriptor::build("Record")
			.field_default(
				"payload",
				FieldType::array(Scalar::u8(), 3),
				Value::List(vec![Value::U64(0), Value::U64(0), Value::U64(0)]),
			)
			.finish()
			.expect("descriptor builds");

		let value = desc.deserialize(&[1, 2, 3]).expect("deserialize succeeds");
		assert_eq!(
			value.get("payload").expect("field exists"),
			&Value::List(vec![Value::U64(1), Value::U64(2), Value::U64(3)])
		);
	}
}
