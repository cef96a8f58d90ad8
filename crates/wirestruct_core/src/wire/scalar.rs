use crate::wire::bytes::Cursor;
use crate::wire::{ByteOrder, Endian, Result, Settings, Value, WireError};

/// Primitive numeric kinds with fixed encoded widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
	U8,
	I8,
	U16,
	I16,
	U32,
	I32,
	U64,
	I64,
	F32,
	F64,
}

impl ScalarKind {
	/// Encoded width in bytes.
	pub fn width(self) -> usize {
		match self {
			Self::U8 | Self::I8 => 1,
			Self::U16 | Self::I16 => 2,
			Self::U32 | Self::I32 | Self::F32 => 4,
			Self::U64 | Self::I64 | Self::F64 => 8,
		}
	}

	/// Return `true` for the IEEE-754 kinds.
	pub fn is_float(self) -> bool {
		matches!(self, Self::F32 | Self::F64)
	}

	/// Return `true` for two's-complement signed kinds.
	pub fn is_signed(self) -> bool {
		matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
	}

	/// Stable lowercase label.
	pub fn name(self) -> &'static str {
		match self {
			Self::U8 => "u8",
			Self::I8 => "i8",
			Self::U16 => "u16",
			Self::I16 => "i16",
			Self::U32 => "u32",
			Self::I32 => "i32",
			Self::U64 => "u64",
			Self::I64 => "i64",
			Self::F32 => "f32",
			Self::F64 => "f64",
		}
	}

	/// Inclusive integer bounds, `None` for float kinds.
	pub(crate) fn int_bounds(self) -> Option<(i128, i128)> {
		let bounds = match self {
			Self::U8 => (0, i128::from(u8::MAX)),
			Self::I8 => (i128::from(i8::MIN), i128::from(i8::MAX)),
			Self::U16 => (0, i128::from(u16::MAX)),
			Self::I16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
			Self::U32 => (0, i128::from(u32::MAX)),
			Self::I32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
			Self::U64 => (0, i128::from(u64::MAX)),
			Self::I64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
			Self::F32 | Self::F64 => return None,
		};
		Some(bounds)
	}
}

/// A primitive numeric field type with an endian policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
	/// Numeric kind.
	pub kind: ScalarKind,
	/// Byte-order policy.
	pub endian: Endian,
}

impl Scalar {
	/// Target-endian scalar of the given kind.
	pub const fn new(kind: ScalarKind) -> Self {
		Self {
			kind,
			endian: Endian::Target,
		}
	}

	pub const fn u8() -> Self {
		Self::new(ScalarKind::U8)
	}

	pub const fn i8() -> Self {
		Self::new(ScalarKind::I8)
	}

	pub const fn u16() -> Self {
		Self::new(ScalarKind::U16)
	}

	pub const fn i16() -> Self {
		Self::new(ScalarKind::I16)
	}

	pub const fn u32() -> Self {
		Self::new(ScalarKind::U32)
	}

	pub const fn i32() -> Self {
		Self::new(ScalarKind::I32)
	}

	pub const fn u64() -> Self {
		Self::new(ScalarKind::U64)
	}

	pub const fn i64() -> Self {
		Self::new(ScalarKind::I64)
	}

	pub const fn f32() -> Self {
		Self::new(ScalarKind::F32)
	}

	pub const fn f64() -> Self {
		Self::new(ScalarKind::F64)
	}

	/// Pin the policy to little-endian.
	pub const fn le(self) -> Self {
		Self {
			kind: self.kind,
			endian: Endian::Little,
		}
	}

	/// Pin the policy to big-endian.
	pub const fn be(self) -> Self {
		Self {
			kind: self.kind,
			endian: Endian::Big,
		}
	}

	/// Pin the policy to the host-native order.
	pub const fn host(self) -> Self {
		Self {
			kind: self.kind,
			endian: Endian::Host,
		}
	}

	/// Zero value of the kind.
	pub fn default_value(self) -> Value {
		match self.kind {
			ScalarKind::F32 => Value::F32(0.0),
			ScalarKind::F64 => Value::F64(0.0),
			kind if kind.is_signed() => Value::I64(0),
			_ => Value::U64(0),
		}
	}

	pub(crate) fn format(&self, value: &Value, settings: &Settings, out: &mut Vec<u8>, path: &str) -> Result<()> {
		let order = self.endian.resolve(settings.target_endian);

		if self.kind.is_float() {
			return self.format_float(value, order, out, path);
		}

		let raw = match value {
			Value::U64(v) => i128::from(*v),
			Value::I64(v) => i128::from(*v),
			other => {
				return Err(WireError::ValueTypeMismatch {
					path: path.to_owned(),
					expected: self.kind.name().to_owned(),
					got: other.kind_name().to_owned(),
				});
			}
		};

		if let Some((lo, hi)) = self.kind.int_bounds() {
			if raw < lo || raw > hi {
				return Err(WireError::ValueOutOfRange {
					path: path.to_owned(),
					value: raw.to_string(),
					kind: self.kind.name(),
				});
			}
		}

		// Two's-complement bit pattern; the low `width` bytes are the encoding.
		let width = self.kind.width();
		let bytes = (raw as u128).to_le_bytes();
		match order {
			ByteOrder::Little => out.extend_from_slice(&bytes[..width]),
			ByteOrder::Big => out.extend(bytes[..width].iter().rev()),
		}
		Ok(())
	}

	fn format_float(&self, value: &Value, order: ByteOrder, out: &mut Vec<u8>, path: &str) -> Result<()> {
		match (self.kind, value) {
			(ScalarKind::F32, Value::F32(v)) => {
				match order {
					ByteOrder::Little => out.extend_from_slice(&v.to_le_bytes()),
					ByteOrder::Big => out.extend_from_slice(&v.to_be_bytes()),
				}
				Ok(())
			}
			(ScalarKind::F64, Value::F64(v)) => {
				match order {
					ByteOrder::Little => out.extend_from_slice(&v.to_le_bytes()),
					ByteOrder::Big => out.extend_from_slice(&v.to_be_bytes()),
				}
				Ok(())
			}
			(_, other) => Err(WireError::ValueTypeMismatch {
				path: path.to_owned(),
				expected: self.kind.name().to_owned(),
				got: other.kind_name().to_owned(),
			}),
		}
	}

	pub(crate) fn parse(&self, cursor: &mut Cursor<'_>, settings: &Settings) -> Result<Value> {
		let order = self.endian.resolve(settings.target_endian);
		let raw = cursor.read_exact(self.kind.width())?;
		Ok(decode_scalar(self.kind, order, raw))
	}
}

fn decode_scalar(kind: ScalarKind, order: ByteOrder, raw: &[u8]) -> Value {
	let mut le = [0_u8; 8];
	match order {
		ByteOrder::Little => le[..raw.len()].copy_from_slice(raw),
		ByteOrder::Big => {
			for (slot, byte) in le.iter_mut().zip(raw.iter().rev()) {
				*slot = *byte;
			}
		}
	}

	let unsigned = u64::from_le_bytes(le);
	match kind {
		ScalarKind::F32 => Value::F32(f32::from_bits(unsigned as u32)),
		ScalarKind::F64 => Value::F64(f64::from_bits(unsigned)),
		kind if kind.is_signed() => {
			let shift = 64 - kind.width() * 8;
			Value::I64(((unsigned << shift) as i64) >> shift)
		}
		_ => Value::U64(unsigned),
	}
}

#[cfg(test)]
mod tests {
	use super::{Scalar, ScalarKind};
	use crate::wire::bytes::Cursor;
	use crate::wire::{Settings, Value, WireError};

	fn format(scalar: Scalar, value: &Value, settings: &Settings) -> Vec<u8> {
		let mut out = Vec::new();
		scalar.format(value, settings, &mut out, "field").expect("format succeeds");
		out
	}

	#[test]
	fn formats_u32_in_both_orders() {
		let settings = Settings::default();
		let value = Value::U64(0x0102_0304);
		assert_eq!(format(Scalar::u32().be(), &value, &settings), [0x01, 0x02, 0x03, 0x04]);
		assert_eq!(format(Scalar::u32().le(), &value, &settings), [0x04, 0x03, 0x02, 0x01]);
	}

	#[test]
	fn target_policy_follows_settings_order() {
		let value = Value::U64(0x0102_0304);
		assert_eq!(format(Scalar::u32(), &value, &Settings::big_endian()), [0x01, 0x02, 0x03, 0x04]);
		assert_eq!(format(Scalar::u32(), &value, &Settings::little_endian()), [0x04, 0x03, 0x02, 0x01]);
	}

	#[test]
	fn formats_negative_two_complement() {
		let settings = Settings::default();
		assert_eq!(format(Scalar::i8(), &Value::I64(-128), &settings), [0x80]);
		assert_eq!(format(Scalar::i16().le(), &Value::I64(-2), &settings), [0xFE, 0xFF]);
	}

	#[test]
	fn rejects_out_of_range_integer() {
		let mut out = Vec::new();
		let err = Scalar::u8()
			.format(&Value::U64(300), &Settings::default(), &mut out, "field")
			.expect_err("300 does not fit u8");
		assert!(matches!(err, WireError::ValueOutOfRange { kind: "u8", .. }));
	}

	#[test]
	fn rejects_mismatched_value_kind() {
		let mut out = Vec::new();
		let err = Scalar::u8()
			.format(&Value::F32(1.0), &Settings::default(), &mut out, "field")
			.expect_err("float does not fit an integer scalar");
		assert!(matches!(err, WireError::ValueTypeMismatch { .. }));
	}

	#[test]
	fn parses_signed_with_sign_extension() {
		let settings = Settings::default();
		let mut cursor = Cursor::new(&[0xFE, 0xFF]);
		let value = Scalar::i16().le().parse(&mut cursor, &settings).expect("parse succeeds");
		assert_eq!(value, Value::I64(-2));
	}

	#[test]
	fn parses_floats_by_bit_pattern() {
		let settings = Settings::default();
		let bytes = 1.5_f32.to_be_bytes();
		let mut cursor = Cursor::new(&bytes);
		let value = Scalar::f32().be().parse(&mut cursor, &settings).expect("parse succeeds");
		assert_eq!(value, Value::F32(1.5));
	}

	#[test]
	fn parse_requires_full_width() {
		let mut cursor = Cursor::new(&[0x01]);
		let err = Scalar::u32().parse(&mut cursor, &Settings::default()).expect_err("one byte is short");
		assert!(matches!(err, WireError::ShortBuffer { need: 4, have: 1 }));
	}

	#[test]
	fn round_trips_u64_extremes() {
		let settings = Settings::big_endian();
		for value in [0_u64, 1, u64::MAX, 0x8000_0000_0000_0000] {
			let encoded = format(Scalar::u64(), &Value::U64(value), &settings);
			let mut cursor = Cursor::new(&encoded);
			let decoded = Scalar::u64().parse(&mut cursor, &settings).expect("parse succeeds");
			assert_eq!(decoded, Value::U64(value), "value {value:#x}");
		}
	}

	#[test]
	fn width_table_matches_kinds() {
		assert_eq!(ScalarKind::U8.width(), 1);
		assert_eq!(ScalarKind::I16.width(), 2);
		assert_eq!(ScalarKind::F32.width(), 4);
		assert_eq!(ScalarKind::U64.width(), 8);
	}
}
