/// Concrete byte order of a multi-byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
	/// Least significant byte first.
	Little,
	/// Most significant byte first.
	Big,
}

impl ByteOrder {
	/// Native byte order of the host CPU.
	#[cfg(target_endian = "little")]
	pub const HOST: ByteOrder = ByteOrder::Little;
	/// Native byte order of the host CPU.
	#[cfg(target_endian = "big")]
	pub const HOST: ByteOrder = ByteOrder::Big;

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Byte-order policy attached to a field or to ambient settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
	/// Always big-endian.
	Big,
	/// Always little-endian.
	Little,
	/// Host-native order.
	Host,
	/// Defer to `Settings::target_endian`.
	#[default]
	Target,
}

impl Endian {
	/// Resolve to a concrete order against the ambient target default.
	///
	/// A `Target` policy falls through to `target`; a `Target` target
	/// behaves as `Host`.
	pub fn resolve(self, target: Endian) -> ByteOrder {
		match self {
			Self::Big => ByteOrder::Big,
			Self::Little => ByteOrder::Little,
			Self::Host => ByteOrder::HOST,
			Self::Target => match target {
				Endian::Big => ByteOrder::Big,
				Endian::Little => ByteOrder::Little,
				_ => ByteOrder::HOST,
			},
		}
	}
}
