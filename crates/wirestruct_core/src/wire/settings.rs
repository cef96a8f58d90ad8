use crate::wire::Endian;

/// Call-scoped serialization settings.
///
/// Entry points read the snapshot they are handed and never consult global
/// state; callers that want ambient defaults pass `Settings::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
	/// Byte order for fields declared with `Endian::Target`.
	///
	/// `Target` here behaves as `Host`.
	pub target_endian: Endian,
	/// Run the validate hook after deserialization.
	pub validate: bool,
	/// Run per-field validators before serialization.
	pub validate_on_serialize: bool,
	/// Suppress serialize hook dispatch.
	pub dry_run: bool,
	/// Reject parsed enum literals with no symbolic mapping.
	///
	/// When cleared, an unmapped literal parses to its raw integer value.
	pub strong_enum_literals: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			target_endian: Endian::Host,
			validate: true,
			validate_on_serialize: false,
			dry_run: false,
			strong_enum_literals: true,
		}
	}
}

impl Settings {
	/// Preset with a big-endian target order.
	pub fn big_endian() -> Self {
		Self {
			target_endian: Endian::Big,
			..Self::default()
		}
	}

	/// Preset with a little-endian target order.
	pub fn little_endian() -> Self {
		Self {
			target_endian: Endian::Little,
			..Self::default()
		}
	}
}
