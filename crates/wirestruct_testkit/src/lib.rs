//! Shared sample descriptors for workspace crates.

use std::sync::Arc;

use wirestruct_core::wire::{EnumType, FieldType, Scalar, StructDescriptor, Validator, Value};

/// `Opcode` enum over `u8`: `KeepAlive = 3`, `Data = 15`.
pub fn opcode_enum() -> Arc<EnumType> {
	EnumType::build_with("Opcode", Scalar::u8())
		.member("KeepAlive", 3)
		.member("Data", 15)
		.finish()
		.expect("opcode enum builds")
}

/// `Header`: opcode defaulting to `Data`, little-endian `data_length`
/// defaulting to 128.
pub fn header_descriptor() -> Arc<StructDescriptor> {
	let opcode = opcode_enum();
	let data = opcode.literal("Data").expect("Data literal exists");
	StructDescriptor::build("Header")
		.field_default("opcode", opcode, data)
		.field_default("data_length", Scalar::u32().le(), Value::U64(128))
		.finish()
		.expect("header descriptor builds")
}

/// `DataPacket`: a nested `Header` followed by a 128-byte payload.
pub fn data_packet_descriptor() -> Arc<StructDescriptor> {
	let header = header_descriptor();
	StructDescriptor::build("DataPacket")
		.field("header", FieldType::nested(&header))
		.field("payload", FieldType::array(Scalar::u8(), 128))
		.finish()
		.expect("data packet descriptor builds")
}

/// `Message`: little-endian `TimeOfDay` and a `DataLength` byte
/// defaulting to 128.
pub fn message_descriptor() -> Arc<StructDescriptor> {
	StructDescriptor::build("Message")
		.field("TimeOfDay", Scalar::u64().le())
		.field_default("DataLength", Scalar::u8(), Value::U64(128))
		.finish()
		.expect("message descriptor builds")
}

/// `Vla`: a little-endian count followed by an unbounded byte tail.
///
/// The count is deliberately not tied to the tail length.
pub fn vla_descriptor() -> Arc<StructDescriptor> {
	StructDescriptor::build("Vla")
		.field("n", Scalar::u16().le())
		.field("tail", FieldType::var_array(Scalar::u8(), 0, None))
		.finish()
		.expect("vla descriptor builds")
}

/// `Validated`: a single `i8` constrained to `-15..=15`.
pub fn validated_descriptor() -> Arc<StructDescriptor> {
	StructDescriptor::build("Validated")
		.field_validated("m", Scalar::i8(), Validator::Range { lo: -15, hi: 15 })
		.finish()
		.expect("validated descriptor builds")
}
