use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, WireError>;

/// Errors produced while building descriptors and moving values across the wire.
#[derive(Debug, Error)]
pub enum WireError {
	/// Input shorter than a read required.
	#[error("short buffer: need {need} bytes, have {have}")]
	ShortBuffer {
		/// Bytes required by the read.
		need: usize,
		/// Bytes actually available.
		have: usize,
	},
	/// Fixed-size descriptor handed more bytes than its layout consumes.
	#[error("trailing bytes after {type_name}: leftover={leftover}")]
	TrailingBytes {
		/// Descriptor type name being parsed.
		type_name: String,
		/// Unconsumed bytes.
		leftover: usize,
	},
	/// Variable array tail is not a whole number of elements.
	#[error("tail misaligned at {path}: {tail_len} bytes, element size {elem_size}")]
	TailAlignment {
		/// Field path from the root aggregate.
		path: String,
		/// Tail buffer length.
		tail_len: usize,
		/// Fixed element byte size.
		elem_size: usize,
	},
	/// Variable array length outside its declared bounds.
	#[error("array length out of range at {path}: len={len}, min={min}, max={}", .max.map_or(String::from("inf"), |max| max.to_string()))]
	ArrayLengthOutOfRange {
		/// Field path from the root aggregate.
		path: String,
		/// Current element count.
		len: usize,
		/// Declared lower bound.
		min: usize,
		/// Declared upper bound, unbounded when absent.
		max: Option<usize>,
	},
	/// Fixed array value longer than the declared element count.
	#[error("array overflow at {path}: len={len}, capacity={capacity}")]
	ArrayOverflow {
		/// Field path from the root aggregate.
		path: String,
		/// Current element count.
		len: usize,
		/// Declared element count.
		capacity: usize,
	},
	/// Integer has no symbolic mapping in the enumeration.
	#[error("unknown literal {value} for enum {enum_name} at {path}")]
	UnknownEnumLiteral {
		/// Field path from the root aggregate.
		path: String,
		/// Enumeration type name.
		enum_name: String,
		/// Unmapped integer literal.
		value: i128,
	},
	/// Integer value outside the encodable range of its scalar kind.
	#[error("value out of range at {path}: {value} does not fit {kind}")]
	ValueOutOfRange {
		/// Field path from the root aggregate.
		path: String,
		/// Offending value rendering.
		value: String,
		/// Scalar kind name.
		kind: &'static str,
	},
	/// Runtime value kind does not match the declared field type.
	#[error("type mismatch at {path}: expected {expected}, got {got}")]
	ValueTypeMismatch {
		/// Field path from the root aggregate.
		path: String,
		/// Expected logical value kind.
		expected: String,
		/// Actual logical value kind.
		got: String,
	},
	/// A validator rejected a field value.
	#[error("invalid value at {path}: {value}")]
	InvalidValue {
		/// Field path from the root aggregate.
		path: String,
		/// Offending value rendering.
		value: String,
	},
	/// A declared default failed its field validator at build time.
	#[error("invalid default for {descriptor}.{field}")]
	InvalidDefault {
		/// Descriptor type name.
		descriptor: String,
		/// Field name.
		field: String,
	},
	/// Referenced field name is not part of the descriptor.
	#[error("unknown field {field} on {descriptor}")]
	UnknownField {
		/// Descriptor type name.
		descriptor: String,
		/// Missing field name.
		field: String,
	},
	/// User validate hook rejected the whole aggregate.
	#[error("validation failed for {descriptor}")]
	ValidationFailed {
		/// Descriptor type name.
		descriptor: String,
	},
	/// Variable-size-tail field declared before the final position.
	#[error("variable-size field {field} must be last in {descriptor}")]
	VariableFieldNotLast {
		/// Descriptor type name.
		descriptor: String,
		/// Offending field name.
		field: String,
	},
	/// Two fields share a name after mixin expansion.
	#[error("duplicate field {field} in {descriptor}")]
	DuplicateField {
		/// Descriptor type name.
		descriptor: String,
		/// Clashing field name.
		field: String,
	},
	/// Array element type is not fixed-size.
	#[error("array element of {descriptor}.{field} is not fixed-size")]
	VariableSizeElement {
		/// Descriptor type name.
		descriptor: String,
		/// Offending field name.
		field: String,
	},
	/// Variable array element encodes to zero bytes.
	#[error("zero-size array element at {field}")]
	ZeroSizeElement {
		/// Qualified field name or path.
		field: String,
	},
	/// Two enum members share a literal value.
	#[error("duplicate literal {value} for {enum_name}.{member}")]
	DuplicateEnumLiteral {
		/// Enumeration type name.
		enum_name: String,
		/// Member declared with the duplicate literal.
		member: String,
		/// Clashing literal value.
		value: i128,
	},
	/// Two enum members share a name.
	#[error("duplicate member {member} in enum {enum_name}")]
	DuplicateEnumMember {
		/// Enumeration type name.
		enum_name: String,
		/// Clashing member name.
		member: String,
	},
	/// Enum literal does not fit the underlying scalar.
	#[error("literal {value} for {enum_name}.{member} does not fit the underlying scalar")]
	EnumLiteralOutOfRange {
		/// Enumeration type name.
		enum_name: String,
		/// Member carrying the literal.
		member: String,
		/// Out-of-range literal value.
		value: i128,
	},
	/// Enumeration declared without members.
	#[error("enum {enum_name} has no members")]
	EmptyEnum {
		/// Enumeration type name.
		enum_name: String,
	},
	/// Enumeration declared over a float scalar.
	#[error("enum {enum_name} must use an integer underlying scalar")]
	FloatEnumUnderlying {
		/// Enumeration type name.
		enum_name: String,
	},
}
