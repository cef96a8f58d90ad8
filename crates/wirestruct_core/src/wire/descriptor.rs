use std::fmt;
use std::sync::Arc;

use crate::wire::engine;
use crate::wire::instance::StructValue;
use crate::wire::{FieldType, Result, Settings, Validator, Value, WireError};

/// Size class of a descriptor or field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
	/// Encoded length is a build-time constant.
	Fixed,
	/// Encoded length ends in a value-dependent tail.
	VariableTail,
}

/// One named field of a descriptor.
#[derive(Debug, Clone)]
pub struct Field {
	name: Box<str>,
	ty: FieldType,
	default: Value,
	validator: Option<Validator>,
	offset: usize,
}

impl Field {
	/// Field name after mixin expansion.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared field type.
	pub fn ty(&self) -> &FieldType {
		&self.ty
	}

	/// Default value new instances start from.
	pub fn default(&self) -> &Value {
		&self.default
	}

	/// Optional boundary validator.
	pub fn validator(&self) -> Option<&Validator> {
		self.validator.as_ref()
	}

	/// Byte offset within the fixed prefix; the tail field starts at the
	/// end of the prefix.
	pub fn offset(&self) -> usize {
		self.offset
	}
}

/// Hook invoked around serialization; may rewrite fields.
pub type SerializeHook = Arc<dyn Fn(&mut StructValue) + Send + Sync>;
/// Hook replacing default per-field validation.
pub type ValidateHook = Arc<dyn Fn(&StructValue) -> bool + Send + Sync>;

#[derive(Default, Clone)]
pub(crate) struct Hooks {
	pub before_serialize: Option<SerializeHook>,
	pub after_serialize: Option<SerializeHook>,
	pub validate: Option<ValidateHook>,
}

impl fmt::Debug for Hooks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Hooks")
			.field("before_serialize", &self.before_serialize.is_some())
			.field("after_serialize", &self.after_serialize.is_some())
			.field("validate", &self.validate.is_some())
			.finish()
	}
}

/// Immutable description of a packed aggregate: ordered named fields,
/// their defaults and validators, and the derived layout facts.
#[derive(Debug)]
pub struct StructDescriptor {
	name: Box<str>,
	fields: Vec<Field>,
	fixed_size: usize,
	size_class: SizeClass,
	pub(crate) hooks: Hooks,
}

impl StructDescriptor {
	/// Start declaring a descriptor.
	pub fn build(name: &str) -> DescriptorBuilder {
		DescriptorBuilder {
			name: name.into(),
			entries: Vec::new(),
			hooks: Hooks::default(),
		}
	}

	/// Descriptor type name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Fields in declaration order, mixins expanded.
	pub fn fields(&self) -> &[Field] {
		&self.fields
	}

	/// Position of a field by name.
	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|field| &*field.name == name)
	}

	/// Byte size of the fixed prefix; excludes any tail.
	pub fn total_fixed_size(&self) -> usize {
		self.fixed_size
	}

	/// Derived size class.
	pub fn size_class(&self) -> SizeClass {
		self.size_class
	}

	/// Return `true` when the last field is variable-size.
	pub fn is_variable_size(&self) -> bool {
		self.size_class == SizeClass::VariableTail
	}

	/// Byte offset of a field within the fixed prefix.
	pub fn offset_of(&self, name: &str) -> Option<usize> {
		self.field_index(name).map(|idx| self.fields[idx].offset)
	}

	/// New instance populated from field defaults.
	pub fn new_value(self: &Arc<Self>) -> StructValue {
		let values = self.fields.iter().map(|field| field.default.clone()).collect();
		StructValue::from_parts(self.clone(), values)
	}

	/// Parse an instance from `bytes` under default settings.
	pub fn deserialize(self: &Arc<Self>, bytes: &[u8]) -> Result<StructValue> {
		self.deserialize_with(bytes, &Settings::default())
	}

	/// Parse an instance from `bytes` under explicit settings.
	pub fn deserialize_with(self: &Arc<Self>, bytes: &[u8], settings: &Settings) -> Result<StructValue> {
		engine::parse_struct(self, bytes, settings, "")
	}
}

struct Entry {
	name: Box<str>,
	ty: FieldType,
	default: Option<Value>,
	validator: Option<Validator>,
}

/// Incremental descriptor declaration; declaration order is semantic.
pub struct DescriptorBuilder {
	name: Box<str>,
	entries: Vec<Entry>,
	hooks: Hooks,
}

impl DescriptorBuilder {
	/// Declare a field with the type's implicit default.
	pub fn field(self, name: &str, ty: impl Into<FieldType>) -> Self {
		self.push(name, ty.into(), None, None)
	}

	/// Declare a field with an explicit default value.
	pub fn field_default(self, name: &str, ty: impl Into<FieldType>, default: Value) -> Self {
		self.push(name, ty.into(), Some(default), None)
	}

	/// Declare a field guarded by a validator.
	pub fn field_validated(self, name: &str, ty: impl Into<FieldType>, validator: Validator) -> Self {
		self.push(name, ty.into(), None, Some(validator))
	}

	/// Declare a field with every attribute spelled out.
	pub fn field_full(
		self,
		name: &str,
		ty: impl Into<FieldType>,
		default: Option<Value>,
		validator: Option<Validator>,
	) -> Self {
		self.push(name, ty.into(), default, validator)
	}

	/// Inline another descriptor's fields here, optionally name-prefixed.
	///
	/// The target keeps no runtime identity and its hooks are not
	/// inherited.
	pub fn mixin(mut self, desc: &StructDescriptor, prefix: Option<&str>) -> Self {
		for field in desc.fields() {
			let name = match prefix {
				Some(prefix) => format!("{prefix}{}", field.name()).into(),
				None => field.name.clone(),
			};
			self.entries.push(Entry {
				name,
				ty: field.ty.clone(),
				default: Some(field.default.clone()),
				validator: field.validator.clone(),
			});
		}
		self
	}

	/// Install the pre-serialization hook.
	pub fn before_serialize(mut self, hook: impl Fn(&mut StructValue) + Send + Sync + 'static) -> Self {
		self.hooks.before_serialize = Some(Arc::new(hook));
		self
	}

	/// Install the post-serialization hook.
	pub fn after_serialize(mut self, hook: impl Fn(&mut StructValue) + Send + Sync + 'static) -> Self {
		self.hooks.after_serialize = Some(Arc::new(hook));
		self
	}

	/// Replace default per-field validation with a whole-value hook.
	pub fn validate_with(mut self, hook: impl Fn(&StructValue) -> bool + Send + Sync + 'static) -> Self {
		self.hooks.validate = Some(Arc::new(hook));
		self
	}

	fn push(mut self, name: &str, ty: FieldType, default: Option<Value>, validator: Option<Validator>) -> Self {
		self.entries.push(Entry {
			name: name.into(),
			ty,
			default,
			validator,
		});
		self
	}

	/// Check the declaration and freeze it into a shared descriptor.
	pub fn finish(self) -> Result<Arc<StructDescriptor>> {
		let descriptor = self.name;
		let last = self.entries.len().saturating_sub(1);
		let mut fields: Vec<Field> = Vec::with_capacity(self.entries.len());
		let mut fixed_size = 0_usize;
		let mut size_class = SizeClass::Fixed;

		for (idx, entry) in self.entries.into_iter().enumerate() {
			for earlier in &fields {
				if earlier.name == entry.name {
					return Err(WireError::DuplicateField {
						descriptor: descriptor.to_string(),
						field: entry.name.to_string(),
					});
				}
			}

			check_element_types(&descriptor, &entry.name, &entry.ty)?;

			let offset = fixed_size;
			match entry.ty.fixed_byte_size() {
				Some(size) => fixed_size += size,
				None => {
					if idx != last {
						return Err(WireError::VariableFieldNotLast {
							descriptor: descriptor.to_string(),
							field: entry.name.to_string(),
						});
					}
					size_class = SizeClass::VariableTail;
				}
			}

			let default = match entry.default {
				Some(default) => {
					check_default(&descriptor, &entry.name, &entry.ty, entry.validator.as_ref(), &default)?;
					default
				}
				None => entry.ty.default_value(),
			};

			fields.push(Field {
				name: entry.name,
				ty: entry.ty,
				default,
				validator: entry.validator,
				offset,
			});
		}

		Ok(Arc::new(StructDescriptor {
			name: descriptor,
			fields,
			fixed_size,
			size_class,
			hooks: self.hooks,
		}))
	}
}

fn check_element_types(descriptor: &str, field: &str, ty: &FieldType) -> Result<()> {
	let elem = match ty {
		FieldType::Array { elem, .. } => elem,
		FieldType::VarArray { elem, .. } => elem,
		_ => return Ok(()),
	};

	match elem.fixed_byte_size() {
		None => Err(WireError::VariableSizeElement {
			descriptor: descriptor.to_owned(),
			field: field.to_owned(),
		}),
		Some(0) if matches!(ty, FieldType::VarArray { .. }) => Err(WireError::ZeroSizeElement {
			field: format!("{descriptor}.{field}"),
		}),
		Some(_) => check_element_types(descriptor, field, elem),
	}
}

/// An explicit default must pass the field validator and must actually be
/// encodable as the declared type.
fn check_default(
	descriptor: &str,
	field: &str,
	ty: &FieldType,
	validator: Option<&Validator>,
	default: &Value,
) -> Result<()> {
	if let Some(validator) = validator {
		if !validator.check(default) {
			return Err(WireError::InvalidDefault {
				descriptor: descriptor.to_owned(),
				field: field.to_owned(),
			});
		}
	}

	let probe = Settings {
		dry_run: true,
		..Settings::default()
	};
	let mut scratch = Vec::new();
	let mut value = default.clone();
	engine::format_value(&mut scratch, ty, &mut value, &probe, field).map_err(|_| WireError::InvalidDefault {
		descriptor: descriptor.to_owned(),
		field: field.to_owned(),
	})?;
	Ok(())
}
