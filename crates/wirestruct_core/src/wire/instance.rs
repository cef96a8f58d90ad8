use std::sync::Arc;

use crate::wire::descriptor::StructDescriptor;
use crate::wire::engine;
use crate::wire::{Result, Settings, Value, WireError};

/// A live instance of a descriptor: one current value per declared field.
///
/// Field writes are unchecked; validation happens only at the serialize
/// and deserialize boundaries.
#[derive(Debug, Clone)]
pub struct StructValue {
	desc: Arc<StructDescriptor>,
	values: Vec<Value>,
}

impl StructValue {
	pub(crate) fn from_parts(desc: Arc<StructDescriptor>, values: Vec<Value>) -> Self {
		Self { desc, values }
	}

	/// Construct from defaults, then apply explicit field overrides.
	pub fn with_initial(desc: &Arc<StructDescriptor>, overrides: Vec<(&str, Value)>) -> Result<Self> {
		let mut value = desc.new_value();
		for (name, item) in overrides {
			value.set(name, item)?;
		}
		Ok(value)
	}

	/// Descriptor this instance is bound to.
	pub fn descriptor(&self) -> &Arc<StructDescriptor> {
		&self.desc
	}

	/// Read a field by name.
	pub fn get(&self, name: &str) -> Result<&Value> {
		let idx = self.field_index(name)?;
		Ok(&self.values[idx])
	}

	/// Overwrite a field by name. No validator runs here.
	pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
		let idx = self.field_index(name)?;
		self.values[idx] = value;
		Ok(())
	}

	/// Current encoded byte length: the fixed prefix plus any live tail.
	pub fn size(&self) -> usize {
		let mut total = self.desc.total_fixed_size();
		if self.desc.is_variable_size() {
			if let (Some(field), Some(tail)) = (self.desc.fields().last(), self.values.last()) {
				total += engine::tail_size(field.ty(), tail);
			}
		}
		total
	}

	/// Encode under default settings.
	pub fn serialize(&mut self) -> Result<Vec<u8>> {
		self.serialize_with(&Settings::default())
	}

	/// Encode under explicit settings.
	pub fn serialize_with(&mut self, settings: &Settings) -> Result<Vec<u8>> {
		engine::serialize_value(self, settings)
	}

	pub(crate) fn values(&self) -> &[Value] {
		&self.values
	}

	pub(crate) fn values_mut(&mut self) -> &mut [Value] {
		&mut self.values
	}

	fn field_index(&self, name: &str) -> Result<usize> {
		self.desc.field_index(name).ok_or_else(|| WireError::UnknownField {
			descriptor: self.desc.name().to_owned(),
			field: name.to_owned(),
		})
	}
}

impl PartialEq for StructValue {
	/// Instances are equal only when they share a descriptor and every
	/// field compares equal.
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.desc, &other.desc) && self.values == other.values
	}
}
