use std::fmt;
use std::sync::Arc;

use crate::wire::Value;

/// A pure accept/reject predicate applied at serialization boundaries.
///
/// Validators never run on direct field writes; the engine consults them
/// when deserializing and, when enabled, before serializing.
#[derive(Clone)]
pub enum Validator {
	/// Accept everything.
	AlwaysTrue,
	/// Reject everything.
	AlwaysFalse,
	/// Inclusive integer range check.
	Range {
		/// Lower bound.
		lo: i128,
		/// Upper bound.
		hi: i128,
	},
	/// Inclusive float range check.
	FloatRange {
		/// Lower bound.
		lo: f64,
		/// Upper bound.
		hi: f64,
	},
	/// Exact expected value.
	ExactValue(Value),
	/// Integer bit-width bound: unsigned `0 <= v < 2^n`, signed
	/// `-2^(n-1) <= v < 2^(n-1)`.
	BitSize(u32),
	/// Membership in an explicit value set.
	InSet(Vec<Value>),
	/// Arbitrary predicate.
	Custom(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl Validator {
	/// Wrap a bare predicate function.
	pub fn custom(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
		Self::Custom(Arc::new(check))
	}

	/// Run the predicate against a decoded value.
	pub fn check(&self, value: &Value) -> bool {
		match self {
			Self::AlwaysTrue => true,
			Self::AlwaysFalse => false,
			Self::Range { lo, hi } => match value {
				Value::F32(v) => (*lo as f64) <= f64::from(*v) && f64::from(*v) <= (*hi as f64),
				Value::F64(v) => (*lo as f64) <= *v && *v <= (*hi as f64),
				other => other.as_int().is_some_and(|v| *lo <= v && v <= *hi),
			},
			Self::FloatRange { lo, hi } => match value {
				Value::F32(v) => *lo <= f64::from(*v) && f64::from(*v) <= *hi,
				Value::F64(v) => *lo <= *v && *v <= *hi,
				_ => false,
			},
			Self::ExactValue(expected) => value == expected,
			Self::BitSize(bits) => match value {
				Value::U64(v) => *bits >= 64 || *v < (1_u64 << bits),
				Value::I64(v) => {
					if *bits == 0 {
						return false;
					}
					if *bits > 64 {
						return true;
					}
					let half = 1_i128 << (bits - 1);
					-half <= i128::from(*v) && i128::from(*v) < half
				}
				_ => false,
			},
			Self::InSet(items) => items.contains(value),
			Self::Custom(check) => check(value),
		}
	}
}

impl fmt::Debug for Validator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::AlwaysTrue => write!(f, "AlwaysTrue"),
			Self::AlwaysFalse => write!(f, "AlwaysFalse"),
			Self::Range { lo, hi } => write!(f, "Range({lo}..={hi})"),
			Self::FloatRange { lo, hi } => write!(f, "FloatRange({lo}..={hi})"),
			Self::ExactValue(expected) => write!(f, "ExactValue({expected:?})"),
			Self::BitSize(bits) => write!(f, "BitSize({bits})"),
			Self::InSet(items) => write!(f, "InSet({items:?})"),
			Self::Custom(_) => write!(f, "Custom(..)"),
		}
	}
}
