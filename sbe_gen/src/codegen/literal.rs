/* Literal formatting for schema constants */

use crate::codegen::error::{GeneratorError, GeneratorResult};
use crate::codegen::helpers::primitive_to_rust_type;
use sbe_ir::{PrimitiveType, PrimitiveValue, Token};

/// Formats `value` as a Rust literal of `primitive`.
///
/// | primitive | form |
/// |---|---|
/// | char, int8, int16, uint8, uint16 | `(v as u8)` narrowing cast |
/// | int32, uint32 | `v` |
/// | int64, uint64 | `vi64` / `vu64` |
/// | float | `vf32` |
/// | double | `vf64` |
pub fn generate_literal(
  name: &str,
  primitive: PrimitiveType,
  value: &PrimitiveValue,
) -> GeneratorResult<String> {
  let invalid = || GeneratorError::InvalidConstValue {
    name: name.to_string(),
    primitive,
    value: value.to_string(),
  };

  if !fits(primitive, value) {
    return Err(invalid());
  }

  let rust_type = primitive_to_rust_type(primitive);
  let literal = match primitive {
    PrimitiveType::Char
    | PrimitiveType::Int8
    | PrimitiveType::Int16
    | PrimitiveType::Uint8
    | PrimitiveType::Uint16 => format!("({} as {})", value, rust_type),

    PrimitiveType::Int32 | PrimitiveType::Uint32 => value.to_string(),

    PrimitiveType::Int64 | PrimitiveType::Uint64 => format!("{}{}", value, rust_type),

    PrimitiveType::Float | PrimitiveType::Double => float_literal(value, rust_type),
  };

  Ok(literal)
}

/* Whether `value` is representable in `primitive` without truncation */
fn fits(primitive: PrimitiveType, value: &PrimitiveValue) -> bool {
  let integral = match *value {
    PrimitiveValue::Long(v) => i128::from(v),
    PrimitiveValue::UnsignedLong(v) => i128::from(v),
    PrimitiveValue::Double(v) => {
      return match primitive {
        PrimitiveType::Double => true,
        PrimitiveType::Float => !v.is_finite() || v.abs() <= f64::from(f32::MAX),
        _ => false,
      };
    }
  };

  let (min, max) = match primitive {
    PrimitiveType::Char | PrimitiveType::Uint8 => (0, i128::from(u8::MAX)),
    PrimitiveType::Int8 => (i128::from(i8::MIN), i128::from(i8::MAX)),
    PrimitiveType::Int16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
    PrimitiveType::Uint16 => (0, i128::from(u16::MAX)),
    PrimitiveType::Int32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
    PrimitiveType::Uint32 => (0, i128::from(u32::MAX)),
    PrimitiveType::Int64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
    PrimitiveType::Uint64 => (0, i128::from(u64::MAX)),
    PrimitiveType::Float | PrimitiveType::Double => return true,
  };
  (min..=max).contains(&integral)
}

fn float_literal(value: &PrimitiveValue, rust_type: &str) -> String {
  match value {
    PrimitiveValue::Double(v) if v.is_nan() => format!("{}::NAN", rust_type),
    PrimitiveValue::Double(v) if v.is_infinite() && *v > 0.0 => format!("{}::INFINITY", rust_type),
    PrimitiveValue::Double(v) if v.is_infinite() => format!("{}::NEG_INFINITY", rust_type),
    _ => format!("{}{}", value, rust_type),
  }
}

/// Literal of a token's declared constant. A token without one (a CONSTANT
/// field, VALID_VALUE or CHOICE missing its value) is a malformed IR.
pub fn literal_for_token(token: &Token) -> GeneratorResult<String> {
  let encoding = token.encoding()?;
  let value = encoding.const_val.as_ref().ok_or_else(|| GeneratorError::MissingConstValue {
    signal: token.signal,
    name: token.name.clone(),
  })?;
  generate_literal(&token.name, encoding.primitive_type, value)
}

/// Raw base value of a token's constant, usable as a `match` pattern.
pub fn raw_const_value(token: &Token) -> GeneratorResult<&PrimitiveValue> {
  token.const_val()?.ok_or_else(|| GeneratorError::MissingConstValue {
    signal: token.signal,
    name: token.name.clone(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use sbe_ir::{Encoding, Signal};

  fn literal(primitive: PrimitiveType, value: PrimitiveValue) -> String {
    generate_literal("c", primitive, &value).unwrap()
  }

  #[test]
  fn test_narrow_types_are_cast() {
    assert_eq!(literal(PrimitiveType::Uint8, PrimitiveValue::Long(7)), "(7 as u8)");
    assert_eq!(literal(PrimitiveType::Int8, PrimitiveValue::Long(-7)), "(-7 as i8)");
    assert_eq!(literal(PrimitiveType::Uint16, PrimitiveValue::Long(9000)), "(9000 as u16)");
    assert_eq!(literal(PrimitiveType::Int16, PrimitiveValue::Long(1)), "(1 as i16)");
    assert_eq!(literal(PrimitiveType::Char, PrimitiveValue::Long(65)), "(65 as u8)");
  }

  #[test]
  fn test_word_types_are_unsuffixed() {
    assert_eq!(literal(PrimitiveType::Int32, PrimitiveValue::Long(-42)), "-42");
    assert_eq!(literal(PrimitiveType::Uint32, PrimitiveValue::Long(42)), "42");
  }

  #[test]
  fn test_wide_types_take_suffix() {
    assert_eq!(literal(PrimitiveType::Int64, PrimitiveValue::Long(9_000_000_000)), "9000000000i64");
    assert_eq!(
      literal(PrimitiveType::Uint64, PrimitiveValue::UnsignedLong(u64::MAX)),
      "18446744073709551615u64"
    );
  }

  #[test]
  fn test_floating_types_take_precision_suffix() {
    assert_eq!(literal(PrimitiveType::Double, PrimitiveValue::Double(1.5)), "1.5f64");
    assert_eq!(literal(PrimitiveType::Float, PrimitiveValue::Double(1.5)), "1.5f32");
    assert_eq!(literal(PrimitiveType::Double, PrimitiveValue::Long(2)), "2f64");
    assert_eq!(literal(PrimitiveType::Double, PrimitiveValue::Double(f64::NAN)), "f64::NAN");
    assert_eq!(
      literal(PrimitiveType::Float, PrimitiveValue::Double(f64::NEG_INFINITY)),
      "f32::NEG_INFINITY"
    );
  }

  #[test]
  fn test_fractional_value_for_integer_type_is_rejected() {
    let err = generate_literal("x", PrimitiveType::Uint8, &PrimitiveValue::Double(1.5)).unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidConstValue { .. }));

    let err = generate_literal("x", PrimitiveType::Uint32, &PrimitiveValue::Long(-1)).unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidConstValue { .. }));
  }

  fn rejected(primitive: PrimitiveType, value: PrimitiveValue) -> bool {
    matches!(
      generate_literal("x", primitive, &value),
      Err(GeneratorError::InvalidConstValue { .. })
    )
  }

  #[test]
  fn test_value_outside_type_range_is_rejected() {
    assert!(rejected(PrimitiveType::Int32, PrimitiveValue::Long(3_000_000_000)));
    assert!(rejected(PrimitiveType::Int32, PrimitiveValue::Long(i64::from(i32::MIN) - 1)));
    assert!(rejected(PrimitiveType::Uint32, PrimitiveValue::Long(5_000_000_000)));
    assert!(rejected(PrimitiveType::Int64, PrimitiveValue::UnsignedLong(u64::MAX)));
    assert!(rejected(PrimitiveType::Uint8, PrimitiveValue::Long(256)));
    assert!(rejected(PrimitiveType::Char, PrimitiveValue::Long(300)));
    assert!(rejected(PrimitiveType::Int8, PrimitiveValue::Long(-129)));
    assert!(rejected(PrimitiveType::Int16, PrimitiveValue::Long(40_000)));
    assert!(rejected(PrimitiveType::Uint16, PrimitiveValue::Long(65_536)));
    assert!(rejected(PrimitiveType::Float, PrimitiveValue::Double(1e300)));
  }

  #[test]
  fn test_range_limits_are_accepted() {
    assert_eq!(literal(PrimitiveType::Int32, PrimitiveValue::Long(i64::from(i32::MIN))), "-2147483648");
    assert_eq!(literal(PrimitiveType::Uint32, PrimitiveValue::Long(i64::from(u32::MAX))), "4294967295");
    assert_eq!(
      literal(PrimitiveType::Int64, PrimitiveValue::UnsignedLong(i64::MAX as u64)),
      "9223372036854775807i64"
    );
    assert_eq!(literal(PrimitiveType::Uint8, PrimitiveValue::Long(255)), "(255 as u8)");
    assert_eq!(literal(PrimitiveType::Float, PrimitiveValue::Double(f64::INFINITY)), "f32::INFINITY");
    assert!(literal(PrimitiveType::Double, PrimitiveValue::Double(1e300)).ends_with("f64"));
  }

  #[test]
  fn test_enum_code_outside_encoding_is_rejected() {
    let token = Token::new(Signal::ValidValue, "Big")
      .with_encoding(Encoding::new(PrimitiveType::Uint8).with_const_val(PrimitiveValue::Long(256)));
    assert!(matches!(literal_for_token(&token), Err(GeneratorError::InvalidConstValue { .. })));
  }

  #[test]
  fn test_constant_token_without_value_is_rejected() {
    let token = Token::new(Signal::ValidValue, "A").with_encoding(Encoding::new(PrimitiveType::Uint8));
    assert!(matches!(
      literal_for_token(&token),
      Err(GeneratorError::MissingConstValue { signal: Signal::ValidValue, .. })
    ));
  }
}
