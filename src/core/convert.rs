//! Conversion of raw cell text into typed values.
//!
//! Every conversion follows one fixed convention, independent of the locale:
//!
//! | Member type          | Accepted text                                               |
//! |----------------------|-------------------------------------------------------------|
//! | text                 | anything, passed through untouched                          |
//! | integers             | optional sign and decimal digits, surrounding blanks ignored |
//! | floating point       | `.` as decimal point, exponent allowed, no group separator  |
//! | boolean              | `true` or `false`, in any ASCII case                        |
//! | date                 | [`DATE_FORMAT`]                                             |
//! | date and time        | one of [`DATE_TIME_FORMATS`]                                |
//! | enum                 | a variant name, in any ASCII case                           |
//!
//! A nullable member (an `Option<_>` field) turns an empty or blank cell into
//! [`Value::Null`] instead of failing.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

/// The accepted layout of date cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The accepted layouts of date-time cells, tried in order.
pub const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// The declared type of a bindable member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberType {
    Text,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Boolean,
    Date,
    DateTime,
    /// An enumeration, given by its variant names.
    Enum(&'static [&'static str]),
    /// A type no converter exists for, given by its name.
    Other(&'static str),
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberType::Text => write!(f, "text"),
            MemberType::Int8 => write!(f, "i8"),
            MemberType::Int16 => write!(f, "i16"),
            MemberType::Int32 => write!(f, "i32"),
            MemberType::Int64 => write!(f, "i64"),
            MemberType::UInt8 => write!(f, "u8"),
            MemberType::UInt16 => write!(f, "u16"),
            MemberType::UInt32 => write!(f, "u32"),
            MemberType::UInt64 => write!(f, "u64"),
            MemberType::Float32 => write!(f, "f32"),
            MemberType::Float64 => write!(f, "f64"),
            MemberType::Boolean => write!(f, "boolean"),
            MemberType::Date => write!(f, "date"),
            MemberType::DateTime => write!(f, "date-time"),
            MemberType::Enum(variants) => write!(f, "enum({})", variants.join("|")),
            MemberType::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A converted cell, ready to be assigned to a member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// The canonical name of an enum variant.
    Enum(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected}: {reason}")]
pub struct ConvertError {
    pub expected: String,
    pub reason: String,
}

impl ConvertError {
    fn new(expected: MemberType, reason: impl Into<String>) -> Self {
        Self {
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }
}

/// The conversion selected for one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Converter {
    target: MemberType,
    nullable: bool,
}

impl Converter {
    /// Selects the converter for `target`, or `None` when the type has no
    /// converter.
    pub fn for_member(target: MemberType, nullable: bool) -> Option<Self> {
        match target {
            MemberType::Other(_) => None,
            _ => Some(Self { target, nullable }),
        }
    }

    pub fn target(&self) -> MemberType {
        self.target
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn convert(&self, raw: &str) -> Result<Value, ConvertError> {
        if self.nullable && raw.trim().is_empty() {
            return Ok(Value::Null);
        }

        match self.target {
            MemberType::Text => Ok(Value::Text(raw.to_owned())),
            MemberType::Int8 => to_signed::<i8>(raw, self.target),
            MemberType::Int16 => to_signed::<i16>(raw, self.target),
            MemberType::Int32 => to_signed::<i32>(raw, self.target),
            MemberType::Int64 => to_signed::<i64>(raw, self.target),
            MemberType::UInt8 => to_unsigned::<u8>(raw, self.target),
            MemberType::UInt16 => to_unsigned::<u16>(raw, self.target),
            MemberType::UInt32 => to_unsigned::<u32>(raw, self.target),
            MemberType::UInt64 => to_unsigned::<u64>(raw, self.target),
            MemberType::Float32 => to_float32(raw),
            MemberType::Float64 => to_float64(raw),
            MemberType::Boolean => to_bool(raw),
            MemberType::Date => to_date(raw),
            MemberType::DateTime => to_date_time(raw),
            MemberType::Enum(variants) => to_variant(raw, variants),
            MemberType::Other(_) => Err(ConvertError::new(self.target, "no converter")),
        }
    }
}

fn to_signed<N>(raw: &str, target: MemberType) -> Result<Value, ConvertError>
where
    N: std::str::FromStr<Err = std::num::ParseIntError> + Into<i64>,
{
    raw.trim()
        .parse::<N>()
        .map(|number| Value::Integer(number.into()))
        .map_err(|error| ConvertError::new(target, error.to_string()))
}

fn to_unsigned<N>(raw: &str, target: MemberType) -> Result<Value, ConvertError>
where
    N: std::str::FromStr<Err = std::num::ParseIntError> + Into<u64>,
{
    raw.trim()
        .parse::<N>()
        .map(|number| Value::Unsigned(number.into()))
        .map_err(|error| ConvertError::new(target, error.to_string()))
}

pub fn to_float32(raw: &str) -> Result<Value, ConvertError> {
    let number = raw
        .trim()
        .parse::<f32>()
        .map_err(|error| ConvertError::new(MemberType::Float32, error.to_string()))?;
    finite(f64::from(number), MemberType::Float32)
}

pub fn to_float64(raw: &str) -> Result<Value, ConvertError> {
    let number = raw
        .trim()
        .parse::<f64>()
        .map_err(|error| ConvertError::new(MemberType::Float64, error.to_string()))?;
    finite(number, MemberType::Float64)
}

/// Overflowing text parses to an infinity, so a non-finite result is either
/// out of range or a `NaN`/`inf` literal.
fn finite(number: f64, target: MemberType) -> Result<Value, ConvertError> {
    if number.is_finite() {
        Ok(Value::Float(number))
    } else {
        Err(ConvertError::new(target, "out of range or not a finite number"))
    }
}

pub fn to_bool(raw: &str) -> Result<Value, ConvertError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(Value::Boolean(true))
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(Value::Boolean(false))
    } else {
        Err(ConvertError::new(
            MemberType::Boolean,
            "only true or false are accepted",
        ))
    }
}

pub fn to_date(raw: &str) -> Result<Value, ConvertError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(Value::Date)
        .map_err(|error| ConvertError::new(MemberType::Date, error.to_string()))
}

pub fn to_date_time(raw: &str) -> Result<Value, ConvertError> {
    let trimmed = raw.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(Value::DateTime)
        .ok_or_else(|| {
            ConvertError::new(
                MemberType::DateTime,
                format!("layout must be one of {}", DATE_TIME_FORMATS.join(", ")),
            )
        })
}

pub fn to_variant(raw: &str, variants: &'static [&'static str]) -> Result<Value, ConvertError> {
    let trimmed = raw.trim();
    variants
        .iter()
        .copied()
        .find(|variant| variant.eq_ignore_ascii_case(trimmed))
        .map(Value::Enum)
        .ok_or_else(|| ConvertError::new(MemberType::Enum(variants), "unknown variant"))
}

/// A Rust type that can receive a converted cell.
///
/// The member type decides which converter runs; `from_value` then takes the
/// converted value apart. Implemented for strings, the integer and float
/// primitives, `bool`, `chrono` dates and date-times, and `Option` of any of
/// those. Enums get an implementation through [`cell_enum!`](crate::cell_enum).
pub trait CellValue: Sized {
    fn member_type() -> MemberType;

    fn nullable() -> bool {
        false
    }

    fn from_value(value: Value) -> Option<Self>;
}

impl CellValue for String {
    fn member_type() -> MemberType {
        MemberType::Text
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

macro_rules! integer_cell {
    ($($ty:ty => $member:ident, $variant:ident);* $(;)?) => {
        $(
            impl CellValue for $ty {
                fn member_type() -> MemberType {
                    MemberType::$member
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(number) => <$ty>::try_from(number).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

integer_cell! {
    i8 => Int8, Integer;
    i16 => Int16, Integer;
    i32 => Int32, Integer;
    i64 => Int64, Integer;
    u8 => UInt8, Unsigned;
    u16 => UInt16, Unsigned;
    u32 => UInt32, Unsigned;
    u64 => UInt64, Unsigned;
}

impl CellValue for f32 {
    fn member_type() -> MemberType {
        MemberType::Float32
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(number) => Some(number as f32),
            _ => None,
        }
    }
}

impl CellValue for f64 {
    fn member_type() -> MemberType {
        MemberType::Float64
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(number) => Some(number),
            _ => None,
        }
    }
}

impl CellValue for bool {
    fn member_type() -> MemberType {
        MemberType::Boolean
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Boolean(flag) => Some(flag),
            _ => None,
        }
    }
}

impl CellValue for NaiveDate {
    fn member_type() -> MemberType {
        MemberType::Date
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Date(date) => Some(date),
            _ => None,
        }
    }
}

impl CellValue for NaiveDateTime {
    fn member_type() -> MemberType {
        MemberType::DateTime
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::DateTime(date_time) => Some(date_time),
            _ => None,
        }
    }
}

impl<V: CellValue> CellValue for Option<V> {
    fn member_type() -> MemberType {
        V::member_type()
    }

    fn nullable() -> bool {
        true
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => V::from_value(other).map(Some),
        }
    }
}

/// Implements [`CellValue`] for an enum deriving `strum::VariantNames` and
/// `strum::EnumString`.
///
/// ```
/// use row_binder_rs::{cell_enum, core::convert::{CellValue, MemberType}};
///
/// #[derive(Debug, PartialEq, strum::VariantNames, strum::EnumString)]
/// enum Role {
///     Admin,
///     Member,
/// }
///
/// cell_enum!(Role);
///
/// assert_eq!(Role::member_type(), MemberType::Enum(&["Admin", "Member"]));
/// ```
#[macro_export]
macro_rules! cell_enum {
    ($ty:ty) => {
        impl $crate::core::convert::CellValue for $ty {
            fn member_type() -> $crate::core::convert::MemberType {
                $crate::core::convert::MemberType::Enum(
                    <$ty as $crate::strum::VariantNames>::VARIANTS,
                )
            }

            fn from_value(value: $crate::core::convert::Value) -> Option<Self> {
                match value {
                    $crate::core::convert::Value::Enum(name) => {
                        <$ty as ::std::str::FromStr>::from_str(name).ok()
                    }
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::{CellValue, ConvertError, Converter, MemberType, Value};

    fn convert(target: MemberType, raw: &str) -> Result<Value, ConvertError> {
        Converter::for_member(target, false).unwrap().convert(raw)
    }

    #[test]
    fn text_should_pass_through() {
        assert_eq!(
            convert(MemberType::Text, "  Ada, R. "),
            Ok(Value::Text("  Ada, R. ".to_string()))
        );
        assert_eq!(convert(MemberType::Text, ""), Ok(Value::Text(String::new())));
    }

    #[test]
    fn integers_should_respect_width() {
        assert_eq!(convert(MemberType::Int32, " 36 "), Ok(Value::Integer(36)));
        assert_eq!(convert(MemberType::Int8, "-128"), Ok(Value::Integer(-128)));
        assert!(convert(MemberType::Int8, "128").is_err());
        assert_eq!(convert(MemberType::UInt8, "255"), Ok(Value::Unsigned(255)));
        assert!(convert(MemberType::UInt64, "-1").is_err());
        assert!(convert(MemberType::Int64, "thirty-six").is_err());
        assert!(convert(MemberType::Int64, "").is_err());
        assert!(convert(MemberType::Int64, "1,000").is_err());
    }

    #[test]
    fn floats_should_use_dot_decimal_point() {
        assert_eq!(convert(MemberType::Float64, "3.25"), Ok(Value::Float(3.25)));
        assert_eq!(convert(MemberType::Float64, "1e3"), Ok(Value::Float(1000.0)));
        assert_eq!(convert(MemberType::Float32, "0.5"), Ok(Value::Float(0.5)));
        assert!(convert(MemberType::Float64, "3,25").is_err());
    }

    #[test]
    fn floats_should_be_finite_within_their_width() {
        assert_eq!(
            convert(MemberType::Float32, "3.4e38"),
            Ok(Value::Float(f64::from(3.4e38_f32)))
        );
        assert!(convert(MemberType::Float32, "1e39").is_err());
        assert!(convert(MemberType::Float64, "1e39").is_ok());
        assert!(convert(MemberType::Float64, "1e309").is_err());

        for raw in ["NaN", "inf", "-infinity"] {
            assert!(convert(MemberType::Float32, raw).is_err(), "{raw}");
            assert!(convert(MemberType::Float64, raw).is_err(), "{raw}");
        }

        let error = convert(MemberType::Float32, "1e39").unwrap_err();
        assert_eq!(error.expected, "f32");
    }

    #[test]
    fn booleans_should_accept_fixed_literals_only() {
        assert_eq!(convert(MemberType::Boolean, "TRUE"), Ok(Value::Boolean(true)));
        assert_eq!(convert(MemberType::Boolean, " false"), Ok(Value::Boolean(false)));
        assert!(convert(MemberType::Boolean, "yes").is_err());
        assert!(convert(MemberType::Boolean, "1").is_err());
    }

    #[test]
    fn dates_should_follow_fixed_layouts() {
        let date = NaiveDate::from_ymd_opt(1815, 12, 10).unwrap();
        let noon = date.and_hms_opt(12, 0, 0).unwrap();

        assert_eq!(convert(MemberType::Date, "1815-12-10"), Ok(Value::Date(date)));
        assert!(convert(MemberType::Date, "10/12/1815").is_err());
        assert_eq!(
            convert(MemberType::DateTime, "1815-12-10 12:00:00"),
            Ok(Value::DateTime(noon))
        );
        assert_eq!(
            convert(MemberType::DateTime, "1815-12-10T12:00:00"),
            Ok(Value::DateTime(noon))
        );
        assert!(convert(MemberType::DateTime, "1815-12-10").is_err());
    }

    #[test]
    fn enums_should_match_variant_names_ignoring_case() {
        let target = MemberType::Enum(&["Admin", "Member"]);

        assert_eq!(convert(target, "admin"), Ok(Value::Enum("Admin")));
        assert_eq!(convert(target, "MEMBER"), Ok(Value::Enum("Member")));
        assert!(convert(target, "guest").is_err());
    }

    #[test]
    fn nullable_converter_should_map_blank_to_null() {
        let converter = Converter::for_member(MemberType::Int32, true).unwrap();

        assert_eq!(converter.convert(""), Ok(Value::Null));
        assert_eq!(converter.convert("   "), Ok(Value::Null));
        assert_eq!(converter.convert("4"), Ok(Value::Integer(4)));
        assert!(converter.convert("four").is_err());
    }

    #[test]
    fn other_types_should_have_no_converter() {
        assert_eq!(Converter::for_member(MemberType::Other("Uuid"), false), None);
    }

    #[test]
    fn cell_values_should_describe_their_member_type() {
        assert_eq!(i32::member_type(), MemberType::Int32);
        assert_eq!(<Option<u16>>::member_type(), MemberType::UInt16);
        assert!(<Option<u16>>::nullable());
        assert!(!String::nullable());
        assert_eq!(NaiveDateTime::member_type(), MemberType::DateTime);
    }

    #[test]
    fn cell_values_should_take_converted_values_apart() {
        assert_eq!(i16::from_value(Value::Integer(-3)), Some(-3));
        assert_eq!(u8::from_value(Value::Integer(3)), None);
        assert_eq!(<Option<bool>>::from_value(Value::Null), Some(None));
        assert_eq!(
            <Option<bool>>::from_value(Value::Boolean(true)),
            Some(Some(true))
        );
        assert_eq!(f64::from_value(Value::Float(1.5)), Some(1.5));
    }

    #[test]
    fn errors_should_name_expected_type() {
        let error = convert(MemberType::Boolean, "maybe").unwrap_err();

        assert_eq!(error.expected, "boolean");
        assert_eq!(
            error.to_string(),
            "expected boolean: only true or false are accepted"
        );
    }
}
