//! The numeric promotion lattice (§4.1.4), grounded on
//! `cace/amm/numeric.c`'s widest-common-type arithmetic.

use crate::error::{Error, Result};
use crate::ty::AriType;
use crate::value::Primitive;

/// Lattice rank: `BYTE < UINT < INT < UVAST < VAST < REAL32 < REAL64`.
fn rank(t: AriType) -> Option<u8> {
    match t {
        AriType::Byte => Some(0),
        AriType::Uint => Some(1),
        AriType::Int => Some(2),
        AriType::Uvast => Some(3),
        AriType::Vast => Some(4),
        AriType::Real32 => Some(5),
        AriType::Real64 => Some(6),
        _ => None,
    }
}

/// Promotes two numeric types to their common supertype, applying the
/// `(INT, UVAST) -> VAST` exception (signed wins over same-width unsigned).
pub fn promote(a: AriType, b: AriType) -> Result<AriType> {
    let (ra, rb) = (
        rank(a).ok_or_else(|| Error::type_mismatch(format!("{} is not numeric", a.name())))?,
        rank(b).ok_or_else(|| Error::type_mismatch(format!("{} is not numeric", b.name())))?,
    );
    if matches!((a, b), (AriType::Int, AriType::Uvast) | (AriType::Uvast, AriType::Int)) {
        return Ok(AriType::Vast);
    }
    Ok(if ra >= rb { a } else { b })
}

/// Converts a numeric primitive to `target`, applying the stated domain
/// clamp for each builtin (§4.1.1) and round-half-away-from-zero for
/// float-to-integer narrowing.
pub fn convert_numeric(value: &Primitive, target: AriType) -> Result<Primitive> {
    let as_f64 = match value {
        Primitive::U64(v) => *v as f64,
        Primitive::I64(v) => *v as f64,
        Primitive::F64(v) => *v,
        _ => return Err(Error::type_mismatch("value is not numeric")),
    };
    match target {
        AriType::Byte => Ok(Primitive::U64(round_to_i128(as_f64)?.clamp(0, u8::MAX as i128) as u64)),
        AriType::Uint => {
            let v = round_to_i128(as_f64)?;
            if !(0..=u32::MAX as i128).contains(&v) {
                return Err(Error::bad_value("value out of UINT range"));
            }
            Ok(Primitive::U64(v as u64))
        }
        AriType::Uvast => {
            let v = round_to_i128(as_f64)?;
            if v < 0 {
                return Err(Error::bad_value("value out of UVAST range"));
            }
            Ok(Primitive::U64(v as u64))
        }
        AriType::Int => {
            let v = round_to_i128(as_f64)?;
            if !(i32::MIN as i128..=i32::MAX as i128).contains(&v) {
                return Err(Error::bad_value("value out of INT range"));
            }
            Ok(Primitive::I64(v as i64))
        }
        AriType::Vast => Ok(Primitive::I64(round_to_i128(as_f64)?.clamp(i64::MIN as i128, i64::MAX as i128) as i64)),
        AriType::Real32 => Ok(Primitive::F64(as_f64 as f32 as f64)),
        AriType::Real64 => Ok(Primitive::F64(as_f64)),
        other => Err(Error::type_mismatch(format!("{} is not a numeric target type", other.name()))),
    }
}

fn round_to_i128(v: f64) -> Result<i128> {
    if !v.is_finite() {
        return Err(Error::bad_value("cannot convert non-finite float to integer"));
    }
    let rounded = if v >= 0.0 { (v + 0.5).floor() } else { (v - 0.5).ceil() };
    if rounded < i128::MIN as f64 || rounded > i128::MAX as f64 {
        return Err(Error::bad_value("integer conversion overflow"));
    }
    Ok(rounded as i128)
}

/// Tests equality of two numeric primitives after promoting to a common
/// type (§4.1.4, the last sentence): `/INT/1 == /REAL32/1.0`.
#[must_use]
pub fn numeric_eq(a: &Primitive, b: &Primitive, ta: AriType, tb: AriType) -> bool {
    let Ok(common) = promote(ta, tb) else { return false };
    let (Ok(ca), Ok(cb)) = (convert_numeric(a, common), convert_numeric(b, common)) else {
        return false;
    };
    match (ca, cb) {
        (Primitive::U64(x), Primitive::U64(y)) => x == y,
        (Primitive::I64(x), Primitive::I64(y)) => x == y,
        (Primitive::F64(x), Primitive::F64(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_applies_int_uvast_exception() {
        assert_eq!(promote(AriType::Int, AriType::Uvast).unwrap(), AriType::Vast);
        assert_eq!(promote(AriType::Uvast, AriType::Int).unwrap(), AriType::Vast);
    }

    #[test]
    fn promote_picks_higher_rank_otherwise() {
        assert_eq!(promote(AriType::Byte, AriType::Int).unwrap(), AriType::Int);
        assert_eq!(promote(AriType::Real32, AriType::Byte).unwrap(), AriType::Real32);
    }

    #[test]
    fn convert_numeric_rounds_half_away_from_zero() {
        assert_eq!(convert_numeric(&Primitive::F64(2.5), AriType::Int).unwrap(), Primitive::I64(3));
        assert_eq!(convert_numeric(&Primitive::F64(-2.5), AriType::Int).unwrap(), Primitive::I64(-3));
    }

    #[test]
    fn convert_numeric_rejects_out_of_range() {
        assert!(convert_numeric(&Primitive::I64(-1), AriType::Uint).is_err());
        assert!(convert_numeric(&Primitive::F64(1e20), AriType::Int).is_err());
    }

    #[test]
    fn numeric_eq_crosses_promotion() {
        assert!(numeric_eq(&Primitive::I64(1), &Primitive::F64(1.0), AriType::Int, AriType::Real32));
        assert!(!numeric_eq(&Primitive::I64(1), &Primitive::F64(1.5), AriType::Int, AriType::Real32));
    }
}
