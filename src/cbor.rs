//! The binary (CBOR) codec (§4.2, §6.1).
//!
//! Values pass through a [`ciborium::Value`] tree rather than a direct
//! byte stream: the tree already gives minimal-length integer encoding
//! and definite-length arrays/maps, so only the *shape* that each ARI
//! construct maps to needs to be decided here, not bit-twiddling.
//!
//! One deliberate non-byte-exact corner: CBOR has no variant in
//! `ciborium::Value` for the "undefined" simple value (major 7, value
//! 23), so the undefined primitive round-trips through a private tag
//! ([`UNDEFINED_TAG`]) wrapping `null` instead. No normative test vector
//! in this codec's spec exercises undefined on the wire, so this only
//! affects round-trip fidelity of an in-memory sentinel that is rarely,
//! if ever, deliberately transmitted.

use std::io::Cursor;

use ciborium::value::{Integer, Value};

use crate::buf::Bytes;
use crate::containers::{Ac, Am, Container, ExecSet, Nonce, Report, RptSet, Tbl};
use crate::date::RevisionDate;
use crate::error::{Error, Result};
use crate::idseg::IdSegment;
use crate::params::Params;
use crate::path::ObjectPath;
use crate::time::TimeSpec;
use crate::ty::AriType;
use crate::value::{Ari, Primitive, Reference};

/// Private-use tag marking a wrapped `null` as the undefined primitive
/// rather than the null primitive.
const UNDEFINED_TAG: u64 = 55800;

/// CBOR tag for a "days since the epoch" date (RFC 8943), used to encode
/// a namespace's model-revision date.
const DATE_TAG: u64 = 100;

/// Encodes `ari` to its canonical binary form.
pub fn encode(ari: &Ari) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_into(ari, &mut buf)?;
    Ok(buf)
}

/// Encodes `ari` into any writer, for composition into a larger stream.
pub fn encode_into<W: std::io::Write>(ari: &Ari, writer: &mut W) -> Result<()> {
    let value = encode_value(ari);
    ciborium::into_writer(&value, writer).map_err(|e| Error::decoding(format!("cbor encode: {e}")))
}

/// Decodes one ARI from `bytes`. Trailing bytes beyond the first
/// complete ARI are a decoding error (§4.2).
pub fn decode(bytes: &[u8]) -> Result<Ari> {
    let mut cursor = Cursor::new(bytes);
    let value: Value =
        ciborium::from_reader(&mut cursor).map_err(|e| Error::decoding(format!("cbor decode: {e}")))?;
    if (cursor.position() as usize) != bytes.len() {
        return Err(Error::decoding("excess input after ARI"));
    }
    decode_value(&value)
}

// --- Encoding --------------------------------------------------------

fn encode_value(ari: &Ari) -> Value {
    match ari {
        Ari::Lit(lit) => match lit.ari_type {
            Some(t) => Value::Array(vec![Value::Integer(Integer::from(t.code())), encode_primitive(&lit.value)]),
            None => encode_primitive(&lit.value),
        },
        Ari::Ref(r) => encode_reference(r),
    }
}

fn encode_primitive(p: &Primitive) -> Value {
    match p {
        Primitive::Undefined => Value::Tag(UNDEFINED_TAG, Box::new(Value::Null)),
        Primitive::Null => Value::Null,
        Primitive::Bool(b) => Value::Bool(*b),
        Primitive::U64(v) => Value::Integer(Integer::from(*v)),
        Primitive::I64(v) => Value::Integer(Integer::from(*v)),
        Primitive::F64(v) => Value::Float(*v),
        Primitive::Text(s) => Value::Text(s.clone()),
        Primitive::Bytes(b) => Value::Bytes(b.as_slice().to_vec()),
        Primitive::Timespec(ts) => encode_timespec(*ts),
        Primitive::Other(c) => encode_container(c),
    }
}

fn encode_timespec(ts: TimeSpec) -> Value {
    match ts.as_decimal_fraction() {
        Some((exp, mantissa)) => Value::Array(vec![
            Value::Integer(Integer::from(exp)),
            Value::Integer(Integer::from(mantissa)),
        ]),
        None => Value::Integer(Integer::from(ts.secs)),
    }
}

fn encode_container(c: &Container) -> Value {
    match c {
        Container::Ac(ac) => Value::Array(ac.items.iter().map(encode_value).collect()),
        Container::Am(am) => Value::Map(am.items.iter().map(|(k, v)| (encode_value(k), encode_value(v))).collect()),
        Container::Tbl(tbl) => {
            let mut items = Vec::with_capacity(tbl.items.len() + 1);
            items.push(Value::Integer(Integer::from(tbl.ncols as u64)));
            items.extend(tbl.items.iter().map(encode_value));
            Value::Array(items)
        }
        Container::ExecSet(es) => {
            let mut items = Vec::with_capacity(es.targets.len() + 1);
            items.push(encode_nonce(&es.nonce));
            items.extend(es.targets.iter().map(encode_value));
            Value::Array(items)
        }
        Container::RptSet(rs) => {
            let mut items = Vec::with_capacity(rs.reports.len() + 2);
            items.push(encode_nonce(&rs.nonce));
            items.push(encode_value(&rs.reftime));
            items.extend(rs.reports.iter().map(encode_report));
            Value::Array(items)
        }
    }
}

fn encode_report(r: &Report) -> Value {
    let mut items = Vec::with_capacity(r.items.len() + 2);
    items.push(encode_value(&r.reltime));
    items.push(encode_value(&r.source));
    items.extend(r.items.iter().map(encode_value));
    Value::Array(items)
}

fn encode_nonce(n: &Nonce) -> Value {
    match n {
        Nonce::Null => Value::Null,
        Nonce::Int(v) => Value::Integer(Integer::from(*v)),
        Nonce::Bytes(b) => Value::Bytes(b.as_slice().to_vec()),
    }
}

fn encode_idseg(seg: &Option<IdSegment>) -> Value {
    match seg {
        None | Some(IdSegment::Null) => Value::Null,
        Some(IdSegment::Int(v)) => Value::Integer(Integer::from(*v)),
        Some(IdSegment::Text(s)) => Value::Text(s.clone()),
    }
}

/// `NaiveDate::from_ymd_opt(1970, 1, 1).num_days_from_ce()`, precomputed
/// so the epoch conversion never needs a fallible "this can't fail"
/// construction at runtime.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

fn days_since_unix_epoch(rev: RevisionDate) -> Result<i64> {
    use chrono::{Datelike, NaiveDate};
    let date = NaiveDate::from_ymd_opt(rev.year as i32, rev.month as u32, rev.day as u32)
        .ok_or_else(|| Error::bad_value("invalid model-revision date"))?;
    Ok(date.num_days_from_ce() as i64 - UNIX_EPOCH_DAYS_FROM_CE)
}

fn revision_from_days(days: i64) -> Result<RevisionDate> {
    use chrono::{Datelike, Duration, NaiveDate};
    let epoch = NaiveDate::from_num_days_from_ce_opt(UNIX_EPOCH_DAYS_FROM_CE as i32)
        .ok_or_else(|| Error::bad_value("internal epoch date out of range"))?;
    let date = epoch
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| Error::bad_value("model-revision day count out of range"))?;
    RevisionDate::new(date.year() as u16, date.month() as u8, date.day() as u8)
}

fn encode_reference(r: &Reference) -> Value {
    let mut elements = vec![encode_idseg(&r.path.org_id), encode_idseg(&r.path.model_id)];
    if let Some(rev) = r.path.model_rev {
        let days = days_since_unix_epoch(rev).unwrap_or(0);
        elements.push(Value::Tag(DATE_TAG, Box::new(Value::Integer(Integer::from(days)))));
    }
    elements.push(encode_idseg(&r.path.type_id));
    elements.push(encode_idseg(&r.path.object_id));
    if !r.params.is_none() {
        elements.push(encode_params(&r.params));
    }
    Value::Array(elements)
}

fn encode_params(p: &Params) -> Value {
    match p {
        Params::None => Value::Null,
        Params::Ac(ac) => Value::Array(ac.items.iter().map(encode_value).collect()),
        Params::Am(am) => Value::Map(am.items.iter().map(|(k, v)| (encode_value(k), encode_value(v))).collect()),
    }
}

// --- Decoding ----------------------------------------------------------

fn as_i128(v: &Value) -> Result<i128> {
    match v {
        Value::Integer(i) => Ok((*i).into()),
        _ => Err(Error::decoding("expected a CBOR integer")),
    }
}

fn literal_code(v: &Value) -> Option<i32> {
    let Value::Integer(_) = v else { return None };
    let n = as_i128(v).ok()?;
    let code = i32::try_from(n).ok()?;
    let t = AriType::from_code(code).ok()?;
    t.is_literal().then_some(code)
}

/// Decodes any ARI value (literal or reference) from a CBOR tree node.
pub(crate) fn decode_value(v: &Value) -> Result<Ari> {
    match v {
        Value::Array(arr) => decode_array(arr),
        Value::Map(entries) => decode_untyped_am(entries),
        Value::Integer(_) => {
            let n = as_i128(v)?;
            if let Ok(u) = u64::try_from(n) {
                Ok(Ari::lit_untyped(Primitive::U64(u)))
            } else {
                let i = i64::try_from(n).map_err(|_| Error::decoding("integer literal out of range"))?;
                Ok(Ari::lit_untyped(Primitive::I64(i)))
            }
        }
        Value::Float(f) => Ok(Ari::lit_untyped(Primitive::F64(*f))),
        Value::Text(s) => Ok(Ari::lit_untyped(Primitive::Text(s.clone()))),
        Value::Bytes(b) => Ok(Ari::lit_untyped(Primitive::Bytes(Bytes::copy_from(b)))),
        Value::Bool(b) => Ok(Ari::lit_untyped(Primitive::Bool(*b))),
        Value::Null => Ok(Ari::lit_untyped(Primitive::Null)),
        Value::Tag(UNDEFINED_TAG, _) => Ok(Ari::undefined()),
        Value::Tag(tag, _) => Err(Error::decoding(format!("unsupported CBOR tag {tag}"))),
        _ => Err(Error::decoding("unsupported CBOR value")),
    }
}

fn decode_array(arr: &[Value]) -> Result<Ari> {
    if arr.len() == 2 {
        if let Some(code) = literal_code(&arr[0]) {
            return decode_typed_literal(code, &arr[1]);
        }
    }
    if let Some(ari) = try_decode_reference(arr)? {
        return Ok(ari);
    }
    // Fall back to an untyped AC: a plain array of item encodings.
    let items = arr.iter().map(decode_value).collect::<Result<Vec<_>>>()?;
    Ok(Ari::lit_untyped(Primitive::Other(Container::Ac(Box::new(Ac::new(items))))))
}

fn is_idseg_shaped(v: &Value) -> bool {
    matches!(v, Value::Null | Value::Integer(_) | Value::Text(_))
}

fn decode_idseg(v: &Value) -> Result<Option<IdSegment>> {
    match v {
        Value::Null => Ok(None),
        Value::Integer(_) => Ok(Some(IdSegment::Int(i64::try_from(as_i128(v)?).map_err(|_| {
            Error::decoding("id segment integer out of range")
        })?))),
        Value::Text(s) => Ok(Some(IdSegment::Text(s.clone()))),
        _ => Err(Error::decoding("invalid id segment shape")),
    }
}

/// Attempts to interpret `arr` as an object-reference array, per the
/// 4/5/6-element shapes described in §4.2. Returns `Ok(None)` (not an
/// error) when the shape does not match, so the caller can fall back to
/// the untyped-AC interpretation.
fn try_decode_reference(arr: &[Value]) -> Result<Option<Ari>> {
    if arr.len() < 4 || arr.len() > 6 {
        return Ok(None);
    }
    if !is_idseg_shaped(&arr[0]) || !is_idseg_shaped(&arr[1]) {
        return Ok(None);
    }
    let has_rev = arr.len() >= 5 && matches!(&arr[2], Value::Tag(DATE_TAG, _));
    let has_params = match arr.len() {
        4 => false,
        5 => !has_rev,
        6 => true,
        _ => return Ok(None),
    };
    let (type_idx, object_idx) = if has_rev { (3, 4) } else { (2, 3) };
    if object_idx >= arr.len() || (has_params && type_idx + 2 >= arr.len()) {
        return Ok(None);
    }
    if !is_idseg_shaped(&arr[type_idx]) || !is_idseg_shaped(&arr[object_idx]) {
        return Ok(None);
    }

    let org_id = decode_idseg(&arr[0])?;
    let model_id = decode_idseg(&arr[1])?;
    let model_rev = if has_rev {
        let Value::Tag(DATE_TAG, inner) = &arr[2] else {
            return Ok(None);
        };
        let days = as_i128(inner)?;
        Some(revision_from_days(i64::try_from(days).map_err(|_| Error::decoding("date tag out of range"))?)?)
    } else {
        None
    };
    let type_id = decode_idseg(&arr[type_idx])?;
    let object_id = decode_idseg(&arr[object_idx])?;
    let params = if has_params {
        decode_params(&arr[type_idx + 2])?
    } else {
        Params::None
    };

    Ok(Some(Ari::Ref(Reference::with_params(
        ObjectPath {
            org_id,
            model_id,
            model_rev,
            type_id,
            object_id,
        },
        params,
    ))))
}

fn decode_params(v: &Value) -> Result<Params> {
    match v {
        Value::Array(arr) => {
            let items = arr.iter().map(decode_value).collect::<Result<Vec<_>>>()?;
            Ok(Params::Ac(Ac::new(items)))
        }
        Value::Map(entries) => {
            let mut am = Am::new();
            for (k, v) in entries {
                am.insert(decode_value(k)?, decode_value(v)?)?;
            }
            Ok(Params::Am(am))
        }
        Value::Null => Ok(Params::None),
        _ => Err(Error::decoding("invalid parameter block shape")),
    }
}

fn decode_untyped_am(entries: &[(Value, Value)]) -> Result<Ari> {
    let mut am = Am::new();
    for (k, v) in entries {
        am.insert(decode_value(k)?, decode_value(v)?)?;
    }
    Ok(Ari::lit_untyped(Primitive::Other(Container::Am(Box::new(am)))))
}

fn decode_typed_literal(code: i32, raw: &Value) -> Result<Ari> {
    let t = AriType::from_code(code)?;
    let prim = decode_primitive_for_type(t, raw)?;
    Ari::lit_typed(t, prim)
}

fn decode_primitive_for_type(t: AriType, raw: &Value) -> Result<Primitive> {
    match t {
        AriType::Null => match raw {
            Value::Null => Ok(Primitive::Null),
            _ => Err(Error::decoding("expected null for NULL type")),
        },
        AriType::Bool => match raw {
            Value::Bool(b) => Ok(Primitive::Bool(*b)),
            _ => Err(Error::decoding("expected bool for BOOL type")),
        },
        AriType::Byte | AriType::Uint | AriType::Uvast => {
            let n = as_i128(raw)?;
            let v = u64::try_from(n).map_err(|_| Error::bad_value("negative value for unsigned type"))?;
            Ok(Primitive::U64(v))
        }
        AriType::Int | AriType::Vast => {
            let n = as_i128(raw)?;
            let v = i64::try_from(n).map_err(|_| Error::bad_value("integer out of i64 range"))?;
            Ok(Primitive::I64(v))
        }
        AriType::Aritype => {
            let n = as_i128(raw)?;
            let v = i64::try_from(n).map_err(|_| Error::bad_value("ARITYPE code out of range"))?;
            Ok(Primitive::I64(v))
        }
        AriType::Real32 | AriType::Real64 => match raw {
            Value::Float(f) => Ok(Primitive::F64(*f)),
            Value::Integer(_) => Ok(Primitive::F64(as_i128(raw)? as f64)),
            _ => Err(Error::decoding("expected float for REAL type")),
        },
        AriType::TextStr => match raw {
            Value::Text(s) => Ok(Primitive::Text(s.clone())),
            _ => Err(Error::decoding("expected text for TEXTSTR type")),
        },
        AriType::Label => match raw {
            Value::Text(s) => Ok(Primitive::Text(s.clone())),
            Value::Integer(_) => Ok(Primitive::I64(i64::try_from(as_i128(raw)?).map_err(|_| {
                Error::bad_value("LABEL ordinal out of range")
            })?)),
            _ => Err(Error::decoding("expected text or int for LABEL type")),
        },
        AriType::ByteStr | AriType::Cbor => match raw {
            Value::Bytes(b) => Ok(Primitive::Bytes(Bytes::copy_from(b))),
            _ => Err(Error::decoding("expected bytes for byte-string type")),
        },
        AriType::Tp | AriType::Td => decode_timespec(raw).map(Primitive::Timespec),
        AriType::Ac => decode_ac(raw),
        AriType::Am => decode_am(raw),
        AriType::Tbl => decode_tbl(raw),
        AriType::ExecSet => decode_execset(raw),
        AriType::RptSet => decode_rptset(raw),
        AriType::Literal | AriType::Object | AriType::Namespace => {
            Err(Error::invalid_ari("catch-all type cannot appear as a declared wire type"))
        }
        _ => Err(Error::invalid_ari("declared type is not a literal type")),
    }
}

fn decode_timespec(raw: &Value) -> Result<TimeSpec> {
    match raw {
        Value::Integer(_) => {
            let secs = i64::try_from(as_i128(raw)?).map_err(|_| Error::bad_value("timespec seconds out of range"))?;
            Ok(TimeSpec::from_secs(secs))
        }
        Value::Array(arr) if arr.len() == 2 => {
            let exp = i64::try_from(as_i128(&arr[0])?).map_err(|_| Error::bad_value("timespec exponent out of range"))?;
            let mantissa =
                i64::try_from(as_i128(&arr[1])?).map_err(|_| Error::bad_value("timespec mantissa out of range"))?;
            TimeSpec::from_decimal_fraction(exp, mantissa)
        }
        _ => Err(Error::decoding("invalid timespec shape")),
    }
}

fn decode_nonce(raw: &Value) -> Result<Nonce> {
    match raw {
        Value::Null => Ok(Nonce::Null),
        Value::Integer(_) => {
            let v = u64::try_from(as_i128(raw)?).map_err(|_| Error::bad_value("negative nonce"))?;
            Ok(Nonce::Int(v))
        }
        Value::Bytes(b) => Ok(Nonce::Bytes(Bytes::copy_from(b))),
        _ => Err(Error::decoding("invalid nonce shape")),
    }
}

fn decode_ac(raw: &Value) -> Result<Primitive> {
    let Value::Array(arr) = raw else {
        return Err(Error::decoding("expected array for AC"));
    };
    let items = arr.iter().map(decode_value).collect::<Result<Vec<_>>>()?;
    Ok(Primitive::Other(Container::Ac(Box::new(Ac::new(items)))))
}

fn decode_am(raw: &Value) -> Result<Primitive> {
    let Value::Map(entries) = raw else {
        return Err(Error::decoding("expected map for AM"));
    };
    let mut am = Am::new();
    for (k, v) in entries {
        am.insert(decode_value(k)?, decode_value(v)?)?;
    }
    Ok(Primitive::Other(Container::Am(Box::new(am))))
}

fn decode_tbl(raw: &Value) -> Result<Primitive> {
    let Value::Array(arr) = raw else {
        return Err(Error::decoding("expected array for TBL"));
    };
    let Some((head, rest)) = arr.split_first() else {
        return Err(Error::decoding("TBL array missing column count"));
    };
    let ncols = usize::try_from(as_i128(head)?).map_err(|_| Error::bad_value("TBL column count out of range"))?;
    let items = rest.iter().map(decode_value).collect::<Result<Vec<_>>>()?;
    Ok(Primitive::Other(Container::Tbl(Box::new(Tbl::new(ncols, items)?))))
}

fn decode_execset(raw: &Value) -> Result<Primitive> {
    let Value::Array(arr) = raw else {
        return Err(Error::decoding("expected array for EXECSET"));
    };
    let Some((nonce_raw, rest)) = arr.split_first() else {
        return Err(Error::decoding("EXECSET array missing nonce"));
    };
    let nonce = decode_nonce(nonce_raw)?;
    let targets = rest.iter().map(decode_value).collect::<Result<Vec<_>>>()?;
    Ok(Primitive::Other(Container::ExecSet(Box::new(ExecSet::new(nonce, targets)))))
}

fn decode_rptset(raw: &Value) -> Result<Primitive> {
    let Value::Array(arr) = raw else {
        return Err(Error::decoding("expected array for RPTSET"));
    };
    if arr.len() < 2 {
        return Err(Error::decoding("RPTSET array missing nonce/reftime"));
    }
    let nonce = decode_nonce(&arr[0])?;
    let reftime = decode_value(&arr[1])?;
    let reports = arr[2..].iter().map(decode_report).collect::<Result<Vec<_>>>()?;
    Ok(Primitive::Other(Container::RptSet(Box::new(RptSet::new(nonce, reftime, reports)))))
}

fn decode_report(raw: &Value) -> Result<Report> {
    let Value::Array(arr) = raw else {
        return Err(Error::decoding("expected array for RPTSET report"));
    };
    if arr.len() < 2 {
        return Err(Error::decoding("report array missing reltime/source"));
    }
    let reltime = decode_value(&arr[0])?;
    let source = decode_value(&arr[1])?;
    let items = arr[2..].iter().map(decode_value).collect::<Result<Vec<_>>>()?;
    Ok(Report::new(reltime, source, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{Ac, Container};

    // S1: ari:1234 -> untyped I64(1234); binary 19 04 D2.
    #[test]
    fn s1_untyped_int_binary() {
        let ari = Ari::lit_untyped(Primitive::I64(1234));
        assert_eq!(encode(&ari).unwrap(), vec![0x19, 0x04, 0xD2]);
        assert_eq!(decode(&[0x19, 0x04, 0xD2]).unwrap(), ari);
    }

    // S2: ari:/INT/-1234 -> declared INT, I64(-1234); binary 82 04 39 04 D1.
    #[test]
    fn s2_typed_int_binary() {
        let ari = Ari::lit_typed(AriType::Int, Primitive::I64(-1234)).unwrap();
        assert_eq!(encode(&ari).unwrap(), vec![0x82, 0x04, 0x39, 0x04, 0xD1]);
        assert_eq!(decode(&[0x82, 0x04, 0x39, 0x04, 0xD1]).unwrap(), ari);
    }

    // S3: ari:/AC/(null,/INT/23) -> typed AC of [untyped null, typed INT 23];
    // binary 82 11 82 F6 82 04 17.
    #[test]
    fn s3_typed_ac_binary() {
        let ari = Ari::lit_typed(
            AriType::Ac,
            Primitive::Other(Container::Ac(Box::new(Ac::new(vec![
                Ari::lit_untyped(Primitive::Null),
                Ari::lit_typed(AriType::Int, Primitive::I64(23)).unwrap(),
            ])))),
        )
        .unwrap();
        let bytes = encode(&ari).unwrap();
        assert_eq!(bytes, vec![0x82, 0x11, 0x82, 0xF6, 0x82, 0x04, 0x17]);
        assert_eq!(decode(&bytes).unwrap(), ari);
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        assert!(decode(&[0x19, 0x04, 0xD2, 0x00]).is_err());
    }

    #[test]
    fn reference_round_trips_through_cbor() {
        let ari = Ari::Ref(Reference::new(ObjectPath::relative(IdSegment::Text("CTRL".into()), IdSegment::Text("hi".into()))));
        let bytes = encode(&ari).unwrap();
        assert_eq!(decode(&bytes).unwrap(), ari);
    }

    #[test]
    fn undefined_round_trips_through_its_private_tag() {
        let ari = Ari::undefined();
        let bytes = encode(&ari).unwrap();
        assert_eq!(decode(&bytes).unwrap(), ari);
    }

    #[test]
    fn bare_array_at_generic_position_decodes_as_untyped_ac() {
        let decoded = decode_value(&Value::Array(vec![Value::Integer(1.into()), Value::Integer(2.into())])).unwrap();
        assert!(matches!(decoded, Ari::Lit(ref lit) if matches!(lit.value, Primitive::Other(Container::Ac(_)))));
    }
}
