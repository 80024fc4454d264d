//! Text encoding: ARI tree to URI-form string (§4.3).

use std::fmt::Write as _;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::containers::{Container, Nonce};
use crate::error::Result;
use crate::idseg::IdSegment;
use crate::params::Params;
use crate::path::{ObjectPath, PathKind};
use crate::time::TimeSpec;
use crate::ty::AriType;
use crate::value::{Ari, Literal, Primitive, Reference};

/// When the `ari:` URI scheme prefix is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemePolicy {
    /// Never emit the prefix.
    Never,
    /// Emit it only on the outermost value being encoded (the default).
    #[default]
    First,
    /// Emit it on every literal/reference, including nested ones.
    Every,
}

/// Which textual form a floating-point value is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatForm {
    /// Plain decimal (`2.5`), the default.
    #[default]
    Decimal,
    /// Exponential (`2.5e0`).
    Exponential,
}

/// Which textual form a byte-string value is rendered in (§4.3 Rules).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteStrForm {
    /// `h'...'`, base16, the default.
    #[default]
    Hex,
    /// `b64'...'`, base64url with no padding.
    Base64,
    /// Bare `'...'`, only legal when the bytes are valid null-free UTF-8;
    /// falls back to [`ByteStrForm::Hex`] otherwise.
    Raw,
}

/// Encoder configuration (§4.3's "selectable"/"configurable" knobs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncodeOptions {
    /// `ari:` scheme prefix policy.
    pub scheme: SchemePolicy,
    /// Base used to render integers: 2, 10, or 16.
    pub int_base: u8,
    /// Floating-point rendering form.
    pub float_form: FloatForm,
    /// Byte-string rendering form.
    pub bytestr_form: ByteStrForm,
}

impl Default for TextEncodeOptions {
    fn default() -> Self {
        Self {
            scheme: SchemePolicy::First,
            int_base: 10,
            float_form: FloatForm::Decimal,
            bytestr_form: ByteStrForm::Hex,
        }
    }
}

/// Encodes `ari` using the canonical default options (§6.2).
pub fn to_text_default(ari: &Ari) -> Result<String> {
    to_text(ari, &TextEncodeOptions::default())
}

/// Encodes `ari` with the given options.
pub fn to_text(ari: &Ari, opts: &TextEncodeOptions) -> Result<String> {
    Ok(encode_ari(ari, opts, true))
}

fn scheme_prefix(opts: &TextEncodeOptions, top: bool) -> &'static str {
    match opts.scheme {
        SchemePolicy::Never => "",
        SchemePolicy::First => {
            if top {
                "ari:"
            } else {
                ""
            }
        }
        SchemePolicy::Every => "ari:",
    }
}

fn encode_ari(ari: &Ari, opts: &TextEncodeOptions, top: bool) -> String {
    match ari {
        Ari::Lit(lit) => format!("{}{}", scheme_prefix(opts, top), encode_literal(lit, opts)),
        Ari::Ref(r) => format!("{}{}", scheme_prefix(opts, top), encode_reference(r, opts)),
    }
}

fn encode_literal(lit: &Literal, opts: &TextEncodeOptions) -> String {
    match lit.ari_type {
        Some(t) => format!("/{}/{}", t.name(), encode_primitive_body(&lit.value, Some(t), opts)),
        None => encode_primitive_body(&lit.value, None, opts),
    }
}

fn encode_primitive_body(p: &Primitive, declared: Option<AriType>, opts: &TextEncodeOptions) -> String {
    match p {
        Primitive::Undefined => "undefined".to_string(),
        Primitive::Null => "null".to_string(),
        Primitive::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Primitive::U64(v) => encode_uint(*v, opts.int_base),
        Primitive::I64(v) => encode_int(*v, opts.int_base),
        Primitive::F64(v) => encode_float(*v, opts.float_form),
        Primitive::Text(s) => encode_text(s),
        Primitive::Bytes(b) => encode_bytes(b.as_slice(), opts.bytestr_form),
        Primitive::Timespec(ts) => {
            if declared == Some(AriType::Td) {
                encode_td(*ts)
            } else {
                encode_tp(*ts)
            }
        }
        Primitive::Other(c) => encode_container(c, opts),
    }
}

fn encode_uint(v: u64, base: u8) -> String {
    match base {
        2 => format!("0b{v:b}"),
        16 => format!("0x{v:x}"),
        _ => format!("{v}"),
    }
}

fn encode_int(v: i64, base: u8) -> String {
    if v < 0 {
        format!("-{}", encode_uint(v.unsigned_abs(), base))
    } else {
        encode_uint(v as u64, base)
    }
}

fn encode_float(v: f64, form: FloatForm) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+infinity" } else { "-infinity" }.to_string();
    }
    match form {
        FloatForm::Decimal => {
            let s = format!("{v}");
            if s.contains('.') || s.contains('e') {
                s
            } else {
                format!("{s}.0")
            }
        }
        FloatForm::Exponential => format!("{v:e}"),
    }
}

/// True if `s` matches the unquoted identifier rule (§4.3 Rules): first
/// char `[A-Za-z_]`, rest `[A-Za-z0-9_.\-]`.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn encode_text(s: &str) -> String {
    if is_identifier(s) {
        s.to_string()
    } else {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                '\r' => out.push_str("\\r"),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }
}

fn encode_bytes(b: &[u8], form: ByteStrForm) -> String {
    match form {
        ByteStrForm::Hex => format!("h'{}'", hex::encode(b)),
        ByteStrForm::Base64 => format!("b64'{}'", URL_SAFE_NO_PAD.encode(b)),
        ByteStrForm::Raw => match std::str::from_utf8(b) {
            Ok(s) if !s.contains('\0') => encode_raw_bytestr(s),
            _ => encode_bytes(b, ByteStrForm::Hex),
        },
    }
}

/// Single-quoted raw byte-string body: backslash-escapes the delimiter
/// the way [`encode_text`] escapes `"`, and percent-encodes any other
/// control byte so the result stays valid URI text (§4.3's percent-
/// encoding rule, narrowed to control bytes since those are the only
/// characters that cannot appear literally in the quoted body).
fn encode_raw_bytestr(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_ascii_control() => out.push_str(percent_encoding::percent_encode_byte(c as u8)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn encode_tp(ts: TimeSpec) -> String {
    use chrono::{Datelike, Timelike};
    let dt = ts.to_utc();
    let mut out = format!(
        "{:04}{:02}{:02}T{:02}{:02}{:02}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second()
    );
    if ts.nanos != 0 {
        let frac = format!("{:09}", ts.nanos);
        let trimmed = frac.trim_end_matches('0');
        let _ = write!(out, ".{trimmed}");
    }
    out.push('Z');
    out
}

fn encode_td(ts: TimeSpec) -> String {
    let mut out = String::new();
    if ts.secs < 0 {
        out.push('-');
    }
    out.push_str("PT");
    let secs = ts.secs.unsigned_abs();
    if ts.nanos == 0 {
        let _ = write!(out, "{secs}S");
    } else {
        let frac = format!("{:09}", ts.nanos);
        let trimmed = frac.trim_end_matches('0');
        let _ = write!(out, "{secs}.{trimmed}S");
    }
    out
}

fn encode_container(c: &Container, opts: &TextEncodeOptions) -> String {
    match c {
        Container::Ac(ac) => {
            let items: Vec<String> = ac.items.iter().map(|it| encode_ari(it, opts, false)).collect();
            format!("({})", items.join(","))
        }
        Container::Am(am) => {
            let items: Vec<String> = am
                .items
                .iter()
                .map(|(k, v)| format!("{}={}", encode_ari(k, opts, false), encode_ari(v, opts, false)))
                .collect();
            format!("({})", items.join(","))
        }
        Container::Tbl(tbl) => {
            let mut out = format!("c={};", tbl.ncols);
            if tbl.ncols > 0 {
                for row in tbl.items.chunks(tbl.ncols) {
                    let cells: Vec<String> = row.iter().map(|it| encode_ari(it, opts, false)).collect();
                    let _ = write!(out, "({})", cells.join(","));
                }
            }
            out
        }
        Container::ExecSet(es) => {
            let items: Vec<String> = es.targets.iter().map(|it| encode_ari(it, opts, false)).collect();
            format!("n={};{}", encode_nonce(&es.nonce), items.join(","))
        }
        Container::RptSet(rs) => {
            let reports: Vec<String> = rs
                .reports
                .iter()
                .map(|r| {
                    let items: Vec<String> = r.items.iter().map(|it| encode_ari(it, opts, false)).collect();
                    format!(
                        "(t={};s={};({}))",
                        encode_ari(&r.reltime, opts, false),
                        encode_ari(&r.source, opts, false),
                        items.join(",")
                    )
                })
                .collect();
            format!(
                "n={};r={};{}",
                encode_nonce(&rs.nonce),
                encode_ari(&rs.reftime, opts, false),
                reports.join(",")
            )
        }
    }
}

fn encode_nonce(n: &Nonce) -> String {
    match n {
        Nonce::Null => "null".to_string(),
        Nonce::Int(v) => format!("{v}"),
        Nonce::Bytes(b) => encode_bytes(b.as_slice(), ByteStrForm::Hex),
    }
}

fn encode_idseg(seg: &Option<IdSegment>) -> String {
    match seg {
        None => "null".to_string(),
        Some(s) => s.to_string(),
    }
}

fn encode_type_segment(path: &ObjectPath) -> String {
    match path.ari_type() {
        Some(t) => t.name().to_string(),
        None => encode_idseg(&path.type_id),
    }
}

fn encode_reference(r: &Reference, opts: &TextEncodeOptions) -> String {
    let params = encode_params(&r.params, opts);
    match r.path.kind() {
        PathKind::FullyQualified => {
            let rev = r.path.model_rev.map(|d| format!("@{d}")).unwrap_or_default();
            format!(
                "//{}/{}{}/{}/{}{}",
                encode_idseg(&r.path.org_id),
                encode_idseg(&r.path.model_id),
                rev,
                encode_type_segment(&r.path),
                encode_idseg(&r.path.object_id),
                params
            )
        }
        PathKind::Namespace => {
            let rev = r.path.model_rev.map(|d| format!("@{d}")).unwrap_or_default();
            format!("//{}/{}{}/", encode_idseg(&r.path.org_id), encode_idseg(&r.path.model_id), rev)
        }
        PathKind::Relative => {
            if r.path.type_id.is_none() && r.path.object_id.is_none() {
                "./".to_string()
            } else {
                format!("./{}/{}{}", encode_type_segment(&r.path), encode_idseg(&r.path.object_id), params)
            }
        }
    }
}

fn encode_params(p: &Params, opts: &TextEncodeOptions) -> String {
    match p {
        Params::None => String::new(),
        Params::Ac(ac) => {
            let items: Vec<String> = ac.items.iter().map(|it| encode_ari(it, opts, false)).collect();
            format!("({})", items.join(","))
        }
        Params::Am(am) => {
            let items: Vec<String> = am
                .items
                .iter()
                .map(|(k, v)| format!("{}={}", encode_ari(k, opts, false), encode_ari(v, opts, false)))
                .collect();
            format!("({})", items.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Tbl;

    fn tbl_ari(ncols: usize, items: Vec<i64>) -> Ari {
        let items = items.into_iter().map(|v| Ari::lit_untyped(Primitive::I64(v))).collect();
        Ari::lit_typed(AriType::Tbl, Primitive::Other(Container::Tbl(Box::new(Tbl::new(ncols, items).unwrap())))).unwrap()
    }

    #[test]
    fn tbl_rows_are_individually_parenthesized() {
        let ari = tbl_ari(2, vec![1, 2, 3, 4]);
        assert_eq!(to_text_default(&ari).unwrap(), "ari:/TBL/c=2;(1,2)(3,4)");
    }

    #[test]
    fn tbl_with_zero_columns_has_no_rows() {
        let ari = tbl_ari(0, vec![]);
        assert_eq!(to_text_default(&ari).unwrap(), "ari:/TBL/c=0;");
    }

    #[test]
    fn bytes_default_to_hex_form() {
        assert_eq!(encode_bytes(b"hi", ByteStrForm::Hex), "h'6869'");
    }

    #[test]
    fn bytes_base64_form_uses_url_safe_no_padding() {
        // "any carnal pleasure." -> padded standard base64 ends in "=";
        // URL_SAFE_NO_PAD must drop it.
        assert_eq!(encode_bytes(b"any carnal pleasure.", ByteStrForm::Base64), "b64'YW55IGNhcm5hbCBwbGVhc3VyZS4'");
    }

    #[test]
    fn bytes_raw_form_quotes_utf8_and_escapes_the_delimiter() {
        assert_eq!(encode_bytes(b"it's fine", ByteStrForm::Raw), "'it\\'s fine'");
    }

    #[test]
    fn bytes_raw_form_falls_back_to_hex_for_non_utf8() {
        assert_eq!(encode_bytes(&[0xFF, 0x00], ByteStrForm::Raw), "h'ff00'");
    }
}
