//! Text decoding: URI-form string to ARI tree (§4.3).
//!
//! The lexer is atom-based: an "atom" is a maximal run of characters that
//! are not one of the structural delimiters (`/ ( ) , = ; @ ' "` or
//! whitespace). Numbers, keywords (`null`, `true`, `undefined`, ...), bare
//! identifiers, and type/path segments are all read as atoms and then
//! classified by the caller, because the character classes overlap too
//! much (hex digits, `x`/`b`/`p` exponent markers, `.`/`-`) to usefully
//! split into separate lexers.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::buf::Bytes;
use crate::containers::{Ac, Am, ExecSet, Nonce, Report, RptSet, Tbl};
use crate::date::RevisionDate;
use crate::error::{Error, Result};
use crate::idseg::IdSegment;
use crate::params::Params;
use crate::path::ObjectPath;
use crate::time::TimeSpec;
use crate::ty::AriType;
use crate::value::{Ari, Literal, Primitive};

/// Parses a complete URI-form ARI text, with or without the `ari:` scheme
/// prefix.
pub fn from_text(s: &str) -> Result<Ari> {
    let mut p = Parser::new(s);
    let ari = p.parse_ari()?;
    p.skip_ws();
    if !p.at_end() {
        return Err(Error::decoding(format!("trailing input after ARI: {:?}", p.rest())));
    }
    Ok(ari)
}

struct Parser<'a> {
    s: &'a str,
    pos: usize,
}

const DELIMS: [char; 8] = ['/', '(', ')', ',', '=', ';', '@', '"'];

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.rest().is_empty()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, c: char) -> Result<()> {
        self.skip_ws();
        match self.bump() {
            Some(got) if got == c => Ok(()),
            Some(got) => Err(Error::decoding(format!("expected '{c}', found '{got}'"))),
            None => Err(Error::decoding(format!("expected '{c}', found end of input"))),
        }
    }

    fn peek_is(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    /// Reads a maximal run of non-delimiter, non-whitespace characters.
    fn read_atom(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || DELIMS.contains(&c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.s[start..self.pos]
    }

    /// Reads a double-quoted text string, consuming both quotes.
    fn read_quoted(&mut self) -> Result<String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(Error::decoding("unterminated quoted string")),
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => out.push(c),
                    None => return Err(Error::decoding("unterminated escape in quoted string")),
                },
                Some(c) => out.push(c),
            }
        }
        Ok(out)
    }

    /// Entry point: a top-level ARI value, optionally scheme-prefixed.
    fn parse_ari(&mut self) -> Result<Ari> {
        self.skip_ws();
        if self.rest().starts_with("ari:") {
            self.pos += "ari:".len();
        }
        self.parse_value()
    }

    /// One ARI value: reference (`/...` or `//...` or `.` relative) or
    /// literal (typed `/TYPE/body` or untyped atom/quoted/byte-string).
    fn parse_value(&mut self) -> Result<Ari> {
        self.skip_ws();
        if self.rest().starts_with("//") || self.rest().starts_with("./") || self.peek_is('.') {
            return self.parse_reference();
        }
        if self.peek_is('/') {
            return self.parse_typed_or_reference();
        }
        self.parse_untyped_literal()
    }

    /// Disambiguates `/TYPE/body` (typed literal) from `/org/model/.../obj`
    /// (fully-qualified reference) by checking whether the first segment
    /// names a known [`AriType`].
    fn parse_typed_or_reference(&mut self) -> Result<Ari> {
        let save = self.pos;
        self.expect('/')?;
        let seg = self.read_atom();
        if let Ok(t) = AriType::from_name(seg) {
            self.expect('/')?;
            return self.parse_typed_body(t);
        }
        self.pos = save;
        self.parse_reference()
    }

    fn parse_typed_body(&mut self, t: AriType) -> Result<Ari> {
        use Primitive as P;
        let value = match t {
            AriType::Null => {
                self.expect_keyword("null")?;
                P::Null
            }
            AriType::Bool => P::Bool(self.parse_bool()?),
            AriType::Byte | AriType::Uint | AriType::Uvast => P::U64(self.parse_uint_atom()?),
            AriType::Int | AriType::Vast | AriType::Aritype => P::I64(self.parse_int_atom()?),
            AriType::Real32 | AriType::Real64 => P::F64(self.parse_float_atom()?),
            AriType::TextStr | AriType::Label => {
                if self.peek_is('"') {
                    P::Text(self.read_quoted()?)
                } else {
                    P::Text(self.read_atom().to_string())
                }
            }
            AriType::ByteStr | AriType::Cbor => P::Bytes(self.parse_byte_string()?),
            AriType::Tp => P::Timespec(self.parse_tp()?),
            AriType::Td => P::Timespec(self.parse_td()?),
            AriType::Ac => P::Other(crate::containers::Container::Ac(Box::new(self.parse_ac_body()?))),
            AriType::Am => P::Other(crate::containers::Container::Am(Box::new(self.parse_am_body()?))),
            AriType::Tbl => P::Other(crate::containers::Container::Tbl(Box::new(self.parse_tbl_body()?))),
            AriType::ExecSet => {
                P::Other(crate::containers::Container::ExecSet(Box::new(self.parse_execset_body()?)))
            }
            AriType::RptSet => {
                P::Other(crate::containers::Container::RptSet(Box::new(self.parse_rptset_body()?)))
            }
            other => {
                return Err(Error::decoding(format!("'{}' is not a literal type", other.name())));
            }
        };
        Ok(Ari::Lit(Literal::typed(t, value)?))
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        let atom = self.read_atom();
        if atom.eq_ignore_ascii_case(kw) {
            Ok(())
        } else {
            Err(Error::decoding(format!("expected '{kw}', found '{atom}'")))
        }
    }

    fn parse_bool(&mut self) -> Result<bool> {
        let atom = self.read_atom();
        match atom.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(Error::decoding(format!("invalid boolean literal '{other}'"))),
        }
    }

    /// True if the cursor sits at the start of any of the three
    /// byte-string prefixes (§4.3 Rules).
    fn looks_like_bytestring(&self) -> bool {
        let rest = self.rest();
        if rest.starts_with(['h', 'H']) && rest[1..].starts_with('\'') {
            return true;
        }
        (rest.len() >= 4 && rest[..3].eq_ignore_ascii_case("b64") && rest[3..].starts_with('\'')) || rest.starts_with('\'')
    }

    /// A byte-string literal in any of its three legal forms (§4.3
    /// Rules): `h'...'` (base16), `b64'...'` (base64url), or a bare
    /// `'...'` raw UTF-8 quote.
    fn parse_byte_string(&mut self) -> Result<Bytes> {
        if self.rest().starts_with(['h', 'H']) && self.rest()[1..].starts_with('\'') {
            self.bump();
            let body = self.read_delimited_bytestr_body()?;
            let bytes = hex::decode(body).map_err(|e| Error::decoding(format!("invalid hex byte string: {e}")))?;
            return Ok(Bytes::from(bytes));
        }
        if self.rest().len() >= 4 && self.rest()[..3].eq_ignore_ascii_case("b64") && self.rest()[3..].starts_with('\'') {
            self.pos += 3;
            let body = self.read_delimited_bytestr_body()?;
            let padded = body.trim_end_matches('=');
            let bytes = URL_SAFE_NO_PAD
                .decode(padded)
                .map_err(|e| Error::decoding(format!("invalid base64 byte string: {e}")))?;
            return Ok(Bytes::from(bytes));
        }
        if self.peek_is('\'') {
            let s = self.read_single_quoted()?;
            return Ok(Bytes::from(s.into_bytes()));
        }
        Err(Error::decoding("expected a byte-string literal"))
    }

    /// Reads the `'...'` body of an `h'...'`/`b64'...'` literal verbatim
    /// (no escaping; the alphabets of both forms never contain `'`).
    fn read_delimited_bytestr_body(&mut self) -> Result<&'a str> {
        self.expect('\'')?;
        let start = self.pos;
        while !self.peek_is('\'') {
            if self.bump().is_none() {
                return Err(Error::decoding("unterminated byte string"));
            }
        }
        let body = &self.s[start..self.pos];
        self.expect('\'')?;
        Ok(body)
    }

    /// Reads a single-quoted raw byte-string/text body, unescaping the
    /// way [`Self::read_quoted`] does for its double-quoted counterpart,
    /// plus percent-decoding the control-byte `%XX` escapes the encoder
    /// emits for control bytes.
    fn read_single_quoted(&mut self) -> Result<String> {
        self.expect('\'')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(Error::decoding("unterminated byte string")),
                Some('\'') => break,
                Some('\\') => match self.bump() {
                    Some('\'') => out.push('\''),
                    Some('\\') => out.push('\\'),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => out.push(c),
                    None => return Err(Error::decoding("unterminated escape in byte string")),
                },
                Some('%') => {
                    let hi = self.bump().ok_or_else(|| Error::decoding("unterminated percent-escape"))?;
                    let lo = self.bump().ok_or_else(|| Error::decoding("unterminated percent-escape"))?;
                    let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16)
                        .map_err(|_| Error::decoding(format!("invalid percent-escape '%{hi}{lo}'")))?;
                    out.push(byte as char);
                }
                Some(c) => out.push(c),
            }
        }
        Ok(out)
    }

    /// A bare `YYYYMMDDThhmmss[.frac]Z` time point (§8 S6 canonical form).
    fn parse_tp(&mut self) -> Result<TimeSpec> {
        let atom = self.read_atom();
        let rest = atom.strip_suffix('Z').ok_or_else(|| Error::decoding("TP literal must end in 'Z'"))?;
        let (date_time, frac) = match rest.split_once('.') {
            Some((a, b)) => (a, Some(b)),
            None => (rest, None),
        };
        let (date, time) = date_time
            .split_once('T')
            .ok_or_else(|| Error::decoding("TP literal must contain 'T'"))?;
        if date.len() != 8 || time.len() != 6 {
            return Err(Error::decoding("TP literal has wrong field width"));
        }
        let year: u16 = date[0..4].parse().map_err(|_| Error::decoding("invalid TP year"))?;
        let month: u8 = date[4..6].parse().map_err(|_| Error::decoding("invalid TP month"))?;
        let day: u8 = date[6..8].parse().map_err(|_| Error::decoding("invalid TP day"))?;
        let hour: i64 = time[0..2].parse().map_err(|_| Error::decoding("invalid TP hour"))?;
        let minute: i64 = time[2..4].parse().map_err(|_| Error::decoding("invalid TP minute"))?;
        let second: i64 = time[4..6].parse().map_err(|_| Error::decoding("invalid TP second"))?;

        use chrono::{NaiveDate, TimeZone, Utc};
        let naive_date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
            .ok_or_else(|| Error::decoding("invalid TP calendar date"))?;
        let dt = naive_date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::decoding("invalid TP time"))?;
        let base = Utc.from_utc_datetime(&dt);
        let mut ts = TimeSpec::from_utc(base);
        ts.secs += hour * 3600 + minute * 60 + second;
        if let Some(frac) = frac {
            let nanos: u32 = parse_fraction_nanos(frac)?;
            ts.nanos = nanos;
        }
        Ok(ts)
    }

    /// A bare `[-]PT<secs>[.frac]S` duration (§8 S6 canonical form).
    fn parse_td(&mut self) -> Result<TimeSpec> {
        let atom = self.read_atom();
        let (neg, rest) = match atom.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, atom),
        };
        let rest = rest
            .strip_prefix("PT")
            .ok_or_else(|| Error::decoding("TD literal must start with 'PT'"))?;
        let rest = rest.strip_suffix('S').ok_or_else(|| Error::decoding("TD literal must end in 'S'"))?;
        let (whole, frac) = match rest.split_once('.') {
            Some((a, b)) => (a, Some(b)),
            None => (rest, None),
        };
        let secs: i64 = whole.parse().map_err(|_| Error::decoding("invalid TD second count"))?;
        let nanos = match frac {
            Some(f) => parse_fraction_nanos(f)?,
            None => 0,
        };
        let (secs, nanos) = if neg {
            if nanos == 0 {
                (-secs, 0)
            } else {
                (-secs - 1, 1_000_000_000 - nanos)
            }
        } else {
            (secs, nanos)
        };
        Ok(TimeSpec { secs, nanos })
    }

    /// `/AC/(csv)`.
    fn parse_ac_body(&mut self) -> Result<Ac> {
        self.expect('(')?;
        let items = self.parse_csv_values(')')?;
        self.expect(')')?;
        Ok(Ac::new(items))
    }

    /// `/AM/(k=v,...)`.
    fn parse_am_body(&mut self) -> Result<Am> {
        self.expect('(')?;
        let mut am = Am::new();
        self.skip_ws();
        if !self.peek_is(')') {
            loop {
                let (k, v) = self.parse_kv_pair()?;
                am.insert(k, v)?;
                self.skip_ws();
                if self.peek_is(',') {
                    self.bump();
                    self.skip_ws();
                } else {
                    break;
                }
            }
        }
        self.expect(')')?;
        Ok(am)
    }

    fn parse_kv_pair(&mut self) -> Result<(Ari, Ari)> {
        let k = self.parse_value()?;
        self.expect('=')?;
        let v = self.parse_value()?;
        Ok((k, v))
    }

    /// Bare `c=<ncols>;(row)(row)...`, each row a parenthesized,
    /// comma-separated list of exactly `ncols` items with no separator
    /// between row groups.
    fn parse_tbl_body(&mut self) -> Result<Tbl> {
        self.skip_ws();
        self.expect_tag("c")?;
        self.expect('=')?;
        let ncols = self.parse_uint_atom()? as usize;
        self.expect(';')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.at_end() || !self.peek_is('(') {
                break;
            }
            self.expect('(')?;
            let row = self.parse_csv_values(')')?;
            self.expect(')')?;
            if ncols != 0 && row.len() != ncols {
                return Err(Error::decoding(format!(
                    "table row has {} item(s), expected {ncols}",
                    row.len()
                )));
            }
            items.extend(row);
        }
        Tbl::new(ncols, items)
    }

    /// Bare `n=<nonce>;target,target,...`.
    fn parse_execset_body(&mut self) -> Result<ExecSet> {
        self.skip_ws();
        self.expect_tag("n")?;
        self.expect('=')?;
        let nonce = self.parse_nonce()?;
        self.expect(';')?;
        let targets = self.parse_csv_values_until_end()?;
        Ok(ExecSet::new(nonce, targets))
    }

    /// Bare `n=<nonce>;r=<reftime>;(report),(report),...`.
    fn parse_rptset_body(&mut self) -> Result<RptSet> {
        self.skip_ws();
        self.expect_tag("n")?;
        self.expect('=')?;
        let nonce = self.parse_nonce()?;
        self.expect(';')?;
        self.expect_tag("r")?;
        self.expect('=')?;
        let reftime = self.parse_value()?;
        self.expect(';')?;
        let mut reports = Vec::new();
        loop {
            self.skip_ws();
            if self.at_end() || self.peek_is(')') {
                break;
            }
            reports.push(self.parse_report()?);
            self.skip_ws();
            if self.peek_is(',') {
                self.bump();
            } else {
                break;
            }
        }
        Ok(RptSet::new(nonce, reftime, reports))
    }

    /// `(t=<reltime>;s=<source>;(item,item,...))`.
    fn parse_report(&mut self) -> Result<Report> {
        self.expect('(')?;
        self.expect_tag("t")?;
        self.expect('=')?;
        let reltime = self.parse_value()?;
        self.expect(';')?;
        self.expect_tag("s")?;
        self.expect('=')?;
        let source = self.parse_value()?;
        self.expect(';')?;
        self.expect('(')?;
        let items = self.parse_csv_values(')')?;
        self.expect(')')?;
        self.expect(')')?;
        Ok(Report::new(reltime, source, items))
    }

    fn expect_tag(&mut self, tag: &str) -> Result<()> {
        let atom = self.read_atom();
        if atom == tag {
            Ok(())
        } else {
            Err(Error::decoding(format!("expected tag '{tag}', found '{atom}'")))
        }
    }

    fn parse_nonce(&mut self) -> Result<Nonce> {
        self.skip_ws();
        if self.looks_like_bytestring() {
            return Ok(Nonce::Bytes(self.parse_byte_string()?));
        }
        let atom_start = self.pos;
        let atom = self.read_atom();
        if atom.eq_ignore_ascii_case("null") {
            return Ok(Nonce::Null);
        }
        self.pos = atom_start;
        Ok(Nonce::Int(self.parse_uint_atom()?))
    }

    fn parse_csv_values(&mut self, close: char) -> Result<Vec<Ari>> {
        let mut out = Vec::new();
        self.skip_ws();
        if self.peek_is(close) {
            return Ok(out);
        }
        loop {
            out.push(self.parse_value()?);
            self.skip_ws();
            if self.peek_is(',') {
                self.bump();
                self.skip_ws();
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// Like [`Self::parse_csv_values`] but for a bare trailer with no
    /// closing delimiter: stops at end of input or an unmatched `)`.
    fn parse_csv_values_until_end(&mut self) -> Result<Vec<Ari>> {
        let mut out = Vec::new();
        self.skip_ws();
        if self.at_end() || self.peek_is(')') {
            return Ok(out);
        }
        loop {
            out.push(self.parse_value()?);
            self.skip_ws();
            if self.peek_is(',') {
                self.bump();
                self.skip_ws();
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// An untyped literal: keyword, number, quoted text, bare identifier
    /// text, or byte string.
    fn parse_untyped_literal(&mut self) -> Result<Ari> {
        use Primitive as P;
        self.skip_ws();
        if self.peek_is('"') {
            return Ok(Ari::lit_untyped(P::Text(self.read_quoted()?)));
        }
        if self.looks_like_bytestring() {
            return Ok(Ari::lit_untyped(P::Bytes(self.parse_byte_string()?)));
        }
        let save = self.pos;
        let atom = self.read_atom();
        match atom.to_ascii_lowercase().as_str() {
            "undefined" => return Ok(Ari::undefined()),
            "null" => return Ok(Ari::lit_untyped(P::Null)),
            "true" => return Ok(Ari::lit_untyped(P::Bool(true))),
            "false" => return Ok(Ari::lit_untyped(P::Bool(false))),
            _ => {}
        }
        self.pos = save;
        if is_number_start(atom) {
            return self.parse_untyped_number();
        }
        if atom.is_empty() {
            return Err(Error::decoding("expected a value"));
        }
        Ok(Ari::lit_untyped(P::Text(atom.to_string())))
    }

    /// Untyped numbers prefer a signed 64-bit representation, falling back
    /// to unsigned only once the magnitude overflows `i64` (§8 S1), and to
    /// `F64` whenever the atom looks like a float.
    fn parse_untyped_number(&mut self) -> Result<Ari> {
        use Primitive as P;
        let atom = self.read_atom();
        if is_float_shaped(atom) {
            let v: f64 = atom.parse().map_err(|_| Error::decoding(format!("invalid float literal '{atom}'")))?;
            return Ok(Ari::lit_untyped(P::F64(v)));
        }
        let (neg, digits) = match atom.strip_prefix('-') {
            Some(d) => (true, d),
            None => (false, atom),
        };
        let mag = parse_based_uint(digits)?;
        if neg {
            if mag <= i64::MAX as u64 + 1 {
                let v = if mag == i64::MAX as u64 + 1 { i64::MIN } else { -(mag as i64) };
                return Ok(Ari::lit_untyped(P::I64(v)));
            }
            return Err(Error::decoding(format!("negative integer literal '{atom}' out of range")));
        }
        if mag <= i64::MAX as u64 {
            Ok(Ari::lit_untyped(P::I64(mag as i64)))
        } else {
            Ok(Ari::lit_untyped(P::U64(mag)))
        }
    }

    fn parse_uint_atom(&mut self) -> Result<u64> {
        let atom = self.read_atom();
        parse_based_uint(atom)
    }

    fn parse_int_atom(&mut self) -> Result<i64> {
        let atom = self.read_atom();
        let (neg, digits) = match atom.strip_prefix('-') {
            Some(d) => (true, d),
            None => (false, atom),
        };
        let mag = parse_based_uint(digits)?;
        if neg {
            if mag > i64::MAX as u64 + 1 {
                return Err(Error::decoding(format!("integer literal '{atom}' out of range")));
            }
            Ok(if mag == i64::MAX as u64 + 1 { i64::MIN } else { -(mag as i64) })
        } else {
            i64::try_from(mag).map_err(|_| Error::decoding(format!("integer literal '{atom}' out of range")))
        }
    }

    fn parse_float_atom(&mut self) -> Result<f64> {
        let atom = self.read_atom();
        match atom.to_ascii_lowercase().as_str() {
            "nan" => return Ok(f64::NAN),
            "infinity" | "+infinity" => return Ok(f64::INFINITY),
            "-infinity" => return Ok(f64::NEG_INFINITY),
            _ => {}
        }
        atom.parse::<f64>()
            .map_err(|_| Error::decoding(format!("invalid floating-point literal '{atom}'")))
    }

    /// A reference: `//org/model[@rev]/type/object[params]`,
    /// `//org/model[@rev]/`, or a relative `./type/object[params]`.
    fn parse_reference(&mut self) -> Result<Ari> {
        if self.rest().starts_with("//") {
            self.pos += 2;
            let org = self.parse_idseg()?;
            self.expect('/')?;
            let (model, rev) = self.parse_model_segment()?;
            self.expect('/')?;
            if self.at_end() || self.peek_is('(') {
                let path = ObjectPath::namespace(org, model, rev);
                let params = self.parse_params()?;
                return Ok(Ari::Ref(crate::value::Reference::with_params(path, params)));
            }
            let ty = self.parse_type_idseg()?;
            self.expect('/')?;
            let obj = self.parse_idseg()?;
            let path = ObjectPath::fully_qualified(org, model, rev, ty, obj);
            let params = self.parse_params()?;
            return Ok(Ari::Ref(crate::value::Reference::with_params(path, params)));
        }
        if self.rest().starts_with("./") {
            self.pos += 2;
        } else {
            self.expect('.')?;
        }
        if self.at_end() {
            return Ok(Ari::Ref(crate::value::Reference::new(ObjectPath {
                org_id: None,
                model_id: None,
                model_rev: None,
                type_id: None,
                object_id: None,
            })));
        }
        let ty = self.parse_type_idseg()?;
        self.expect('/')?;
        let obj = self.parse_idseg()?;
        let path = ObjectPath::relative(ty, obj);
        let params = self.parse_params()?;
        Ok(Ari::Ref(crate::value::Reference::with_params(path, params)))
    }

    fn parse_model_segment(&mut self) -> Result<(IdSegment, Option<RevisionDate>)> {
        let model = self.parse_idseg()?;
        if self.peek_is('@') {
            self.bump();
            let atom = self.read_atom();
            if atom.len() != 8 {
                return Err(Error::decoding("model-revision date must be 8 digits"));
            }
            let year: u16 = atom[0..4].parse().map_err(|_| Error::decoding("invalid revision year"))?;
            let month: u8 = atom[4..6].parse().map_err(|_| Error::decoding("invalid revision month"))?;
            let day: u8 = atom[6..8].parse().map_err(|_| Error::decoding("invalid revision day"))?;
            return Ok((model, Some(RevisionDate::new(year, month, day)?)));
        }
        Ok((model, None))
    }

    fn parse_idseg(&mut self) -> Result<IdSegment> {
        let atom = self.read_atom();
        if atom.eq_ignore_ascii_case("null") {
            return Ok(IdSegment::Null);
        }
        if is_number_start(atom) {
            if let Ok(v) = parse_based_uint(atom) {
                if let Ok(v) = i64::try_from(v) {
                    return Ok(IdSegment::Int(v));
                }
            }
        }
        Ok(IdSegment::Text(atom.to_string()))
    }

    /// An object-type segment: tries a known ARI-type name first, falling
    /// back to the general id-segment rule.
    fn parse_type_idseg(&mut self) -> Result<IdSegment> {
        let save = self.pos;
        let atom = self.read_atom();
        if let Ok(t) = AriType::from_name(atom) {
            return Ok(IdSegment::Int(t.code() as i64));
        }
        self.pos = save;
        self.parse_idseg()
    }

    fn parse_params(&mut self) -> Result<Params> {
        self.skip_ws();
        if !self.peek_is('(') {
            return Ok(Params::None);
        }
        let save = self.pos;
        self.expect('(')?;
        self.skip_ws();
        if self.peek_is(')') {
            self.bump();
            return Ok(Params::Am(Am::new()));
        }
        // Disambiguate AC-shaped vs AM-shaped params by probing for a
        // top-level '=' before the first ',' or the closing ')'.
        let probe_start = self.pos;
        let mut depth = 0i32;
        let mut is_am = false;
        for c in self.rest().chars() {
            match c {
                '(' => depth += 1,
                ')' if depth == 0 => break,
                ')' => depth -= 1,
                ',' if depth == 0 => break,
                '=' if depth == 0 => {
                    is_am = true;
                    break;
                }
                _ => {}
            }
        }
        self.pos = probe_start;
        if is_am {
            let am = self.parse_am_body_inner()?;
            self.expect(')')?;
            return Ok(Params::Am(am));
        }
        self.pos = save;
        let ac = self.parse_ac_body()?;
        Ok(Params::Ac(ac))
    }

    /// Parses AM key/value pairs without the surrounding parens, which the
    /// caller has already consumed (used by [`Self::parse_params`] after
    /// its disambiguation probe).
    fn parse_am_body_inner(&mut self) -> Result<Am> {
        let mut am = Am::new();
        self.skip_ws();
        if !self.peek_is(')') {
            loop {
                let (k, v) = self.parse_kv_pair()?;
                let k = Params::normalize_key(&k)?;
                am.insert(k, v)?;
                self.skip_ws();
                if self.peek_is(',') {
                    self.bump();
                    self.skip_ws();
                } else {
                    break;
                }
            }
        }
        Ok(am)
    }
}

fn parse_fraction_nanos(frac: &str) -> Result<u32> {
    let mut digits: String = frac.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(Error::decoding("empty fractional-second digits"));
    }
    digits.truncate(9);
    while digits.len() < 9 {
        digits.push('0');
    }
    digits.parse().map_err(|_| Error::decoding("invalid fractional-second digits"))
}

fn is_number_start(atom: &str) -> bool {
    let mut chars = atom.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-') => matches!(chars.next(), Some(c) if c.is_ascii_digit()),
        Some('+') => matches!(chars.next(), Some(c) if c.is_ascii_digit()),
        _ => false,
    }
}

fn is_float_shaped(atom: &str) -> bool {
    let body = atom.strip_prefix(['-', '+']).unwrap_or(atom);
    if body.starts_with("0x") || body.starts_with("0X") || body.starts_with("0b") || body.starts_with("0B") {
        return body.contains(['p', 'P']);
    }
    body.contains('.') || body.contains('e') || body.contains('E')
}

/// Parses an unsigned integer atom, honoring the `0b`/`0x` base prefixes
/// (§4.3 Rules); plain digits are base 10.
fn parse_based_uint(atom: &str) -> Result<u64> {
    if let Some(bin) = atom.strip_prefix("0b").or_else(|| atom.strip_prefix("0B")) {
        return u64::from_str_radix(bin, 2).map_err(|_| Error::decoding(format!("invalid binary literal '{atom}'")));
    }
    if let Some(hexd) = atom.strip_prefix("0x").or_else(|| atom.strip_prefix("0X")) {
        return u64::from_str_radix(hexd, 16).map_err(|_| Error::decoding(format!("invalid hex literal '{atom}'")));
    }
    atom.parse::<u64>()
        .map_err(|_| Error::decoding(format!("invalid integer literal '{atom}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Container;

    #[test]
    fn tbl_rows_are_grouped_by_parens() {
        let ari = from_text("ari:/TBL/c=2;(1,2)(3,4)").unwrap();
        let Ari::Lit(lit) = &ari else { panic!("expected a literal") };
        let Primitive::Other(Container::Tbl(tbl)) = &lit.value else { panic!("expected TBL") };
        assert_eq!(tbl.ncols, 2);
        assert_eq!(tbl.num_rows(), 2);
        assert_eq!(tbl.items[0], Ari::lit_untyped(Primitive::I64(1)));
        assert_eq!(tbl.items[3], Ari::lit_untyped(Primitive::I64(4)));
    }

    #[test]
    fn tbl_row_with_wrong_item_count_is_an_error() {
        assert!(from_text("ari:/TBL/c=2;(1,2,3)").is_err());
    }

    #[test]
    fn tbl_flat_csv_is_no_longer_accepted() {
        assert!(from_text("ari:/TBL/c=2;1,2,3,4").is_err());
    }

    #[test]
    fn byte_string_hex_form_round_trips() {
        let ari = from_text("ari:h'6869'").unwrap();
        assert_eq!(ari, Ari::lit_untyped(Primitive::Bytes(crate::buf::Bytes::from(b"hi".to_vec()))));
    }

    #[test]
    fn byte_string_base64_form_decodes() {
        let ari = from_text("ari:b64'aGk'").unwrap();
        assert_eq!(ari, Ari::lit_untyped(Primitive::Bytes(crate::buf::Bytes::from(b"hi".to_vec()))));
    }

    #[test]
    fn byte_string_raw_form_decodes_with_escape() {
        let ari = from_text("ari:'it\\'s fine'").unwrap();
        assert_eq!(ari, Ari::lit_untyped(Primitive::Bytes(crate::buf::Bytes::from(b"it's fine".to_vec()))));
    }
}
