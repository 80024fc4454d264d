//! The parameter block carried by an object reference (§3.4).

use crate::containers::{Ac, Am};
use crate::error::{Error, Result};
use crate::value::{Ari, Literal, Primitive};

/// The parameter block attached to an object reference: absent,
/// positional (an AC), or named (an AM with case-folded text keys and
/// canonicalized integer keys).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Params {
    /// No parameters were supplied.
    #[default]
    None,
    /// Positional actuals.
    Ac(Ac),
    /// Named or index-keyed actuals.
    Am(Am),
}

impl Params {
    /// True for [`Params::None`].
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Params::None)
    }

    /// Normalizes an AM key per §3.4: text keys are case-folded to
    /// lowercase; integer keys are normalized to an unsigned (UVAST) form.
    /// Mixing both forms for what would resolve to the same formal
    /// parameter is detected by the caller (the binder), not here.
    pub fn normalize_key(key: &Ari) -> Result<Ari> {
        match key {
            Ari::Lit(lit) => match &lit.value {
                Primitive::Text(s) => Ok(Ari::Lit(Literal::untyped(Primitive::Text(s.to_ascii_lowercase())))),
                Primitive::U64(v) => Ok(Ari::Lit(Literal::untyped(Primitive::U64(*v)))),
                Primitive::I64(v) => {
                    let uv = u64::try_from(*v)
                        .map_err(|_| Error::invalid_ari("negative integer AM param key"))?;
                    Ok(Ari::Lit(Literal::untyped(Primitive::U64(uv))))
                }
                _ => Err(Error::invalid_ari("AM param key must be text or integer")),
            },
            Ari::Ref(_) => Err(Error::invalid_ari("AM param key must be a literal")),
        }
    }
}
