//! End-to-end coverage of the six worked scenarios.

use dtnma_ari::binding::{bind, FormalParam};
use dtnma_ari::containers::{Ac, Container};
use dtnma_ari::params::Params;
use dtnma_ari::text::{from_text, to_text_default};
use dtnma_ari::typing::builtin::Builtin;
use dtnma_ari::typing::semtype::Union;
use dtnma_ari::typing::TypeObj;
use dtnma_ari::{cbor, Ari, AriType, Primitive};

#[test]
fn s1_untyped_int_round_trips() {
    let ari = from_text("ari:1234").unwrap();
    assert_eq!(ari, Ari::lit_untyped(Primitive::I64(1234)));
    assert_eq!(cbor::encode(&ari).unwrap(), vec![0x19, 0x04, 0xD2]);
    assert_eq!(to_text_default(&ari).unwrap(), "ari:1234");
}

#[test]
fn s2_typed_int_round_trips() {
    let ari = from_text("ari:/INT/-1234").unwrap();
    assert_eq!(ari, Ari::lit_typed(AriType::Int, Primitive::I64(-1234)).unwrap());
    assert_eq!(cbor::encode(&ari).unwrap(), vec![0x82, 0x04, 0x39, 0x04, 0xD1]);
}

#[test]
fn s3_typed_ac_round_trips() {
    let ari = from_text("ari:/AC/(null,/INT/23)").unwrap();
    let expected = Ari::lit_typed(
        AriType::Ac,
        Primitive::Other(Container::Ac(Box::new(Ac::new(vec![
            Ari::lit_untyped(Primitive::Null),
            Ari::lit_typed(AriType::Int, Primitive::I64(23)).unwrap(),
        ])))),
    )
    .unwrap();
    assert_eq!(ari, expected);
    assert_eq!(cbor::encode(&ari).unwrap(), vec![0x82, 0x11, 0x82, 0xF6, 0x82, 0x04, 0x17]);
}

#[test]
fn s4_reference_params_bind_positionally() {
    let ari = from_text("ari://example/test/CTRL/hi(34)").unwrap();
    let Ari::Ref(r) = &ari else { panic!("expected a reference") };
    let formals = vec![FormalParam::new(
        0,
        "target",
        Box::new(Builtin::for_type(AriType::Int).unwrap()),
        Ari::lit_typed(AriType::Int, Primitive::I64(0)).unwrap(),
    )];
    let bound = bind(&formals, &r.params).unwrap();
    assert_eq!(bound.get(0), Some(&Ari::lit_typed(AriType::Int, Primitive::I64(34)).unwrap()));
    assert_eq!(bound.get_named("target"), bound.get(0));
}

#[test]
fn s5_union_conversion_rules() {
    let u = Union {
        choices: vec![
            Box::new(Builtin::for_type(AriType::Int).unwrap()),
            Box::new(Builtin::for_type(AriType::TextStr).unwrap()),
        ],
    };
    let real = Ari::lit_typed(AriType::Real32, Primitive::F64(2.0)).unwrap();
    assert_eq!(u.convert(&real).unwrap(), Ari::lit_typed(AriType::Int, Primitive::I64(2)).unwrap());

    let text = Ari::lit_typed(AriType::TextStr, Primitive::Text("hello".into())).unwrap();
    assert_eq!(u.convert(&text).unwrap(), text);

    let ac = Ari::lit_typed(AriType::Ac, Primitive::Other(Container::Ac(Box::new(Ac::new(vec![]))))).unwrap();
    assert!(u.convert(&ac).is_err());
}

#[test]
fn s6_rptset_round_trips_through_text_and_binary() {
    let text = "ari:/RPTSET/n=1234;r=/TP/20230102T030405Z;(t=/TD/PT0S;s=//example/test/CTRL/hi;(null,3,h'6869'))";
    let ari = from_text(text).unwrap();

    let Ari::Lit(lit) = &ari else { panic!("expected a literal") };
    let Primitive::Other(Container::RptSet(rptset)) = &lit.value else { panic!("expected RPTSET") };
    assert_eq!(rptset.reports.len(), 1);

    let bytes = cbor::encode(&ari).unwrap();
    let decoded = cbor::decode(&bytes).unwrap();
    assert_eq!(decoded, ari);

    assert_eq!(to_text_default(&decoded).unwrap(), text);
}

#[test]
fn params_none_vs_am_equivalence_for_s4_style_binding() {
    let formals = vec![FormalParam::new(
        0,
        "target",
        Box::new(Builtin::for_type(AriType::Int).unwrap()),
        Ari::lit_typed(AriType::Int, Primitive::I64(0)).unwrap(),
    )];
    let omitted = bind(&formals, &Params::None).unwrap();
    assert_eq!(omitted.get(0), Some(&Ari::lit_typed(AriType::Int, Primitive::I64(0)).unwrap()));
}
