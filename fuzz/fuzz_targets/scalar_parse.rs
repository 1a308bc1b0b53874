#![no_main]

use ferrous_ioc::ScalarKind;
use libfuzzer_sys::fuzz_target;

const KINDS: [ScalarKind; 14] = [
    ScalarKind::Bool,
    ScalarKind::U8,
    ScalarKind::I16,
    ScalarKind::I32,
    ScalarKind::I64,
    ScalarKind::U16,
    ScalarKind::U32,
    ScalarKind::U64,
    ScalarKind::F32,
    ScalarKind::F64,
    ScalarKind::Decimal,
    ScalarKind::Char,
    ScalarKind::DateTime,
    ScalarKind::String,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let raw = String::from_utf8_lossy(rest);
    let kind = KINDS[selector as usize % KINDS.len()];

    if let Some(value) = kind.parse(&raw) {
        assert_eq!(value.kind(), kind);
    }
});
