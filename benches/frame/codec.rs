use criterion::{black_box, criterion_group, criterion_main, Criterion};
use etherframe::{EtherAddr, EtherType, Frame, Tagging, VlanTag};

static QINQ_BYTES: [u8; 64] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xca, 0x03, 0x0d, 0xb4, 0x00, 0x1c, 0x88, 0xa8, 0xb2, 0x9a,
    0x81, 0x00, 0x40, 0xc8, 0x08, 0x06, 0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, 0xca, 0x03,
    0x0d, 0xb4, 0x00, 0x1c, 0xc0, 0xa8, 0x02, 0xc8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc0, 0xa8,
    0x02, 0xfe, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

fn frame(tagging: Tagging) -> Frame {
    Frame::new(
        EtherAddr::BROADCAST,
        EtherAddr([0xca, 0x03, 0x0d, 0xb4, 0x00, 0x1c]),
        EtherType::ARP,
        vec![0u8; 42],
    )
    .with_tagging(tagging)
}

fn decode(c: &mut Criterion) {
    let dot1q = frame(Tagging::Single(VlanTag::new(2, false, 200)))
        .encode()
        .unwrap();
    let untagged = frame(Tagging::Untagged).encode().unwrap();

    c.bench_function("decode_untagged", |b| {
        b.iter(|| Frame::decode(black_box(&untagged[..])).unwrap())
    });
    c.bench_function("decode_dot1q", |b| {
        b.iter(|| Frame::decode(black_box(&dot1q[..])).unwrap())
    });
    c.bench_function("decode_qinq", |b| {
        b.iter(|| Frame::decode(black_box(&QINQ_BYTES[..])).unwrap())
    });
}

fn encode(c: &mut Criterion) {
    let qinq = Frame::decode(&QINQ_BYTES[..]).unwrap();
    let mut out = Vec::with_capacity(QINQ_BYTES.len());

    c.bench_function("encode_qinq", |b| {
        b.iter(|| black_box(&qinq).encode().unwrap())
    });
    c.bench_function("encode_qinq_into", |b| {
        b.iter(|| {
            out.clear();
            black_box(&qinq).encode_into(&mut out).unwrap();
        })
    });
}

criterion_group!(benches, decode, encode);
criterion_main!(benches);
