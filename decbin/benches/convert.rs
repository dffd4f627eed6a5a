// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use rand::{thread_rng, Rng};

use decbin::{BinaryLayout, Context, Decimal};

fn bench_encode(d: Decimal<12>, layout: BinaryLayout, b: &mut Bencher) {
    let mut cx = Context::<Decimal<12>>::default();
    b.iter(|| cx.to_binary(&d, &layout))
}

fn bench_decode(bytes: Vec<u8>, layout: BinaryLayout, b: &mut Bencher) {
    let mut cx = Context::<Decimal<12>>::default();
    b.iter(|| cx.from_binary(&bytes, &layout))
}

pub fn bench_to_binary(c: &mut Criterion) {
    let mut rng = thread_rng();
    let mut cx = Context::<Decimal<12>>::default();
    let d = cx
        .parse(format!("{}.{}", rng.gen::<u32>(), rng.gen::<u32>()))
        .unwrap_or_else(|_| Decimal::zero());

    c.bench_function("to_binary64", |b| {
        bench_encode(d.clone(), BinaryLayout::BINARY64_LE, b)
    });
    c.bench_function("to_extended80", |b| {
        bench_encode(d.clone(), BinaryLayout::EXTENDED80_LE, b)
    });
    c.bench_function("to_binary128", |b| {
        bench_encode(d.clone(), BinaryLayout::BINARY128_LE, b)
    });
}

pub fn bench_from_binary(c: &mut Criterion) {
    let mut rng = thread_rng();
    let f: f64 = rng.gen_range(-1e9, 1e9);
    c.bench_function("from_binary64", |b| {
        bench_decode(f.to_le_bytes().to_vec(), BinaryLayout::BINARY64_LE, b)
    });

    let mut cx = Context::<Decimal<12>>::default();
    let bytes = cx.to_binary(&Decimal::from(rng.gen::<i64>()), &BinaryLayout::BINARY128_LE);
    c.bench_function("from_binary128", |b| {
        bench_decode(bytes.clone(), BinaryLayout::BINARY128_LE, b)
    });
}

criterion_group!(benches, bench_to_binary, bench_from_binary);
criterion_main!(benches);
