// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the quantized rescale kernel.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kernel_core::{Kernel, ThreadContext};
use quant_kernels::{QuantizedRescaleKernel, RescaleConfig, RescaleParams};
use std::sync::Arc;
use tensor_core::{DType, Shape, Tensor, TensorInfo};

fn rescale_kernel(rows: usize, cols: usize) -> QuantizedRescaleKernel {
    let values: Vec<i32> = (0..rows * cols).map(|i| (i as i32 % 701) - 350).collect();
    let mm = Arc::new(Tensor::from_i32(Shape::matrix(rows, cols), &values).unwrap());
    let col_sums: Vec<i32> = (0..cols as i32).collect();
    let row_sums: Vec<i32> = (0..rows as i32).collect();
    let output = Arc::new(Tensor::zeros(TensorInfo::new(
        Shape::matrix(rows, cols),
        DType::QAsymmU8,
    )));
    QuantizedRescaleKernel::configure(
        mm,
        Some(Arc::new(
            Tensor::from_i32(Shape::vector(cols), &col_sums).unwrap(),
        )),
        Some(Arc::new(
            Tensor::from_i32(Shape::vector(rows), &row_sums).unwrap(),
        )),
        None,
        output,
        RescaleConfig {
            a_offset: -128,
            b_offset: 3,
            k_depth: 64,
            params: RescaleParams {
                multiplier: 1_340_004_096,
                shift: 6,
                offset: 128,
                min: 0,
                max: 255,
            },
        },
    )
    .unwrap()
}

fn bench_rescale(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantized_rescale");
    for size in [64usize, 256] {
        let kernel = rescale_kernel(size, size);
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| {
                kernel
                    .run(black_box(kernel.window()), &ThreadContext::single())
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rescale);
criterion_main!(benches);
