// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Requantize a matrix-multiply accumulator across thread
//! counts.
//!
//! Demonstrates the central guarantee of the scheduler: splitting a
//! kernel's window across more workers changes only the wall time,
//! never a single output byte.
//!
//! ```bash
//! cargo run -p scheduler --example parallel_rescale
//! ```

use anyhow::Context;
use kernel_core::Kernel;
use quant_kernels::{QuantizedRescaleKernel, RescaleConfig};
use scheduler::{Scheduler, SchedulerConfig};
use std::sync::Arc;
use std::time::Instant;
use tensor_core::{DType, QuantizationInfo, Shape, Tensor, TensorInfo};

const ROWS: usize = 512;
const COLS: usize = 512;
const K_DEPTH: usize = 256;

fn main() -> anyhow::Result<()> {
    // Initialise tracing.
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Derive the output-stage parameters from the quantization of the
    // three tensors, the way a conv/matmul operator would.
    let input_q = QuantizationInfo::new(0.003, 128);
    let weights_q = QuantizationInfo::new(0.017, -7);
    let output_q = QuantizationInfo::new(0.25, 128);
    let config = RescaleConfig::from_quantization(input_q, weights_q, output_q, K_DEPTH)
        .context("composed scale out of range")?;
    println!(
        "multiplier {}, shift {}\n",
        config.params.multiplier, config.params.shift
    );

    println!("{:<10} {:>12} {:>10}", "Threads", "Elapsed", "Digest");
    println!("{}", "-".repeat(34));

    let mut reference: Option<Vec<u8>> = None;
    for threads in [1usize, 2, 4, 8] {
        let scheduler = Scheduler::new(&SchedulerConfig::with_threads(threads));
        let (kernel, output) = build_kernel(config)?;

        let start = Instant::now();
        scheduler.schedule(&kernel)?;
        let elapsed = start.elapsed();

        let bytes = output.as_bytes().to_vec();
        let digest: u64 = bytes
            .iter()
            .fold(0xcbf2_9ce4_8422_2325, |h, &b| {
                (h ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
            });
        println!("{threads:<10} {elapsed:>12.2?} {digest:>#10x}");

        match &reference {
            None => reference = Some(bytes),
            Some(expected) => assert_eq!(&bytes, expected, "output diverged at {threads} threads"),
        }
    }

    println!("\nAll thread counts produced identical output.");
    Ok(())
}

fn build_kernel(config: RescaleConfig) -> anyhow::Result<(Arc<dyn Kernel>, Arc<Tensor>)> {
    // Synthetic accumulators with the dynamic range a u8 matmul over
    // K_DEPTH terms actually produces.
    let values: Vec<i32> = (0..ROWS * COLS)
        .map(|i| ((i as i64 * 2_654_435_761 % 65_536) - 32_768) as i32)
        .collect();
    let mm = Arc::new(Tensor::from_i32(Shape::matrix(ROWS, COLS), &values)?);
    let col_sums: Vec<i32> = (0..COLS as i32).map(|x| x * 13 % 4096).collect();
    let row_sums: Vec<i32> = (0..ROWS as i32).map(|y| y * 29 % 4096).collect();
    let bias: Vec<i32> = (0..COLS as i32).map(|x| x - 256).collect();
    let output = Arc::new(Tensor::zeros(TensorInfo::new(
        Shape::matrix(ROWS, COLS),
        DType::QAsymmU8,
    )));
    let kernel = QuantizedRescaleKernel::configure(
        mm,
        Some(Arc::new(Tensor::from_i32(Shape::vector(COLS), &col_sums)?)),
        Some(Arc::new(Tensor::from_i32(Shape::vector(ROWS), &row_sums)?)),
        Some(Arc::new(Tensor::from_i32(Shape::vector(COLS), &bias)?)),
        output.clone(),
        config,
    )?;
    Ok((Arc::new(kernel), output))
}
