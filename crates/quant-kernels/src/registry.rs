// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operator lookup and up-front validation.
//!
//! Graph builders probe candidate configurations through
//! [`validate_operator`] before any buffer is allocated; the same
//! checks run again inside each kernel's `configure()`.

use crate::fill_border::FillBorderKernel;
use crate::rescale::{QuantizedRescaleKernel, RescaleConfig};
use kernel_core::{BorderMode, ValidateError};
use tensor_core::{BorderSize, TensorInfo};

/// A candidate operator configuration, described by descriptors only.
#[derive(Debug)]
pub enum OperatorSpec<'a> {
    QuantizedRescale {
        mm: &'a TensorInfo,
        col_sums: Option<&'a TensorInfo>,
        row_sums: Option<&'a TensorInfo>,
        bias: Option<&'a TensorInfo>,
        output: &'a TensorInfo,
        config: &'a RescaleConfig,
    },
    FillBorder {
        tensor: &'a TensorInfo,
        mode: BorderMode,
        border: BorderSize,
    },
}

impl OperatorSpec<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            OperatorSpec::QuantizedRescale { .. } => "quantized_rescale",
            OperatorSpec::FillBorder { .. } => "fill_border",
        }
    }
}

/// Names of the kernels this crate provides.
pub fn kernel_names() -> &'static [&'static str] {
    &["quantized_rescale", "fill_border"]
}

/// Checks `spec` without touching tensor data.
pub fn validate_operator(spec: &OperatorSpec<'_>) -> Result<(), ValidateError> {
    match spec {
        OperatorSpec::QuantizedRescale {
            mm,
            col_sums,
            row_sums,
            bias,
            output,
            config,
        } => QuantizedRescaleKernel::validate(mm, *col_sums, *row_sums, *bias, output, config),
        OperatorSpec::FillBorder {
            tensor,
            mode,
            border,
        } => FillBorderKernel::validate(tensor, *mode, *border),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rescale::RescaleParams;
    use tensor_core::{DType, Shape};

    #[test]
    fn test_validate_dispatch() {
        let mm = TensorInfo::new(Shape::matrix(2, 3), DType::S32);
        let out = TensorInfo::new(Shape::matrix(2, 3), DType::QAsymmU8);
        let config = RescaleConfig {
            a_offset: 0,
            b_offset: 0,
            k_depth: 0,
            params: RescaleParams::full_range(1 << 30, 0),
        };
        let spec = OperatorSpec::QuantizedRescale {
            mm: &mm,
            col_sums: None,
            row_sums: None,
            bias: None,
            output: &out,
            config: &config,
        };
        assert_eq!(spec.name(), "quantized_rescale");
        validate_operator(&spec).unwrap();

        let fill = OperatorSpec::FillBorder {
            tensor: &out,
            mode: BorderMode::Constant,
            border: BorderSize::uniform(1),
        };
        // No reserved padding, so the constant fill is rejected.
        assert!(validate_operator(&fill).is_err());
    }

    #[test]
    fn test_kernel_names_cover_specs() {
        assert_eq!(kernel_names().len(), 2);
        assert!(kernel_names().contains(&"quantized_rescale"));
    }
}
