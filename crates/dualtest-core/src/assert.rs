//! Comparison engine.
//!
//! Every evaluator follows the same shape: do nothing once the current test
//! is already decided, otherwise compare, and on mismatch report through
//! [`TestContext::fail_with`] and return [`Abort::Failed`]. Only the first
//! failure of a test is ever reported.

use crate::context::TestContext;
use crate::report::{Detail, ReportEvent, Value};
use crate::state::{Abort, TestResult, Verdict};
use crate::style::{ArrayElement, DisplayStyle, NumberKind};

impl TestContext<'_> {
    /// Fails iff `mask & expected != mask & actual`; unmasked bits are never
    /// compared.
    pub fn assert_bits(
        &mut self,
        mask: u64,
        expected: u64,
        actual: u64,
        message: Option<&str>,
        line: u32,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        if mask & expected != mask & actual {
            let detail = Detail::Mismatch {
                element: None,
                expected: Value::Masked {
                    mask,
                    bits: expected,
                },
                actual: Value::Masked { mask, bits: actual },
            };
            return Err(self.fail_with(line, detail, message));
        }
        Ok(())
    }

    /// Exact integer equality. `style` only changes how values are shown.
    pub fn assert_equal_number(
        &mut self,
        expected: i64,
        actual: i64,
        message: Option<&str>,
        line: u32,
        style: DisplayStyle,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        if expected != actual {
            let detail = Detail::Mismatch {
                element: None,
                expected: Value::Number(expected, style),
                actual: Value::Number(actual, style),
            };
            return Err(self.fail_with(line, detail, message));
        }
        Ok(())
    }

    /// Element-wise equality of the first `num_elements` integers.
    ///
    /// The element type fixes the width; `kind` picks signed, unsigned or hex
    /// rendering. Reports the index of the first differing element.
    pub fn assert_equal_int_array<T: ArrayElement>(
        &mut self,
        expected: Option<&[T]>,
        actual: Option<&[T]>,
        num_elements: usize,
        message: Option<&str>,
        line: u32,
        kind: NumberKind,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        let Some((expected, actual)) =
            self.check_array_inputs(expected, actual, num_elements, message, line)?
        else {
            return Ok(());
        };

        let style = DisplayStyle::new(kind, T::WIDTH);
        for (index, (exp, act)) in expected.iter().zip(actual).take(num_elements).enumerate() {
            if exp != act {
                let detail = Detail::Mismatch {
                    element: Some(index),
                    expected: Value::Number(exp.to_raw(), style),
                    actual: Value::Number(act.to_raw(), style),
                };
                return Err(self.fail_with(line, detail, message));
            }
        }
        Ok(())
    }

    /// `f32` arrays with a tolerance of `float_precision * expected` per
    /// element. A zero expected element therefore demands exact equality.
    pub fn assert_equal_float_array(
        &mut self,
        expected: Option<&[f32]>,
        actual: Option<&[f32]>,
        num_elements: usize,
        message: Option<&str>,
        line: u32,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        let Some((expected, actual)) =
            self.check_array_inputs(expected, actual, num_elements, message, line)?
        else {
            return Ok(());
        };

        let precision = self.config.float_precision;
        for (index, (&exp, &act)) in expected.iter().zip(actual).take(num_elements).enumerate() {
            let diff = (exp - act).abs();
            let tolerance = (precision * exp).abs();
            if diff > tolerance {
                let detail = self.float_detail(Some(index), f64::from(exp), f64::from(act));
                return Err(self.fail_with(line, detail, message));
            }
        }
        Ok(())
    }

    /// `f64` counterpart of [`TestContext::assert_equal_float_array`].
    pub fn assert_equal_double_array(
        &mut self,
        expected: Option<&[f64]>,
        actual: Option<&[f64]>,
        num_elements: usize,
        message: Option<&str>,
        line: u32,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        let Some((expected, actual)) =
            self.check_array_inputs(expected, actual, num_elements, message, line)?
        else {
            return Ok(());
        };

        let precision = self.config.double_precision;
        for (index, (&exp, &act)) in expected.iter().zip(actual).take(num_elements).enumerate() {
            let diff = (exp - act).abs();
            let tolerance = (precision * exp).abs();
            if diff > tolerance {
                let detail = self.float_detail(Some(index), exp, act);
                return Err(self.fail_with(line, detail, message));
            }
        }
        Ok(())
    }

    /// Fails iff `|actual - expected| > |delta|`.
    pub fn assert_floats_within(
        &mut self,
        delta: f32,
        expected: f32,
        actual: f32,
        message: Option<&str>,
        line: u32,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        if delta.abs() < (actual - expected).abs() {
            let detail = self.float_detail(None, f64::from(expected), f64::from(actual));
            return Err(self.fail_with(line, detail, message));
        }
        Ok(())
    }

    /// Fails iff `|actual - expected| > |delta|`.
    pub fn assert_doubles_within(
        &mut self,
        delta: f64,
        expected: f64,
        actual: f64,
        message: Option<&str>,
        line: u32,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        if delta.abs() < (actual - expected).abs() {
            let detail = self.float_detail(None, expected, actual);
            return Err(self.fail_with(line, detail, message));
        }
        Ok(())
    }

    /// Fails iff the distance between `expected` and `actual` exceeds `delta`.
    ///
    /// Signed styles measure the distance on `i64`; unsigned and hex styles on
    /// `u64`, subtracting the smaller operand from the larger.
    pub fn assert_numbers_within(
        &mut self,
        delta: i64,
        expected: i64,
        actual: i64,
        message: Option<&str>,
        line: u32,
        style: DisplayStyle,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        let outside = if style.is_signed() {
            i128::from(actual.abs_diff(expected)) > i128::from(delta)
        } else {
            let (expected, actual, delta) = (expected as u64, actual as u64, delta as u64);
            let distance = if actual > expected {
                actual - expected
            } else {
                expected - actual
            };
            distance > delta
        };
        if outside {
            let detail = Detail::NumbersNotWithin {
                delta: Value::Number(delta, style),
                expected: Value::Number(expected, style),
                actual: Value::Number(actual, style),
            };
            return Err(self.fail_with(line, detail, message));
        }
        Ok(())
    }

    /// Byte-wise string equality. Two absent strings are equal; an absent and
    /// a present one are not. The report shows both strings in full.
    pub fn assert_equal_string(
        &mut self,
        expected: Option<&str>,
        actual: Option<&str>,
        message: Option<&str>,
        line: u32,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        if !strings_equal(expected, actual) {
            let detail = Detail::Mismatch {
                element: None,
                expected: Value::Text(expected),
                actual: Value::Text(actual),
            };
            return Err(self.fail_with(line, detail, message));
        }
        Ok(())
    }

    /// Array of strings compared with [`TestContext::assert_equal_string`]
    /// semantics. The element index is only shown when more than one element
    /// was requested.
    ///
    /// The reported index counts forward from the first element, the same as
    /// [`TestContext::assert_equal_int_array`].
    pub fn assert_equal_string_array(
        &mut self,
        expected: Option<&[Option<&str>]>,
        actual: Option<&[Option<&str>]>,
        num_elements: usize,
        message: Option<&str>,
        line: u32,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        let Some((expected, actual)) =
            self.check_array_inputs(expected, actual, num_elements, message, line)?
        else {
            return Ok(());
        };

        for (index, (&exp, &act)) in expected.iter().zip(actual).take(num_elements).enumerate() {
            if !strings_equal(exp, act) {
                let detail = Detail::Mismatch {
                    element: (num_elements > 1).then_some(index),
                    expected: Value::Text(exp),
                    actual: Value::Text(act),
                };
                return Err(self.fail_with(line, detail, message));
            }
        }
        Ok(())
    }

    /// Compares `num_elements` blocks of `length` bytes each and reports the
    /// block and byte offset of the first difference.
    pub fn assert_equal_memory(
        &mut self,
        expected: Option<&[u8]>,
        actual: Option<&[u8]>,
        length: usize,
        num_elements: usize,
        message: Option<&str>,
        line: u32,
    ) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        if length == 0 || num_elements == 0 {
            return Err(self.fail_with(line, Detail::Pointless, message));
        }
        let Some((expected, actual)) = self.check_pair_for_null(expected, actual, message, line)?
        else {
            return Ok(());
        };
        let total = length.checked_mul(num_elements);
        if total.is_none_or(|total| expected.len() < total || actual.len() < total) {
            return Err(self.fail_with(line, Detail::ShortArray, message));
        }

        for (element, (exp_block, act_block)) in expected
            .chunks_exact(length)
            .zip(actual.chunks_exact(length))
            .take(num_elements)
            .enumerate()
        {
            for (byte, (&exp, &act)) in exp_block.iter().zip(act_block).enumerate() {
                if exp != act {
                    let detail = Detail::Memory {
                        element: (num_elements > 1).then_some(element),
                        byte,
                        expected: exp,
                        actual: act,
                    };
                    return Err(self.fail_with(line, detail, message));
                }
            }
        }
        Ok(())
    }

    /// Fails the current test unconditionally.
    pub fn fail(&mut self, message: Option<&str>, line: u32) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        Err(self.fail_with(line, Detail::None, message))
    }

    /// Marks the current test ignored and ends it. `tear_down` is skipped for
    /// ignored tests.
    pub fn ignore(&mut self, message: Option<&str>, line: u32) -> TestResult {
        if self.state.is_decided() {
            return Ok(());
        }
        self.emit(&ReportEvent {
            verdict: Verdict::Ignore,
            line,
            detail: Detail::None,
            message,
        });
        self.state.mark_ignored();
        log::debug!(
            "{}:{}: {} ignored",
            self.state.test_file(),
            line,
            self.state.test_name()
        );
        Err(Abort::Ignored)
    }

    /// Shared malformed-input handling for array evaluators.
    ///
    /// `Ok(None)` means both sides are absent (vacuously equal).
    fn check_array_inputs<'v, T>(
        &mut self,
        expected: Option<&'v [T]>,
        actual: Option<&'v [T]>,
        num_elements: usize,
        message: Option<&str>,
        line: u32,
    ) -> Result<Option<(&'v [T], &'v [T])>, Abort> {
        if num_elements == 0 {
            return Err(self.fail_with(line, Detail::Pointless, message));
        }
        let Some((expected, actual)) = self.check_pair_for_null(expected, actual, message, line)?
        else {
            return Ok(None);
        };
        if expected.len() < num_elements || actual.len() < num_elements {
            return Err(self.fail_with(line, Detail::ShortArray, message));
        }
        Ok(Some((expected, actual)))
    }

    fn check_pair_for_null<'v, T: ?Sized>(
        &mut self,
        expected: Option<&'v T>,
        actual: Option<&'v T>,
        message: Option<&str>,
        line: u32,
    ) -> Result<Option<(&'v T, &'v T)>, Abort> {
        match (expected, actual) {
            (None, None) => Ok(None),
            (None, Some(_)) => Err(self.fail_with(line, Detail::NullExpected, message)),
            (Some(_), None) => Err(self.fail_with(line, Detail::NullActual, message)),
            (Some(expected), Some(actual)) => Ok(Some((expected, actual))),
        }
    }

    fn float_detail(&self, element: Option<usize>, expected: f64, actual: f64) -> Detail<'static> {
        if self.config.float_verbose {
            Detail::Mismatch {
                element,
                expected: Value::Float(expected),
                actual: Value::Float(actual),
            }
        } else {
            Detail::NotWithinDelta { element }
        }
    }
}

fn strings_equal(expected: Option<&str>, actual: Option<&str>) -> bool {
    match (expected, actual) {
        (Some(expected), Some(actual)) => expected.as_bytes() == actual.as_bytes(),
        (None, None) => true,
        _ => false,
    }
}
