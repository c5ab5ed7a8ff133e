// fhir-fuzzing/src/mutators/mod.rs
//! The fuzzer trait, the canonical field-mutation helpers, and the list
//! mutation strategy
//!
//! Every field mutator in this crate is one call to a helper below. Each
//! helper appends exactly one `FuzzOperationResult`, including when it ends
//! up a no-op, so the log accounts for every attempted mutation site.

pub mod composition;
pub mod coverage;
pub mod datatypes;
pub mod medication;
pub mod medication_request;
pub mod organization;
pub mod patient;
pub mod practitioner;

use crate::context::{FuzzOperationResult, Fuzzable, FuzzerContext};
use crate::model::codes::CodeSet;
use rand::Rng;
use std::fmt::Debug;

/// Give up on generating a distinct replacement after this many draws
const DISTINCT_RETRIES: usize = 16;

/// Anything that can synthesize or mutate a value of type `T` against a
/// shared session context
pub trait FhirFuzzer<T> {
    /// Build a minimally-populated, internally consistent instance
    fn generate_random(&self, ctx: &mut FuzzerContext) -> T;

    /// Mutate `value` in place, driven by the context's config and RNG
    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut T);
}

/// A named, ordered field mutator of a resource or datatype
pub type FieldMutator<R> = (&'static str, fn(&mut FuzzerContext, &mut R));

/// Select a subset of the mutator list and run it in order.
///
/// An empty selection (zero intensity, or an empty list for the active
/// profile) leaves the value untouched with no log delta.
pub fn run_mutators<R>(ctx: &mut FuzzerContext, all: Vec<FieldMutator<R>>, value: &mut R) {
    for (name, mutator) in ctx.select_subset(all) {
        log::trace!("running mutator {}", name);
        mutator(ctx, value);
    }
}

fn snapshot<T: Debug>(value: &T) -> String {
    format!("{:?}", value)
}

/// Populate / clear / replace-with-different for a scalar optional field.
///
/// Absent: synthesize and set. Present: clear with `percent_of_each`
/// probability, else replace with a generated value guaranteed distinct
/// from the current one (best effort, bounded retries).
pub fn fuzz_value<T, F>(ctx: &mut FuzzerContext, field: &str, slot: &mut Option<T>, mut generate: F)
where
    T: PartialEq + Debug,
    F: FnMut(&mut FuzzerContext) -> T,
{
    let before = snapshot(slot);
    match slot.take() {
        None => *slot = Some(generate(ctx)),
        Some(current) => {
            if !ctx.each_flip() {
                let mut next = generate(ctx);
                let mut retries = 0;
                while next == current && retries < DISTINCT_RETRIES {
                    next = generate(ctx);
                    retries += 1;
                }
                *slot = Some(next);
            }
        }
    }
    ctx.record(FuzzOperationResult::new(field, before, snapshot(slot)));
}

/// Populate / clear / replace-with-different for a coded field.
///
/// Replacement excludes the current value; a single-member value set keeps
/// the current value and logs a no-op.
pub fn fuzz_code<E>(ctx: &mut FuzzerContext, field: &str, slot: &mut Option<E>)
where
    E: CodeSet + Debug,
{
    let before = snapshot(slot);
    match slot.take() {
        None => *slot = ctx.pick_code(&[]),
        Some(current) => {
            if !ctx.each_flip() {
                *slot = ctx.pick_code(&[current]).or(Some(current));
            }
        }
    }
    ctx.record(FuzzOperationResult::new(field, before, snapshot(slot)));
}

/// Populate / clear / toggle for an optional boolean field
pub fn fuzz_boolean(ctx: &mut FuzzerContext, field: &str, slot: &mut Option<bool>) {
    let before = snapshot(slot);
    match slot.take() {
        None => *slot = Some(ctx.rng().gen()),
        Some(current) => {
            if !ctx.each_flip() {
                *slot = Some(!current);
            }
        }
    }
    ctx.record(FuzzOperationResult::new(field, before, snapshot(slot)));
}

/// Populate / clear / recurse for a structured sub-field.
///
/// The nested fuzzer comes from the registry; an unregistered datatype makes
/// this a logged no-op rather than an error.
pub fn fuzz_child<T>(ctx: &mut FuzzerContext, field: &str, slot: &mut Option<T>)
where
    T: Fuzzable + Debug,
{
    let before = snapshot(slot);
    if let Some(fuzzer) = ctx.fuzzer_for::<T>() {
        if slot.is_none() {
            *slot = Some(fuzzer.generate_random(ctx));
        } else if ctx.each_flip() {
            *slot = None;
        } else if let Some(value) = slot.as_mut() {
            fuzzer.fuzz(ctx, value);
        }
    }
    ctx.record(FuzzOperationResult::new(field, before, snapshot(slot)));
}

/// The list mutation strategy for repeated structured fields.
///
/// Empty or absent: synthesize a singleton. Otherwise exactly one of:
/// mutate one random element in place, append a fresh element, or clear the
/// whole list. A missing element fuzzer makes this a logged no-op.
pub fn fuzz_list<T>(ctx: &mut FuzzerContext, field: &str, list: &mut Vec<T>)
where
    T: Fuzzable + Debug,
{
    let before = snapshot(list);
    if let Some(fuzzer) = ctx.fuzzer_for::<T>() {
        if list.is_empty() {
            let element = fuzzer.generate_random(ctx);
            list.push(element);
        } else {
            match ctx.rng().gen_range(0..3) {
                0 => {
                    let idx = ctx.rng().gen_range(0..list.len());
                    fuzzer.fuzz(ctx, &mut list[idx]);
                }
                1 => {
                    let element = fuzzer.generate_random(ctx);
                    list.push(element);
                }
                _ => list.clear(),
            }
        }
    }
    ctx.record(FuzzOperationResult::new(field, before, snapshot(list)));
}

/// List strategy for repeated scalar fields (string lists and the like),
/// parameterized by a value generator instead of a registry fuzzer
pub fn fuzz_value_list<T, F>(
    ctx: &mut FuzzerContext,
    field: &str,
    list: &mut Vec<T>,
    mut generate: F,
) where
    T: Debug,
    F: FnMut(&mut FuzzerContext) -> T,
{
    let before = snapshot(list);
    if list.is_empty() {
        let element = generate(ctx);
        list.push(element);
    } else {
        match ctx.rng().gen_range(0..3) {
            0 => {
                let idx = ctx.rng().gen_range(0..list.len());
                list[idx] = generate(ctx);
            }
            1 => {
                let element = generate(ctx);
                list.push(element);
            }
            _ => list.clear(),
        }
    }
    ctx.record(FuzzOperationResult::new(field, before, snapshot(list)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FuzzConfig;
    use crate::model::codes::CoverageStatus;
    use crate::model::datatypes::{Dosage, Period};
    use crate::primitives;

    fn context() -> FuzzerContext {
        FuzzerContext::with_seed(FuzzConfig::default(), 11)
    }

    #[test]
    fn test_fuzz_value_populates_absent_field() {
        let mut ctx = context();
        let mut slot: Option<String> = None;
        fuzz_value(&mut ctx, "test.field", &mut slot, |ctx| {
            primitives::random_string(ctx, 8)
        });
        assert!(slot.is_some());
        assert_eq!(ctx.operation_log().len(), 1);
    }

    #[test]
    fn test_fuzz_value_replaces_with_distinct_value() {
        let mut ctx = context();
        // never clear, always replace
        ctx.config.set_percent_of_each(0.0);
        for _ in 0..50 {
            let mut slot = Some("fixed".to_string());
            fuzz_value(&mut ctx, "test.field", &mut slot, |ctx| {
                primitives::random_string(ctx, 6)
            });
            assert_ne!(slot.as_deref(), Some("fixed"));
        }
    }

    #[test]
    fn test_fuzz_value_clears_at_full_each_probability() {
        let mut ctx = context();
        ctx.config.set_percent_of_each(100.0);
        let mut slot = Some(42u32);
        fuzz_value(&mut ctx, "test.field", &mut slot, |ctx| {
            ctx.rng().gen_range(0..100)
        });
        assert!(slot.is_none());
        assert_eq!(ctx.operation_log().len(), 1);
    }

    #[test]
    fn test_fuzz_code_excludes_current_value() {
        let mut ctx = context();
        ctx.config.set_percent_of_each(0.0);
        for _ in 0..50 {
            let mut slot = Some(CoverageStatus::Active);
            fuzz_code(&mut ctx, "Coverage.status", &mut slot);
            assert!(slot.is_some());
            assert_ne!(slot, Some(CoverageStatus::Active));
        }
    }

    #[test]
    fn test_fuzz_child_without_registered_fuzzer_is_logged_noop() {
        let mut ctx = context();
        ctx.fuzzers.period = None;
        let mut slot: Option<Period> = None;
        fuzz_child(&mut ctx, "Coverage.period", &mut slot);

        assert!(slot.is_none());
        assert_eq!(ctx.operation_log().len(), 1);
        assert!(ctx.operation_log()[0].is_noop());
    }

    #[test]
    fn test_fuzz_list_synthesizes_singleton_when_empty() {
        let mut ctx = context();
        let mut list: Vec<Dosage> = Vec::new();
        fuzz_list(&mut ctx, "MedicationRequest.dosageInstruction", &mut list);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_fuzz_list_takes_exactly_one_branch() {
        let mut ctx = context();
        for _ in 0..50 {
            let mut list: Vec<Period> = vec![Period::default(), Period::default()];
            ctx.clear_log();
            fuzz_list(&mut ctx, "test.list", &mut list);
            // mutate-in-place keeps 2, append makes 3, clear makes 0
            assert!(matches!(list.len(), 0 | 2 | 3));
            assert!(!ctx.operation_log().is_empty());
        }
    }

    #[test]
    fn test_fuzz_value_list_branches() {
        let mut ctx = context();
        let mut list: Vec<String> = Vec::new();
        fuzz_value_list(&mut ctx, "Address.line", &mut list, |ctx| {
            primitives::random_street_line(ctx)
        });
        assert_eq!(list.len(), 1);

        for _ in 0..30 {
            let mut list = vec!["a".to_string(), "b".to_string()];
            fuzz_value_list(&mut ctx, "Address.line", &mut list, |ctx| {
                primitives::random_string(ctx, 5)
            });
            assert!(matches!(list.len(), 0 | 2 | 3));
        }
    }

    #[test]
    fn test_log_completeness_for_leaf_mutators() {
        let mut ctx = context();
        let mut a: Option<String> = None;
        let mut b = Some(true);
        let mut c = Some(CoverageStatus::Draft);

        fuzz_value(&mut ctx, "a", &mut a, |ctx| primitives::random_id(ctx));
        fuzz_boolean(&mut ctx, "b", &mut b);
        fuzz_code(&mut ctx, "c", &mut c);

        let log = ctx.operation_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].field, "a");
        assert_eq!(log[1].field, "b");
        assert_eq!(log[2].field, "c");
    }
}
