// fhir-fuzzing/src/mutators/coverage.rs
//! Resource fuzzer for `Coverage`

use crate::config::Flag;
use crate::context::FuzzerContext;
use crate::model::resources::{Coverage, ResourceKind};
use crate::mutators::{
    fuzz_child, fuzz_code, fuzz_list, fuzz_value, run_mutators, FhirFuzzer, FieldMutator,
};
use crate::primitives;

/// Fuzzer for the `Coverage` resource.
///
/// The KBV profile forbids `payor`, so that mutator only appears in the
/// non-KBV list.
pub struct CoverageFuzzer;

fn coverage_id(ctx: &mut FuzzerContext, v: &mut Coverage) {
    fuzz_value(ctx, "Coverage.id", &mut v.id, primitives::random_id);
}

fn coverage_meta(ctx: &mut FuzzerContext, v: &mut Coverage) {
    ctx.config.flags.push(Flag::OnlyProfile);
    fuzz_child(ctx, "Coverage.meta", &mut v.meta);
    ctx.config.flags.pop();
}

fn coverage_extension(ctx: &mut FuzzerContext, v: &mut Coverage) {
    ctx.config.flags.push(Flag::TriggeredBy(ResourceKind::Coverage));
    fuzz_list(ctx, "Coverage.extension", &mut v.extension);
    ctx.config.flags.pop();
}

fn coverage_identifier(ctx: &mut FuzzerContext, v: &mut Coverage) {
    fuzz_list(ctx, "Coverage.identifier", &mut v.identifier);
}

fn coverage_status(ctx: &mut FuzzerContext, v: &mut Coverage) {
    fuzz_code(ctx, "Coverage.status", &mut v.status);
}

fn coverage_type(ctx: &mut FuzzerContext, v: &mut Coverage) {
    fuzz_child(ctx, "Coverage.type", &mut v.type_);
}

fn coverage_subscriber(ctx: &mut FuzzerContext, v: &mut Coverage) {
    fuzz_child(ctx, "Coverage.subscriber", &mut v.subscriber);
}

fn coverage_beneficiary(ctx: &mut FuzzerContext, v: &mut Coverage) {
    fuzz_child(ctx, "Coverage.beneficiary", &mut v.beneficiary);
}

fn coverage_period(ctx: &mut FuzzerContext, v: &mut Coverage) {
    fuzz_child(ctx, "Coverage.period", &mut v.period);
}

fn coverage_payor(ctx: &mut FuzzerContext, v: &mut Coverage) {
    fuzz_list(ctx, "Coverage.payor", &mut v.payor);
}

impl CoverageFuzzer {
    /// The profile-aware, ordered mutator list
    pub fn mutators(ctx: &FuzzerContext) -> Vec<FieldMutator<Coverage>> {
        let mut mutators: Vec<FieldMutator<Coverage>> = vec![
            ("Coverage.id", coverage_id),
            ("Coverage.meta", coverage_meta),
            ("Coverage.extension", coverage_extension),
            ("Coverage.identifier", coverage_identifier),
            ("Coverage.status", coverage_status),
            ("Coverage.type", coverage_type),
            ("Coverage.subscriber", coverage_subscriber),
            ("Coverage.beneficiary", coverage_beneficiary),
            ("Coverage.period", coverage_period),
        ];
        if !ctx.config.flags.is_set(Flag::KbvProfile) {
            mutators.push(("Coverage.payor", coverage_payor));
        }
        mutators
    }
}

impl FhirFuzzer<Coverage> for CoverageFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Coverage {
        Coverage {
            id: Some(primitives::random_id(ctx)),
            meta: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
            status: ctx.pick_code(&[]),
            ..Coverage::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Coverage) {
        let mutators = Self::mutators(ctx);
        run_mutators(ctx, mutators, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FuzzConfig;
    use crate::model::codes::CoverageStatus;

    fn full_context() -> FuzzerContext {
        let config = FuzzConfig::new(100.0, 0.0).with_all_mutators();
        FuzzerContext::with_seed(config, 5)
    }

    #[test]
    fn test_kbv_profile_never_mutates_payor() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::KbvProfile);

        let mut coverage = Coverage::default();
        CoverageFuzzer.fuzz(&mut ctx, &mut coverage);
        assert!(coverage.payor.is_empty());

        ctx.config.flags.pop();
        CoverageFuzzer.fuzz(&mut ctx, &mut coverage);
        assert!(!coverage.payor.is_empty());
    }

    #[test]
    fn test_status_replacement_is_distinct() {
        let mut ctx = full_context();
        for _ in 0..20 {
            let mut coverage = Coverage {
                status: Some(CoverageStatus::Active),
                ..Coverage::default()
            };
            CoverageFuzzer.fuzz(&mut ctx, &mut coverage);
            assert!(coverage.status.is_some());
            assert_ne!(coverage.status, Some(CoverageStatus::Active));
        }
    }

    #[test]
    fn test_flag_stack_is_balanced_after_fuzz() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::KbvProfile);
        let mut coverage = Coverage::default();
        CoverageFuzzer.fuzz(&mut ctx, &mut coverage);

        assert_eq!(ctx.config.flags.pop(), Some(Flag::KbvProfile));
        assert_eq!(ctx.config.flags.pop(), None);
    }

    #[test]
    fn test_generate_random_seeds_id_meta_status() {
        let mut ctx = full_context();
        let coverage = CoverageFuzzer.generate_random(&mut ctx);
        assert!(coverage.id.is_some());
        assert!(coverage.meta.is_some());
        assert!(coverage.status.is_some());
        assert!(coverage.payor.is_empty());
    }
}
