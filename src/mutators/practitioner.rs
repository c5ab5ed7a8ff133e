// fhir-fuzzing/src/mutators/practitioner.rs
//! Resource fuzzer for `Practitioner`

use crate::config::Flag;
use crate::context::{FuzzOperationResult, FuzzerContext};
use crate::model::resources::{Practitioner, PractitionerQualification, ResourceKind};
use crate::mutators::{
    fuzz_boolean, fuzz_child, fuzz_list, fuzz_value, run_mutators, FhirFuzzer, FieldMutator,
};
use crate::primitives;
use rand::Rng;

/// Fuzzer for the `Practitioner` resource.
///
/// Under the KBV profile `telecom` is excluded from the mutator list.
pub struct PractitionerFuzzer;

fn practitioner_id(ctx: &mut FuzzerContext, v: &mut Practitioner) {
    fuzz_value(ctx, "Practitioner.id", &mut v.id, primitives::random_id);
}

fn practitioner_meta(ctx: &mut FuzzerContext, v: &mut Practitioner) {
    ctx.config.flags.push(Flag::OnlyProfile);
    fuzz_child(ctx, "Practitioner.meta", &mut v.meta);
    ctx.config.flags.pop();
}

fn practitioner_extension(ctx: &mut FuzzerContext, v: &mut Practitioner) {
    ctx.config
        .flags
        .push(Flag::TriggeredBy(ResourceKind::Practitioner));
    fuzz_list(ctx, "Practitioner.extension", &mut v.extension);
    ctx.config.flags.pop();
}

fn practitioner_identifier(ctx: &mut FuzzerContext, v: &mut Practitioner) {
    fuzz_list(ctx, "Practitioner.identifier", &mut v.identifier);
}

fn practitioner_active(ctx: &mut FuzzerContext, v: &mut Practitioner) {
    fuzz_boolean(ctx, "Practitioner.active", &mut v.active);
}

fn practitioner_name(ctx: &mut FuzzerContext, v: &mut Practitioner) {
    fuzz_list(ctx, "Practitioner.name", &mut v.name);
}

fn practitioner_telecom(ctx: &mut FuzzerContext, v: &mut Practitioner) {
    fuzz_list(ctx, "Practitioner.telecom", &mut v.telecom);
}

fn random_qualification(ctx: &mut FuzzerContext) -> PractitionerQualification {
    PractitionerQualification {
        code: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
        period: None,
    }
}

// Qualifications are practitioner-local, so the list strategy is spelled
// out here instead of going through the registry.
fn practitioner_qualification(ctx: &mut FuzzerContext, v: &mut Practitioner) {
    let before = format!("{:?}", v.qualification);
    if v.qualification.is_empty() {
        let qualification = random_qualification(ctx);
        v.qualification.push(qualification);
    } else {
        match ctx.rng().gen_range(0..3) {
            0 => {
                let idx = ctx.rng().gen_range(0..v.qualification.len());
                v.qualification[idx].code =
                    ctx.fuzzer_for().map(|f| f.generate_random(ctx));
            }
            1 => {
                let qualification = random_qualification(ctx);
                v.qualification.push(qualification);
            }
            _ => v.qualification.clear(),
        }
    }
    let after = format!("{:?}", v.qualification);
    ctx.record(FuzzOperationResult::new(
        "Practitioner.qualification",
        before,
        after,
    ));
}

impl PractitionerFuzzer {
    /// The profile-aware, ordered mutator list
    pub fn mutators(ctx: &FuzzerContext) -> Vec<FieldMutator<Practitioner>> {
        let mut mutators: Vec<FieldMutator<Practitioner>> = vec![
            ("Practitioner.id", practitioner_id),
            ("Practitioner.meta", practitioner_meta),
            ("Practitioner.extension", practitioner_extension),
            ("Practitioner.identifier", practitioner_identifier),
            ("Practitioner.active", practitioner_active),
            ("Practitioner.name", practitioner_name),
        ];
        if !ctx.config.flags.is_set(Flag::KbvProfile) {
            mutators.push(("Practitioner.telecom", practitioner_telecom));
        }
        mutators.push(("Practitioner.qualification", practitioner_qualification));
        mutators
    }
}

impl FhirFuzzer<Practitioner> for PractitionerFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Practitioner {
        Practitioner {
            id: Some(primitives::random_id(ctx)),
            meta: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
            name: ctx
                .fuzzer_for()
                .map(|f| vec![f.generate_random(ctx)])
                .unwrap_or_default(),
            ..Practitioner::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Practitioner) {
        let mutators = Self::mutators(ctx);
        run_mutators(ctx, mutators, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FuzzConfig;

    fn full_context() -> FuzzerContext {
        let config = FuzzConfig::new(100.0, 0.0).with_all_mutators();
        FuzzerContext::with_seed(config, 41)
    }

    #[test]
    fn test_full_fuzz_populates_practitioner() {
        let mut ctx = full_context();
        let mut practitioner = Practitioner::default();
        PractitionerFuzzer.fuzz(&mut ctx, &mut practitioner);

        assert!(practitioner.id.is_some());
        assert!(practitioner.active.is_some());
        assert!(!practitioner.name.is_empty());
        assert!(!practitioner.qualification.is_empty());
        assert!(!practitioner.telecom.is_empty());
    }

    #[test]
    fn test_kbv_profile_excludes_telecom() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::KbvProfile);

        let mut practitioner = Practitioner::default();
        PractitionerFuzzer.fuzz(&mut ctx, &mut practitioner);
        assert!(practitioner.telecom.is_empty());
    }

    #[test]
    fn test_generate_random_is_partial() {
        let mut ctx = full_context();
        let practitioner = PractitionerFuzzer.generate_random(&mut ctx);

        assert!(practitioner.id.is_some());
        assert!(practitioner.meta.is_some());
        assert!(!practitioner.name.is_empty());
        assert!(practitioner.identifier.is_empty());
        assert!(practitioner.qualification.is_empty());
    }
}
