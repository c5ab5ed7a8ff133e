// fhir-fuzzing/src/mutators/medication.rs
//! Resource fuzzer for `Medication`

use crate::config::Flag;
use crate::context::{FuzzOperationResult, FuzzerContext};
use crate::model::resources::{Medication, MedicationBatch, ResourceKind};
use crate::mutators::{
    fuzz_child, fuzz_code, fuzz_list, fuzz_value, run_mutators, FhirFuzzer, FieldMutator,
};
use crate::primitives;

/// Fuzzer for the `Medication` resource.
///
/// The KBV profile carries no batch data, so `batch` only appears in the
/// non-KBV mutator list.
pub struct MedicationFuzzer;

fn medication_id(ctx: &mut FuzzerContext, v: &mut Medication) {
    fuzz_value(ctx, "Medication.id", &mut v.id, primitives::random_id);
}

fn medication_meta(ctx: &mut FuzzerContext, v: &mut Medication) {
    ctx.config.flags.push(Flag::OnlyProfile);
    fuzz_child(ctx, "Medication.meta", &mut v.meta);
    ctx.config.flags.pop();
}

fn medication_extension(ctx: &mut FuzzerContext, v: &mut Medication) {
    ctx.config.flags.push(Flag::TriggeredBy(ResourceKind::Medication));
    fuzz_list(ctx, "Medication.extension", &mut v.extension);
    ctx.config.flags.pop();
}

fn medication_identifier(ctx: &mut FuzzerContext, v: &mut Medication) {
    fuzz_list(ctx, "Medication.identifier", &mut v.identifier);
}

fn medication_code(ctx: &mut FuzzerContext, v: &mut Medication) {
    fuzz_child(ctx, "Medication.code", &mut v.code);
}

fn medication_status(ctx: &mut FuzzerContext, v: &mut Medication) {
    fuzz_code(ctx, "Medication.status", &mut v.status);
}

fn medication_form(ctx: &mut FuzzerContext, v: &mut Medication) {
    fuzz_child(ctx, "Medication.form", &mut v.form);
}

fn medication_amount(ctx: &mut FuzzerContext, v: &mut Medication) {
    fuzz_child(ctx, "Medication.amount", &mut v.amount);
}

fn random_batch(ctx: &mut FuzzerContext) -> MedicationBatch {
    MedicationBatch {
        lot_number: Some(primitives::random_string(ctx, 10)),
        expiration_date: Some(primitives::random_date(ctx)),
    }
}

// Batch is medication-local, so the populate/clear/replace shape is applied
// directly instead of going through the registry.
fn medication_batch(ctx: &mut FuzzerContext, v: &mut Medication) {
    let before = format!("{:?}", v.batch);
    match v.batch.take() {
        None => v.batch = Some(random_batch(ctx)),
        Some(current) => {
            if !ctx.each_flip() {
                let mut next = random_batch(ctx);
                if next == current {
                    next.lot_number = Some(primitives::random_string(ctx, 12));
                }
                v.batch = Some(next);
            }
        }
    }
    let after = format!("{:?}", v.batch);
    ctx.record(FuzzOperationResult::new("Medication.batch", before, after));
}

impl MedicationFuzzer {
    /// The profile-aware, ordered mutator list
    pub fn mutators(ctx: &FuzzerContext) -> Vec<FieldMutator<Medication>> {
        let mut mutators: Vec<FieldMutator<Medication>> = vec![
            ("Medication.id", medication_id),
            ("Medication.meta", medication_meta),
            ("Medication.extension", medication_extension),
            ("Medication.identifier", medication_identifier),
            ("Medication.code", medication_code),
            ("Medication.status", medication_status),
            ("Medication.form", medication_form),
            ("Medication.amount", medication_amount),
        ];
        if !ctx.config.flags.is_set(Flag::KbvProfile) {
            mutators.push(("Medication.batch", medication_batch));
        }
        mutators
    }
}

impl FhirFuzzer<Medication> for MedicationFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Medication {
        Medication {
            id: Some(primitives::random_id(ctx)),
            meta: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
            code: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
            ..Medication::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Medication) {
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
        FuzzerContext::with_seed(config, 29)
    }

    #[test]
    fn test_full_fuzz_populates_medication() {
        let mut ctx = full_context();
        let mut medication = Medication::default();
        MedicationFuzzer.fuzz(&mut ctx, &mut medication);

        assert!(medication.id.is_some());
        assert!(medication.code.is_some());
        assert!(medication.status.is_some());
        assert!(medication.form.is_some());
        assert!(medication.amount.is_some());
        assert!(medication.batch.is_some());
    }

    #[test]
    fn test_kbv_profile_excludes_batch() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::KbvProfile);

        let mut medication = Medication::default();
        MedicationFuzzer.fuzz(&mut ctx, &mut medication);
        assert!(medication.batch.is_none());
    }

    #[test]
    fn test_amount_recursion_reaches_quantities() {
        let mut ctx = full_context();
        let mut medication = Medication::default();
        MedicationFuzzer.fuzz(&mut ctx, &mut medication);

        let amount = medication.amount.unwrap();
        assert!(amount.numerator.is_some());
        assert!(amount.denominator.is_some());
    }
}
