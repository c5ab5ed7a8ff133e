// fhir-fuzzing/src/mutators/patient.rs
//! Resource fuzzer for `Patient`

use crate::config::Flag;
use crate::context::FuzzerContext;
use crate::model::resources::{Patient, ResourceKind};
use crate::mutators::{
    fuzz_boolean, fuzz_child, fuzz_code, fuzz_list, fuzz_value, run_mutators, FhirFuzzer,
    FieldMutator,
};
use crate::primitives;

/// Fuzzer for the `Patient` resource.
///
/// Under the KBV profile `telecom` is excluded from the mutator list.
pub struct PatientFuzzer;

fn patient_id(ctx: &mut FuzzerContext, v: &mut Patient) {
    fuzz_value(ctx, "Patient.id", &mut v.id, primitives::random_id);
}

fn patient_meta(ctx: &mut FuzzerContext, v: &mut Patient) {
    ctx.config.flags.push(Flag::OnlyProfile);
    fuzz_child(ctx, "Patient.meta", &mut v.meta);
    ctx.config.flags.pop();
}

fn patient_extension(ctx: &mut FuzzerContext, v: &mut Patient) {
    ctx.config.flags.push(Flag::TriggeredBy(ResourceKind::Patient));
    fuzz_list(ctx, "Patient.extension", &mut v.extension);
    ctx.config.flags.pop();
}

fn patient_identifier(ctx: &mut FuzzerContext, v: &mut Patient) {
    fuzz_list(ctx, "Patient.identifier", &mut v.identifier);
}

fn patient_active(ctx: &mut FuzzerContext, v: &mut Patient) {
    fuzz_boolean(ctx, "Patient.active", &mut v.active);
}

fn patient_name(ctx: &mut FuzzerContext, v: &mut Patient) {
    fuzz_list(ctx, "Patient.name", &mut v.name);
}

fn patient_telecom(ctx: &mut FuzzerContext, v: &mut Patient) {
    fuzz_list(ctx, "Patient.telecom", &mut v.telecom);
}

fn patient_gender(ctx: &mut FuzzerContext, v: &mut Patient) {
    fuzz_code(ctx, "Patient.gender", &mut v.gender);
}

fn patient_birth_date(ctx: &mut FuzzerContext, v: &mut Patient) {
    // birth dates stay within a plausible human lifetime
    fuzz_value(ctx, "Patient.birthDate", &mut v.birth_date, |ctx| {
        primitives::random_date_back(ctx, 100)
    });
}

fn patient_address(ctx: &mut FuzzerContext, v: &mut Patient) {
    fuzz_list(ctx, "Patient.address", &mut v.address);
}

fn patient_managing_organization(ctx: &mut FuzzerContext, v: &mut Patient) {
    fuzz_child(ctx, "Patient.managingOrganization", &mut v.managing_organization);
}

impl PatientFuzzer {
    /// The profile-aware, ordered mutator list
    pub fn mutators(ctx: &FuzzerContext) -> Vec<FieldMutator<Patient>> {
        let kbv = ctx.config.flags.is_set(Flag::KbvProfile);
        let mut mutators: Vec<FieldMutator<Patient>> = vec![
            ("Patient.id", patient_id),
            ("Patient.meta", patient_meta),
            ("Patient.extension", patient_extension),
            ("Patient.identifier", patient_identifier),
            ("Patient.active", patient_active),
            ("Patient.name", patient_name),
        ];
        if !kbv {
            mutators.push(("Patient.telecom", patient_telecom));
        }
        let tail: [FieldMutator<Patient>; 4] = [
            ("Patient.gender", patient_gender),
            ("Patient.birthDate", patient_birth_date),
            ("Patient.address", patient_address),
            ("Patient.managingOrganization", patient_managing_organization),
        ];
        mutators.extend(tail);
        mutators
    }
}

impl FhirFuzzer<Patient> for PatientFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Patient {
        Patient {
            id: Some(primitives::random_id(ctx)),
            meta: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
            name: ctx
                .fuzzer_for()
                .map(|f| vec![f.generate_random(ctx)])
                .unwrap_or_default(),
            birth_date: Some(primitives::random_date_back(ctx, 100)),
            ..Patient::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Patient) {
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
        FuzzerContext::with_seed(config, 21)
    }

    #[test]
    fn test_absent_fields_are_populated_at_full_intensity() {
        let mut ctx = full_context();
        let mut patient = Patient::default();
        PatientFuzzer.fuzz(&mut ctx, &mut patient);

        assert!(patient.id.is_some());
        assert!(patient.meta.is_some());
        assert!(patient.gender.is_some());
        assert!(patient.birth_date.is_some());
        assert!(!patient.name.is_empty());
        assert!(!patient.identifier.is_empty());
    }

    #[test]
    fn test_zero_intensity_leaves_document_untouched() {
        let mut ctx = FuzzerContext::with_seed(FuzzConfig::new(0.0, 50.0), 21);
        let mut patient = PatientFuzzer.generate_random(&mut ctx);
        let before = patient.clone();
        ctx.clear_log();

        PatientFuzzer.fuzz(&mut ctx, &mut patient);

        assert_eq!(patient, before);
        assert!(ctx.operation_log().is_empty());
    }

    #[test]
    fn test_populated_id_survives_repeated_fuzzing() {
        let mut ctx = full_context();
        // never take the clear branch
        ctx.config.set_percent_of_each(0.0);

        let mut patient = Patient::default();
        PatientFuzzer.fuzz(&mut ctx, &mut patient);
        let first_id = patient.id.clone();
        assert!(first_id.is_some());

        for _ in 0..5 {
            PatientFuzzer.fuzz(&mut ctx, &mut patient);
            assert!(patient.id.is_some());
        }
        // shape is stable, the value is not
        assert_ne!(patient.id, first_id);
    }

    #[test]
    fn test_kbv_profile_excludes_telecom() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::KbvProfile);

        let mut patient = Patient::default();
        PatientFuzzer.fuzz(&mut ctx, &mut patient);
        assert!(patient.telecom.is_empty());

        ctx.config.flags.pop();
        PatientFuzzer.fuzz(&mut ctx, &mut patient);
        assert!(!patient.telecom.is_empty());
    }

    #[test]
    fn test_birth_date_stays_in_the_past() {
        let mut ctx = full_context();
        ctx.config.set_percent_of_each(0.0);
        let today = chrono::Utc::now().date_naive();
        for _ in 0..20 {
            let mut patient = Patient::default();
            PatientFuzzer.fuzz(&mut ctx, &mut patient);
            assert!(patient.birth_date.unwrap() <= today);
        }
    }
}
