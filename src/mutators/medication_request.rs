// fhir-fuzzing/src/mutators/medication_request.rs
//! Resource fuzzer for `MedicationRequest`

use crate::config::Flag;
use crate::context::{FuzzOperationResult, FuzzerContext};
use crate::model::resources::{DispenseRequest, MedicationRequest, ResourceKind};
use crate::mutators::{
    fuzz_child, fuzz_code, fuzz_list, fuzz_value, run_mutators, FhirFuzzer, FieldMutator,
};
use crate::primitives;

/// Fuzzer for the `MedicationRequest` resource.
///
/// The KBV profile forbids free-text notes, so `note` only appears in the
/// non-KBV mutator list.
pub struct MedicationRequestFuzzer;

fn request_id(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_value(ctx, "MedicationRequest.id", &mut v.id, primitives::random_id);
}

fn request_meta(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    ctx.config.flags.push(Flag::OnlyProfile);
    fuzz_child(ctx, "MedicationRequest.meta", &mut v.meta);
    ctx.config.flags.pop();
}

fn request_extension(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    ctx.config
        .flags
        .push(Flag::TriggeredBy(ResourceKind::MedicationRequest));
    fuzz_list(ctx, "MedicationRequest.extension", &mut v.extension);
    ctx.config.flags.pop();
}

fn request_identifier(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_list(ctx, "MedicationRequest.identifier", &mut v.identifier);
}

fn request_status(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_code(ctx, "MedicationRequest.status", &mut v.status);
}

fn request_intent(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_code(ctx, "MedicationRequest.intent", &mut v.intent);
}

fn request_medication(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_child(
        ctx,
        "MedicationRequest.medicationReference",
        &mut v.medication_reference,
    );
}

fn request_subject(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_child(ctx, "MedicationRequest.subject", &mut v.subject);
}

fn request_authored_on(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_value(
        ctx,
        "MedicationRequest.authoredOn",
        &mut v.authored_on,
        primitives::random_date,
    );
}

fn request_requester(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_child(ctx, "MedicationRequest.requester", &mut v.requester);
}

fn request_insurance(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_list(ctx, "MedicationRequest.insurance", &mut v.insurance);
}

fn request_note(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_list(ctx, "MedicationRequest.note", &mut v.note);
}

fn request_dosage_instruction(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    fuzz_list(
        ctx,
        "MedicationRequest.dosageInstruction",
        &mut v.dosage_instruction,
    );
}

fn random_dispense_request(ctx: &mut FuzzerContext) -> DispenseRequest {
    DispenseRequest {
        quantity: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
        validity_period: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
    }
}

// DispenseRequest is request-local, so the populate/clear/replace shape is
// applied directly instead of going through the registry.
fn request_dispense(ctx: &mut FuzzerContext, v: &mut MedicationRequest) {
    let before = format!("{:?}", v.dispense_request);
    match v.dispense_request.take() {
        None => v.dispense_request = Some(random_dispense_request(ctx)),
        Some(_) => {
            if !ctx.each_flip() {
                v.dispense_request = Some(random_dispense_request(ctx));
            }
        }
    }
    let after = format!("{:?}", v.dispense_request);
    ctx.record(FuzzOperationResult::new(
        "MedicationRequest.dispenseRequest",
        before,
        after,
    ));
}

impl MedicationRequestFuzzer {
    /// The profile-aware, ordered mutator list
    pub fn mutators(ctx: &FuzzerContext) -> Vec<FieldMutator<MedicationRequest>> {
        let mut mutators: Vec<FieldMutator<MedicationRequest>> = vec![
            ("MedicationRequest.id", request_id),
            ("MedicationRequest.meta", request_meta),
            ("MedicationRequest.extension", request_extension),
            ("MedicationRequest.identifier", request_identifier),
            ("MedicationRequest.status", request_status),
            ("MedicationRequest.intent", request_intent),
            ("MedicationRequest.medicationReference", request_medication),
            ("MedicationRequest.subject", request_subject),
            ("MedicationRequest.authoredOn", request_authored_on),
            ("MedicationRequest.requester", request_requester),
            ("MedicationRequest.insurance", request_insurance),
        ];
        if !ctx.config.flags.is_set(Flag::KbvProfile) {
            mutators.push(("MedicationRequest.note", request_note));
        }
        mutators.push((
            "MedicationRequest.dosageInstruction",
            request_dosage_instruction,
        ));
        mutators.push(("MedicationRequest.dispenseRequest", request_dispense));
        mutators
    }
}

impl FhirFuzzer<MedicationRequest> for MedicationRequestFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> MedicationRequest {
        MedicationRequest {
            id: Some(primitives::random_id(ctx)),
            meta: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
            status: ctx.pick_code(&[]),
            intent: ctx.pick_code(&[]),
            ..MedicationRequest::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut MedicationRequest) {
        let mutators = Self::mutators(ctx);
        run_mutators(ctx, mutators, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FuzzConfig;
    use crate::model::codes::MedicationRequestStatus;

    fn full_context() -> FuzzerContext {
        let config = FuzzConfig::new(100.0, 0.0).with_all_mutators();
        FuzzerContext::with_seed(config, 31)
    }

    #[test]
    fn test_full_fuzz_populates_request() {
        let mut ctx = full_context();
        let mut request = MedicationRequest::default();
        MedicationRequestFuzzer.fuzz(&mut ctx, &mut request);

        assert!(request.id.is_some());
        assert!(request.status.is_some());
        assert!(request.intent.is_some());
        assert!(request.medication_reference.is_some());
        assert!(request.subject.is_some());
        assert!(!request.dosage_instruction.is_empty());
        assert!(request.dispense_request.is_some());
        assert!(!request.note.is_empty());
    }

    #[test]
    fn test_kbv_profile_excludes_note() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::KbvProfile);

        let mut request = MedicationRequest::default();
        MedicationRequestFuzzer.fuzz(&mut ctx, &mut request);
        assert!(request.note.is_empty());
    }

    #[test]
    fn test_status_replacement_is_distinct() {
        let mut ctx = full_context();
        for _ in 0..20 {
            let mut request = MedicationRequest {
                status: Some(MedicationRequestStatus::Active),
                ..MedicationRequest::default()
            };
            MedicationRequestFuzzer.fuzz(&mut ctx, &mut request);
            assert_ne!(request.status, Some(MedicationRequestStatus::Active));
        }
    }
}
