// fhir-fuzzing/src/mutators/composition.rs
//! Resource fuzzer for `Composition`

use crate::config::Flag;
use crate::context::{FuzzOperationResult, FuzzerContext};
use crate::model::resources::{Composition, CompositionSection, ResourceKind};
use crate::mutators::{
    fuzz_child, fuzz_code, fuzz_list, fuzz_value, run_mutators, FhirFuzzer, FieldMutator,
};
use crate::primitives;
use rand::Rng;

/// Fuzzer for the `Composition` resource.
///
/// The KBV profile fixes the document identifier, so `identifier` only
/// appears in the non-KBV mutator list.
pub struct CompositionFuzzer;

fn composition_id(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_value(ctx, "Composition.id", &mut v.id, primitives::random_id);
}

fn composition_meta(ctx: &mut FuzzerContext, v: &mut Composition) {
    ctx.config.flags.push(Flag::OnlyProfile);
    fuzz_child(ctx, "Composition.meta", &mut v.meta);
    ctx.config.flags.pop();
}

fn composition_extension(ctx: &mut FuzzerContext, v: &mut Composition) {
    ctx.config.flags.push(Flag::TriggeredBy(ResourceKind::Composition));
    fuzz_list(ctx, "Composition.extension", &mut v.extension);
    ctx.config.flags.pop();
}

fn composition_identifier(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_child(ctx, "Composition.identifier", &mut v.identifier);
}

fn composition_status(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_code(ctx, "Composition.status", &mut v.status);
}

fn composition_type(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_child(ctx, "Composition.type", &mut v.type_);
}

fn composition_subject(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_child(ctx, "Composition.subject", &mut v.subject);
}

fn composition_date(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_value(ctx, "Composition.date", &mut v.date, primitives::random_date);
}

fn composition_author(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_list(ctx, "Composition.author", &mut v.author);
}

fn composition_title(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_value(ctx, "Composition.title", &mut v.title, |ctx| {
        primitives::random_string(ctx, 40)
    });
}

fn composition_custodian(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_child(ctx, "Composition.custodian", &mut v.custodian);
}

fn composition_text(ctx: &mut FuzzerContext, v: &mut Composition) {
    fuzz_child(ctx, "Composition.text", &mut v.text);
}

fn random_section(ctx: &mut FuzzerContext) -> CompositionSection {
    CompositionSection {
        title: Some(primitives::random_string(ctx, 20)),
        code: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
        entry: ctx
            .fuzzer_for()
            .map(|f| vec![f.generate_random(ctx)])
            .unwrap_or_default(),
    }
}

// Sections are composition-local, so the list strategy is spelled out here
// instead of going through the registry.
fn composition_section(ctx: &mut FuzzerContext, v: &mut Composition) {
    let before = format!("{:?}", v.section);
    if v.section.is_empty() {
        let section = random_section(ctx);
        v.section.push(section);
    } else {
        match ctx.rng().gen_range(0..3) {
            0 => {
                let idx = ctx.rng().gen_range(0..v.section.len());
                v.section[idx].title = Some(primitives::random_string(ctx, 20));
            }
            1 => {
                let section = random_section(ctx);
                v.section.push(section);
            }
            _ => v.section.clear(),
        }
    }
    let after = format!("{:?}", v.section);
    ctx.record(FuzzOperationResult::new("Composition.section", before, after));
}

impl CompositionFuzzer {
    /// The profile-aware, ordered mutator list
    pub fn mutators(ctx: &FuzzerContext) -> Vec<FieldMutator<Composition>> {
        let mut mutators: Vec<FieldMutator<Composition>> = vec![
            ("Composition.id", composition_id),
            ("Composition.meta", composition_meta),
            ("Composition.extension", composition_extension),
        ];
        if !ctx.config.flags.is_set(Flag::KbvProfile) {
            mutators.push(("Composition.identifier", composition_identifier));
        }
        let tail: [FieldMutator<Composition>; 8] = [
            ("Composition.status", composition_status),
            ("Composition.type", composition_type),
            ("Composition.subject", composition_subject),
            ("Composition.date", composition_date),
            ("Composition.author", composition_author),
            ("Composition.title", composition_title),
            ("Composition.custodian", composition_custodian),
            ("Composition.text", composition_text),
        ];
        mutators.extend(tail);
        mutators.push(("Composition.section", composition_section));
        mutators
    }
}

impl FhirFuzzer<Composition> for CompositionFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Composition {
        Composition {
            id: Some(primitives::random_id(ctx)),
            meta: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
            status: ctx.pick_code(&[]),
            title: Some(primitives::random_string(ctx, 40)),
            ..Composition::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Composition) {
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
        FuzzerContext::with_seed(config, 17)
    }

    #[test]
    fn test_fresh_composition_gains_id_after_fuzz() {
        let mut ctx = full_context();
        let mut composition = Composition::default();
        assert!(composition.id.is_none());

        CompositionFuzzer.fuzz(&mut ctx, &mut composition);

        assert!(composition.id.is_some());
        assert!(composition.status.is_some());
        assert!(composition.title.is_some());
        assert!(!composition.section.is_empty());
    }

    #[test]
    fn test_kbv_profile_excludes_identifier() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::KbvProfile);

        let mut composition = Composition::default();
        CompositionFuzzer.fuzz(&mut ctx, &mut composition);
        assert!(composition.identifier.is_none());

        ctx.config.flags.pop();
        CompositionFuzzer.fuzz(&mut ctx, &mut composition);
        assert!(composition.identifier.is_some());
    }

    #[test]
    fn test_section_mutation_is_logged() {
        let mut ctx = full_context();
        let mut composition = Composition::default();
        CompositionFuzzer.fuzz(&mut ctx, &mut composition);

        assert!(ctx
            .operation_log()
            .iter()
            .any(|op| op.field == "Composition.section"));
    }
}
