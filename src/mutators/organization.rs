// fhir-fuzzing/src/mutators/organization.rs
//! Resource fuzzer for `Organization`

use crate::config::Flag;
use crate::context::FuzzerContext;
use crate::model::resources::{Organization, ResourceKind};
use crate::mutators::{
    fuzz_boolean, fuzz_child, fuzz_list, fuzz_value, fuzz_value_list, run_mutators, FhirFuzzer,
    FieldMutator,
};
use crate::primitives;

/// Fuzzer for the `Organization` resource.
///
/// The KBV profile has no alias slice, so `alias` only appears in the
/// non-KBV mutator list.
pub struct OrganizationFuzzer;

fn organization_id(ctx: &mut FuzzerContext, v: &mut Organization) {
    fuzz_value(ctx, "Organization.id", &mut v.id, primitives::random_id);
}

fn organization_meta(ctx: &mut FuzzerContext, v: &mut Organization) {
    ctx.config.flags.push(Flag::OnlyProfile);
    fuzz_child(ctx, "Organization.meta", &mut v.meta);
    ctx.config.flags.pop();
}

fn organization_extension(ctx: &mut FuzzerContext, v: &mut Organization) {
    ctx.config
        .flags
        .push(Flag::TriggeredBy(ResourceKind::Organization));
    fuzz_list(ctx, "Organization.extension", &mut v.extension);
    ctx.config.flags.pop();
}

fn organization_identifier(ctx: &mut FuzzerContext, v: &mut Organization) {
    fuzz_list(ctx, "Organization.identifier", &mut v.identifier);
}

fn organization_active(ctx: &mut FuzzerContext, v: &mut Organization) {
    fuzz_boolean(ctx, "Organization.active", &mut v.active);
}

fn organization_name(ctx: &mut FuzzerContext, v: &mut Organization) {
    fuzz_value(ctx, "Organization.name", &mut v.name, |ctx| {
        primitives::random_string(ctx, 30)
    });
}

fn organization_alias(ctx: &mut FuzzerContext, v: &mut Organization) {
    fuzz_value_list(ctx, "Organization.alias", &mut v.alias, |ctx| {
        primitives::random_string(ctx, 15)
    });
}

fn organization_telecom(ctx: &mut FuzzerContext, v: &mut Organization) {
    fuzz_list(ctx, "Organization.telecom", &mut v.telecom);
}

fn organization_address(ctx: &mut FuzzerContext, v: &mut Organization) {
    fuzz_list(ctx, "Organization.address", &mut v.address);
}

impl OrganizationFuzzer {
    /// The profile-aware, ordered mutator list
    pub fn mutators(ctx: &FuzzerContext) -> Vec<FieldMutator<Organization>> {
        let mut mutators: Vec<FieldMutator<Organization>> = vec![
            ("Organization.id", organization_id),
            ("Organization.meta", organization_meta),
            ("Organization.extension", organization_extension),
            ("Organization.identifier", organization_identifier),
            ("Organization.active", organization_active),
            ("Organization.name", organization_name),
        ];
        if !ctx.config.flags.is_set(Flag::KbvProfile) {
            mutators.push(("Organization.alias", organization_alias));
        }
        mutators.push(("Organization.telecom", organization_telecom));
        mutators.push(("Organization.address", organization_address));
        mutators
    }
}

impl FhirFuzzer<Organization> for OrganizationFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Organization {
        Organization {
            id: Some(primitives::random_id(ctx)),
            meta: ctx.fuzzer_for().map(|f| f.generate_random(ctx)),
            name: Some(primitives::random_string(ctx, 30)),
            ..Organization::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Organization) {
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
        FuzzerContext::with_seed(config, 37)
    }

    #[test]
    fn test_full_fuzz_populates_organization() {
        let mut ctx = full_context();
        let mut organization = Organization::default();
        OrganizationFuzzer.fuzz(&mut ctx, &mut organization);

        assert!(organization.id.is_some());
        assert!(organization.active.is_some());
        assert!(organization.name.is_some());
        assert!(!organization.alias.is_empty());
        assert!(!organization.telecom.is_empty());
        assert!(!organization.address.is_empty());
    }

    #[test]
    fn test_kbv_profile_excludes_alias() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::KbvProfile);

        let mut organization = Organization::default();
        OrganizationFuzzer.fuzz(&mut ctx, &mut organization);
        assert!(organization.alias.is_empty());
    }
}
