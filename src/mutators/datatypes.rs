// fhir-fuzzing/src/mutators/datatypes.rs
//! Type fuzzers, one per nested FHIR datatype
//!
//! `generate_random` builds a minimally-populated instance; `fuzz` runs a
//! selected subset of the datatype's field mutators. Structured sub-fields
//! recurse through the registry, so removing a slot there turns the
//! corresponding mutators into logged no-ops.

use crate::context::FuzzerContext;
use crate::model::datatypes::*;
use crate::mutators::{
    fuzz_boolean, fuzz_child, fuzz_code, fuzz_list, fuzz_value, fuzz_value_list, run_mutators,
    FhirFuzzer, FieldMutator,
};
use crate::primitives;
use chrono::NaiveTime;
use rand::Rng;

/// Fuzzer for `Coding`
pub struct CodingFuzzer;

fn coding_system(ctx: &mut FuzzerContext, v: &mut Coding) {
    fuzz_value(ctx, "Coding.system", &mut v.system, primitives::random_url);
}

fn coding_version(ctx: &mut FuzzerContext, v: &mut Coding) {
    fuzz_value(ctx, "Coding.version", &mut v.version, |ctx| {
        primitives::random_string(ctx, 8)
    });
}

fn coding_code(ctx: &mut FuzzerContext, v: &mut Coding) {
    fuzz_value(ctx, "Coding.code", &mut v.code, primitives::random_word);
}

fn coding_display(ctx: &mut FuzzerContext, v: &mut Coding) {
    fuzz_value(ctx, "Coding.display", &mut v.display, |ctx| {
        primitives::random_string(ctx, 20)
    });
}

fn coding_user_selected(ctx: &mut FuzzerContext, v: &mut Coding) {
    fuzz_boolean(ctx, "Coding.userSelected", &mut v.user_selected);
}

impl CodingFuzzer {
    fn mutators() -> Vec<FieldMutator<Coding>> {
        vec![
            ("Coding.system", coding_system),
            ("Coding.version", coding_version),
            ("Coding.code", coding_code),
            ("Coding.display", coding_display),
            ("Coding.userSelected", coding_user_selected),
        ]
    }
}

impl FhirFuzzer<Coding> for CodingFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Coding {
        Coding {
            system: Some(primitives::random_url(ctx)),
            code: Some(primitives::random_word(ctx)),
            ..Coding::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Coding) {
        run_mutators(ctx, Self::mutators(), value);
    }
}

/// Fuzzer for `CodeableConcept`
pub struct CodeableConceptFuzzer;

fn concept_coding(ctx: &mut FuzzerContext, v: &mut CodeableConcept) {
    fuzz_list(ctx, "CodeableConcept.coding", &mut v.coding);
}

fn concept_text(ctx: &mut FuzzerContext, v: &mut CodeableConcept) {
    fuzz_value(ctx, "CodeableConcept.text", &mut v.text, |ctx| {
        primitives::random_string(ctx, 30)
    });
}

impl FhirFuzzer<CodeableConcept> for CodeableConceptFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> CodeableConcept {
        let coding = ctx
            .fuzzer_for::<Coding>()
            .map(|f| vec![f.generate_random(ctx)])
            .unwrap_or_default();
        CodeableConcept {
            coding,
            text: Some(primitives::random_word(ctx)),
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut CodeableConcept) {
        let mutators: Vec<FieldMutator<CodeableConcept>> = vec![
            ("CodeableConcept.coding", concept_coding),
            ("CodeableConcept.text", concept_text),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Identifier`
pub struct IdentifierFuzzer;

fn identifier_use(ctx: &mut FuzzerContext, v: &mut Identifier) {
    fuzz_code(ctx, "Identifier.use", &mut v.use_);
}

fn identifier_type(ctx: &mut FuzzerContext, v: &mut Identifier) {
    fuzz_child(ctx, "Identifier.type", &mut v.type_);
}

fn identifier_system(ctx: &mut FuzzerContext, v: &mut Identifier) {
    fuzz_value(ctx, "Identifier.system", &mut v.system, primitives::random_url);
}

fn identifier_value(ctx: &mut FuzzerContext, v: &mut Identifier) {
    fuzz_value(ctx, "Identifier.value", &mut v.value, |ctx| {
        primitives::random_string(ctx, 12)
    });
}

fn identifier_period(ctx: &mut FuzzerContext, v: &mut Identifier) {
    fuzz_child(ctx, "Identifier.period", &mut v.period);
}

impl FhirFuzzer<Identifier> for IdentifierFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Identifier {
        Identifier {
            system: Some(primitives::random_url(ctx)),
            value: Some(primitives::random_string(ctx, 12)),
            ..Identifier::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Identifier) {
        let mutators: Vec<FieldMutator<Identifier>> = vec![
            ("Identifier.use", identifier_use),
            ("Identifier.type", identifier_type),
            ("Identifier.system", identifier_system),
            ("Identifier.value", identifier_value),
            ("Identifier.period", identifier_period),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Period`
pub struct PeriodFuzzer;

fn period_start(ctx: &mut FuzzerContext, v: &mut Period) {
    fuzz_value(ctx, "Period.start", &mut v.start, primitives::random_date);
}

fn period_end(ctx: &mut FuzzerContext, v: &mut Period) {
    fuzz_value(ctx, "Period.end", &mut v.end, primitives::random_date);
}

impl FhirFuzzer<Period> for PeriodFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Period {
        let start = primitives::random_date(ctx);
        let end = start + chrono::Duration::days(ctx.rng().gen_range(1..365));
        Period {
            start: Some(start),
            end: Some(end),
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Period) {
        let mutators: Vec<FieldMutator<Period>> =
            vec![("Period.start", period_start), ("Period.end", period_end)];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Meta`.
///
/// Honors the `OnlyProfile` context flag: when a resource fuzzer delegates
/// here around its own meta field, only the profile list is eligible.
pub struct MetaFuzzer;

fn meta_version_id(ctx: &mut FuzzerContext, v: &mut Meta) {
    fuzz_value(ctx, "Meta.versionId", &mut v.version_id, |ctx| {
        primitives::random_string(ctx, 6)
    });
}

fn meta_last_updated(ctx: &mut FuzzerContext, v: &mut Meta) {
    fuzz_value(ctx, "Meta.lastUpdated", &mut v.last_updated, |ctx| {
        primitives::random_date(ctx)
            .and_time(NaiveTime::default())
            .and_utc()
    });
}

fn meta_source(ctx: &mut FuzzerContext, v: &mut Meta) {
    fuzz_value(ctx, "Meta.source", &mut v.source, primitives::random_url);
}

fn meta_profile(ctx: &mut FuzzerContext, v: &mut Meta) {
    fuzz_value_list(ctx, "Meta.profile", &mut v.profile, primitives::random_url);
}

fn meta_tag(ctx: &mut FuzzerContext, v: &mut Meta) {
    fuzz_list(ctx, "Meta.tag", &mut v.tag);
}

impl MetaFuzzer {
    fn mutators(ctx: &FuzzerContext) -> Vec<FieldMutator<Meta>> {
        if ctx.config.flags.is_set(crate::config::Flag::OnlyProfile) {
            return vec![("Meta.profile", meta_profile)];
        }
        vec![
            ("Meta.versionId", meta_version_id),
            ("Meta.lastUpdated", meta_last_updated),
            ("Meta.source", meta_source),
            ("Meta.profile", meta_profile),
            ("Meta.tag", meta_tag),
        ]
    }
}

impl FhirFuzzer<Meta> for MetaFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Meta {
        Meta {
            version_id: Some(primitives::random_string(ctx, 6)),
            profile: vec![primitives::random_url(ctx)],
            ..Meta::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Meta) {
        let mutators = Self::mutators(ctx);
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Reference`
pub struct ReferenceFuzzer;

fn reference_reference(ctx: &mut FuzzerContext, v: &mut Reference) {
    fuzz_value(ctx, "Reference.reference", &mut v.reference, |ctx| {
        format!("urn:uuid:{}", primitives::random_id(ctx))
    });
}

fn reference_type(ctx: &mut FuzzerContext, v: &mut Reference) {
    fuzz_value(ctx, "Reference.type", &mut v.type_, primitives::random_word);
}

fn reference_identifier(ctx: &mut FuzzerContext, v: &mut Reference) {
    fuzz_child(ctx, "Reference.identifier", &mut v.identifier);
}

fn reference_display(ctx: &mut FuzzerContext, v: &mut Reference) {
    fuzz_value(ctx, "Reference.display", &mut v.display, |ctx| {
        primitives::random_string(ctx, 24)
    });
}

impl FhirFuzzer<Reference> for ReferenceFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Reference {
        Reference {
            reference: Some(format!("urn:uuid:{}", primitives::random_id(ctx))),
            ..Reference::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Reference) {
        let mutators: Vec<FieldMutator<Reference>> = vec![
            ("Reference.reference", reference_reference),
            ("Reference.type", reference_type),
            ("Reference.identifier", reference_identifier),
            ("Reference.display", reference_display),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Extension`.
///
/// Honors `TriggeredBy(_)`: when a resource fuzzer delegates here around its
/// own extension field, nested sub-extension recursion is excluded so the
/// mutation fan-out stays bounded to the field being fuzzed.
pub struct ExtensionFuzzer;

fn random_extension_value(ctx: &mut FuzzerContext) -> ExtensionValue {
    match ctx.rng().gen_range(0..5) {
        0 => ExtensionValue::Boolean(ctx.rng().gen()),
        1 => ExtensionValue::String(primitives::random_string(ctx, 20)),
        2 => ExtensionValue::Code(primitives::random_word(ctx)),
        3 => ExtensionValue::Date(primitives::random_date(ctx)),
        _ => ExtensionValue::Coding(Coding {
            system: Some(primitives::random_url(ctx)),
            code: Some(primitives::random_word(ctx)),
            ..Coding::default()
        }),
    }
}

fn extension_url(ctx: &mut FuzzerContext, v: &mut Extension) {
    fuzz_value(ctx, "Extension.url", &mut v.url, primitives::random_url);
}

fn extension_value(ctx: &mut FuzzerContext, v: &mut Extension) {
    fuzz_value(ctx, "Extension.value", &mut v.value, random_extension_value);
}

fn extension_nested(ctx: &mut FuzzerContext, v: &mut Extension) {
    fuzz_list(ctx, "Extension.extension", &mut v.extension);
}

impl ExtensionFuzzer {
    fn mutators(ctx: &FuzzerContext) -> Vec<FieldMutator<Extension>> {
        let mut mutators: Vec<FieldMutator<Extension>> = vec![
            ("Extension.url", extension_url),
            ("Extension.value", extension_value),
        ];
        if !ctx.config.flags.triggered() {
            mutators.push(("Extension.extension", extension_nested));
        }
        mutators
    }
}

impl FhirFuzzer<Extension> for ExtensionFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Extension {
        Extension {
            url: Some(primitives::random_url(ctx)),
            value: Some(random_extension_value(ctx)),
            extension: Vec::new(),
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Extension) {
        let mutators = Self::mutators(ctx);
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Quantity`
pub struct QuantityFuzzer;

fn quantity_value(ctx: &mut FuzzerContext, v: &mut Quantity) {
    fuzz_value(ctx, "Quantity.value", &mut v.value, primitives::random_decimal);
}

fn quantity_unit(ctx: &mut FuzzerContext, v: &mut Quantity) {
    fuzz_value(ctx, "Quantity.unit", &mut v.unit, primitives::random_word);
}

fn quantity_system(ctx: &mut FuzzerContext, v: &mut Quantity) {
    fuzz_value(ctx, "Quantity.system", &mut v.system, primitives::random_url);
}

fn quantity_code(ctx: &mut FuzzerContext, v: &mut Quantity) {
    fuzz_value(ctx, "Quantity.code", &mut v.code, primitives::random_word);
}

impl FhirFuzzer<Quantity> for QuantityFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Quantity {
        Quantity {
            value: Some(primitives::random_decimal(ctx)),
            unit: Some(primitives::random_word(ctx)),
            ..Quantity::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Quantity) {
        let mutators: Vec<FieldMutator<Quantity>> = vec![
            ("Quantity.value", quantity_value),
            ("Quantity.unit", quantity_unit),
            ("Quantity.system", quantity_system),
            ("Quantity.code", quantity_code),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Ratio`
pub struct RatioFuzzer;

fn ratio_numerator(ctx: &mut FuzzerContext, v: &mut Ratio) {
    fuzz_child(ctx, "Ratio.numerator", &mut v.numerator);
}

fn ratio_denominator(ctx: &mut FuzzerContext, v: &mut Ratio) {
    fuzz_child(ctx, "Ratio.denominator", &mut v.denominator);
}

impl FhirFuzzer<Ratio> for RatioFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Ratio {
        let quantity = ctx.fuzzer_for::<Quantity>();
        Ratio {
            numerator: quantity.as_ref().map(|f| f.generate_random(ctx)),
            denominator: quantity.map(|f| f.generate_random(ctx)),
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Ratio) {
        let mutators: Vec<FieldMutator<Ratio>> = vec![
            ("Ratio.numerator", ratio_numerator),
            ("Ratio.denominator", ratio_denominator),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Address`
pub struct AddressFuzzer;

fn address_use(ctx: &mut FuzzerContext, v: &mut Address) {
    fuzz_code(ctx, "Address.use", &mut v.use_);
}

fn address_type(ctx: &mut FuzzerContext, v: &mut Address) {
    fuzz_code(ctx, "Address.type", &mut v.type_);
}

fn address_text(ctx: &mut FuzzerContext, v: &mut Address) {
    fuzz_value(ctx, "Address.text", &mut v.text, |ctx| {
        primitives::random_string(ctx, 40)
    });
}

fn address_line(ctx: &mut FuzzerContext, v: &mut Address) {
    fuzz_value_list(ctx, "Address.line", &mut v.line, primitives::random_street_line);
}

fn address_city(ctx: &mut FuzzerContext, v: &mut Address) {
    fuzz_value(ctx, "Address.city", &mut v.city, primitives::random_city);
}

fn address_postal_code(ctx: &mut FuzzerContext, v: &mut Address) {
    fuzz_value(ctx, "Address.postalCode", &mut v.postal_code, primitives::random_postal_code);
}

fn address_country(ctx: &mut FuzzerContext, v: &mut Address) {
    fuzz_value(ctx, "Address.country", &mut v.country, primitives::random_language_code);
}

impl FhirFuzzer<Address> for AddressFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Address {
        Address {
            line: vec![primitives::random_street_line(ctx)],
            city: Some(primitives::random_city(ctx)),
            postal_code: Some(primitives::random_postal_code(ctx)),
            ..Address::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Address) {
        let mutators: Vec<FieldMutator<Address>> = vec![
            ("Address.use", address_use),
            ("Address.type", address_type),
            ("Address.text", address_text),
            ("Address.line", address_line),
            ("Address.city", address_city),
            ("Address.postalCode", address_postal_code),
            ("Address.country", address_country),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `HumanName`
pub struct HumanNameFuzzer;

fn name_use(ctx: &mut FuzzerContext, v: &mut HumanName) {
    fuzz_code(ctx, "HumanName.use", &mut v.use_);
}

fn name_text(ctx: &mut FuzzerContext, v: &mut HumanName) {
    fuzz_value(ctx, "HumanName.text", &mut v.text, |ctx| {
        format!(
            "{} {}",
            primitives::random_given_name(ctx),
            primitives::random_family_name(ctx)
        )
    });
}

fn name_family(ctx: &mut FuzzerContext, v: &mut HumanName) {
    fuzz_value(ctx, "HumanName.family", &mut v.family, primitives::random_family_name);
}

fn name_given(ctx: &mut FuzzerContext, v: &mut HumanName) {
    fuzz_value_list(ctx, "HumanName.given", &mut v.given, primitives::random_given_name);
}

fn name_prefix(ctx: &mut FuzzerContext, v: &mut HumanName) {
    fuzz_value_list(ctx, "HumanName.prefix", &mut v.prefix, |ctx| {
        primitives::random_string(ctx, 4)
    });
}

impl FhirFuzzer<HumanName> for HumanNameFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> HumanName {
        HumanName {
            family: Some(primitives::random_family_name(ctx)),
            given: vec![primitives::random_given_name(ctx)],
            ..HumanName::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut HumanName) {
        let mutators: Vec<FieldMutator<HumanName>> = vec![
            ("HumanName.use", name_use),
            ("HumanName.text", name_text),
            ("HumanName.family", name_family),
            ("HumanName.given", name_given),
            ("HumanName.prefix", name_prefix),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `ContactPoint`
pub struct ContactPointFuzzer;

fn contact_system(ctx: &mut FuzzerContext, v: &mut ContactPoint) {
    fuzz_code(ctx, "ContactPoint.system", &mut v.system);
}

fn contact_value(ctx: &mut FuzzerContext, v: &mut ContactPoint) {
    fuzz_value(ctx, "ContactPoint.value", &mut v.value, |ctx| {
        primitives::random_string(ctx, 16)
    });
}

fn contact_use(ctx: &mut FuzzerContext, v: &mut ContactPoint) {
    fuzz_code(ctx, "ContactPoint.use", &mut v.use_);
}

impl FhirFuzzer<ContactPoint> for ContactPointFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> ContactPoint {
        ContactPoint {
            system: ctx.pick_code(&[]),
            value: Some(primitives::random_string(ctx, 16)),
            use_: None,
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut ContactPoint) {
        let mutators: Vec<FieldMutator<ContactPoint>> = vec![
            ("ContactPoint.system", contact_system),
            ("ContactPoint.value", contact_value),
            ("ContactPoint.use", contact_use),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Narrative`
pub struct NarrativeFuzzer;

fn narrative_status(ctx: &mut FuzzerContext, v: &mut Narrative) {
    fuzz_code(ctx, "Narrative.status", &mut v.status);
}

fn narrative_div(ctx: &mut FuzzerContext, v: &mut Narrative) {
    fuzz_value(ctx, "Narrative.div", &mut v.div, |ctx| {
        format!(
            "<div xmlns=\"http://www.w3.org/1999/xhtml\">{}</div>",
            primitives::random_string(ctx, 30)
        )
    });
}

impl FhirFuzzer<Narrative> for NarrativeFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Narrative {
        Narrative {
            status: ctx.pick_code(&[]),
            div: Some(format!(
                "<div xmlns=\"http://www.w3.org/1999/xhtml\">{}</div>",
                primitives::random_word(ctx)
            )),
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Narrative) {
        let mutators: Vec<FieldMutator<Narrative>> = vec![
            ("Narrative.status", narrative_status),
            ("Narrative.div", narrative_div),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Annotation`
pub struct AnnotationFuzzer;

fn annotation_author(ctx: &mut FuzzerContext, v: &mut Annotation) {
    fuzz_value(ctx, "Annotation.authorString", &mut v.author_string, |ctx| {
        format!(
            "{} {}",
            primitives::random_given_name(ctx),
            primitives::random_family_name(ctx)
        )
    });
}

fn annotation_time(ctx: &mut FuzzerContext, v: &mut Annotation) {
    fuzz_value(ctx, "Annotation.time", &mut v.time, primitives::random_date);
}

fn annotation_text(ctx: &mut FuzzerContext, v: &mut Annotation) {
    fuzz_value(ctx, "Annotation.text", &mut v.text, |ctx| {
        primitives::random_string(ctx, 60)
    });
}

impl FhirFuzzer<Annotation> for AnnotationFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Annotation {
        Annotation {
            text: Some(primitives::random_string(ctx, 60)),
            ..Annotation::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Annotation) {
        let mutators: Vec<FieldMutator<Annotation>> = vec![
            ("Annotation.authorString", annotation_author),
            ("Annotation.time", annotation_time),
            ("Annotation.text", annotation_text),
        ];
        run_mutators(ctx, mutators, value);
    }
}

/// Fuzzer for `Dosage`
pub struct DosageFuzzer;

fn dosage_sequence(ctx: &mut FuzzerContext, v: &mut Dosage) {
    fuzz_value(ctx, "Dosage.sequence", &mut v.sequence, |ctx| {
        ctx.rng().gen_range(1..10)
    });
}

fn dosage_text(ctx: &mut FuzzerContext, v: &mut Dosage) {
    fuzz_value(ctx, "Dosage.text", &mut v.text, |ctx| {
        primitives::random_string(ctx, 40)
    });
}

fn dosage_patient_instruction(ctx: &mut FuzzerContext, v: &mut Dosage) {
    fuzz_value(ctx, "Dosage.patientInstruction", &mut v.patient_instruction, |ctx| {
        primitives::random_string(ctx, 40)
    });
}

fn dosage_as_needed(ctx: &mut FuzzerContext, v: &mut Dosage) {
    fuzz_boolean(ctx, "Dosage.asNeeded", &mut v.as_needed);
}

fn dosage_route(ctx: &mut FuzzerContext, v: &mut Dosage) {
    fuzz_child(ctx, "Dosage.route", &mut v.route);
}

fn dosage_dose_quantity(ctx: &mut FuzzerContext, v: &mut Dosage) {
    fuzz_child(ctx, "Dosage.doseQuantity", &mut v.dose_quantity);
}

impl FhirFuzzer<Dosage> for DosageFuzzer {
    fn generate_random(&self, ctx: &mut FuzzerContext) -> Dosage {
        Dosage {
            text: Some(primitives::random_string(ctx, 40)),
            dose_quantity: ctx.fuzzer_for::<Quantity>().map(|f| f.generate_random(ctx)),
            ..Dosage::default()
        }
    }

    fn fuzz(&self, ctx: &mut FuzzerContext, value: &mut Dosage) {
        let mutators: Vec<FieldMutator<Dosage>> = vec![
            ("Dosage.sequence", dosage_sequence),
            ("Dosage.text", dosage_text),
            ("Dosage.patientInstruction", dosage_patient_instruction),
            ("Dosage.asNeeded", dosage_as_needed),
            ("Dosage.route", dosage_route),
            ("Dosage.doseQuantity", dosage_dose_quantity),
        ];
        run_mutators(ctx, mutators, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Flag, FuzzConfig};
    use crate::model::resources::ResourceKind;

    fn full_context() -> FuzzerContext {
        let config = FuzzConfig::new(100.0, 0.0).with_all_mutators();
        FuzzerContext::with_seed(config, 3)
    }

    #[test]
    fn test_identifier_fuzz_populates_all_fields() {
        let mut ctx = full_context();
        let mut identifier = Identifier::default();
        IdentifierFuzzer.fuzz(&mut ctx, &mut identifier);

        assert!(identifier.use_.is_some());
        assert!(identifier.type_.is_some());
        assert!(identifier.system.is_some());
        assert!(identifier.value.is_some());
        assert!(identifier.period.is_some());
    }

    #[test]
    fn test_generate_random_is_minimally_populated() {
        let mut ctx = full_context();
        let coding = CodingFuzzer.generate_random(&mut ctx);
        assert!(coding.system.is_some());
        assert!(coding.code.is_some());
        assert!(coding.display.is_none());

        let period = PeriodFuzzer.generate_random(&mut ctx);
        assert!(period.start.unwrap() < period.end.unwrap());
    }

    #[test]
    fn test_meta_only_profile_flag_limits_mutation() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::OnlyProfile);

        let mut meta = Meta::default();
        MetaFuzzer.fuzz(&mut ctx, &mut meta);

        assert!(!meta.profile.is_empty());
        assert!(meta.version_id.is_none());
        assert!(meta.source.is_none());
        assert!(meta.tag.is_empty());
    }

    #[test]
    fn test_extension_triggered_flag_suppresses_nesting() {
        let mut ctx = full_context();
        ctx.config.flags.push(Flag::TriggeredBy(ResourceKind::Coverage));

        let mut extension = Extension::default();
        ExtensionFuzzer.fuzz(&mut ctx, &mut extension);

        assert!(extension.url.is_some());
        assert!(extension.value.is_some());
        assert!(extension.extension.is_empty());
    }

    #[test]
    fn test_extension_without_flag_recurses_into_nested() {
        let mut ctx = full_context();
        let mut extension = Extension::default();
        ExtensionFuzzer.fuzz(&mut ctx, &mut extension);
        assert_eq!(extension.extension.len(), 1);
    }

    #[test]
    fn test_missing_nested_fuzzer_is_tolerated() {
        let mut ctx = full_context();
        ctx.fuzzers.codeable_concept = None;

        let mut identifier = Identifier::default();
        IdentifierFuzzer.fuzz(&mut ctx, &mut identifier);

        // the type mutator ran and logged, but could not populate
        assert!(identifier.type_.is_none());
        assert!(ctx
            .operation_log()
            .iter()
            .any(|op| op.field == "Identifier.type" && op.is_noop()));
    }
}
