// fhir-fuzzing/src/context.rs
//! Per-session fuzzing context: randomness policy, type-fuzzer registry,
//! and the append-only mutation log
//!
//! One `FuzzerContext` per fuzzing session. The context is deliberately not
//! `Sync`; parallel test runs allocate one context each.

use crate::config::FuzzConfig;
use crate::model::codes::CodeSet;
use crate::model::datatypes::{
    Address, Annotation, CodeableConcept, Coding, ContactPoint, Dosage, Extension, HumanName,
    Identifier, Meta, Narrative, Period, Quantity, Ratio, Reference,
};
use crate::mutators::datatypes;
use crate::mutators::FhirFuzzer;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// One recorded field mutation: what was touched, and the value before and
/// after. Exactly one entry is appended per field-mutator invocation, in
/// invocation order, whether or not anything changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzOperationResult {
    pub field: String,
    pub previous: String,
    pub current: String,
}

impl FuzzOperationResult {
    pub fn new(
        field: impl Into<String>,
        previous: impl Into<String>,
        current: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            previous: previous.into(),
            current: current.into(),
        }
    }

    /// True when the mutator ran but left the value untouched
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

impl fmt::Display for FuzzOperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.field, self.previous, self.current)
    }
}

/// Closed registry of nested-datatype fuzzers, one slot per datatype.
///
/// All datatypes handled are known at design time, so this is a plain struct
/// rather than an identity-keyed map. Every slot is populated at construction;
/// callers may swap a slot for a custom fuzzer or set it to `None`, which the
/// field mutators treat as a logged no-op.
pub struct TypeFuzzers {
    pub identifier: Option<Rc<dyn FhirFuzzer<Identifier>>>,
    pub meta: Option<Rc<dyn FhirFuzzer<Meta>>>,
    pub reference: Option<Rc<dyn FhirFuzzer<Reference>>>,
    pub codeable_concept: Option<Rc<dyn FhirFuzzer<CodeableConcept>>>,
    pub coding: Option<Rc<dyn FhirFuzzer<Coding>>>,
    pub extension: Option<Rc<dyn FhirFuzzer<Extension>>>,
    pub period: Option<Rc<dyn FhirFuzzer<Period>>>,
    pub quantity: Option<Rc<dyn FhirFuzzer<Quantity>>>,
    pub ratio: Option<Rc<dyn FhirFuzzer<Ratio>>>,
    pub address: Option<Rc<dyn FhirFuzzer<Address>>>,
    pub human_name: Option<Rc<dyn FhirFuzzer<HumanName>>>,
    pub contact_point: Option<Rc<dyn FhirFuzzer<ContactPoint>>>,
    pub narrative: Option<Rc<dyn FhirFuzzer<Narrative>>>,
    pub annotation: Option<Rc<dyn FhirFuzzer<Annotation>>>,
    pub dosage: Option<Rc<dyn FhirFuzzer<Dosage>>>,
}

impl TypeFuzzers {
    /// The standard set covering every nested datatype
    pub fn standard() -> Self {
        Self {
            identifier: Some(Rc::new(datatypes::IdentifierFuzzer)),
            meta: Some(Rc::new(datatypes::MetaFuzzer)),
            reference: Some(Rc::new(datatypes::ReferenceFuzzer)),
            codeable_concept: Some(Rc::new(datatypes::CodeableConceptFuzzer)),
            coding: Some(Rc::new(datatypes::CodingFuzzer)),
            extension: Some(Rc::new(datatypes::ExtensionFuzzer)),
            period: Some(Rc::new(datatypes::PeriodFuzzer)),
            quantity: Some(Rc::new(datatypes::QuantityFuzzer)),
            ratio: Some(Rc::new(datatypes::RatioFuzzer)),
            address: Some(Rc::new(datatypes::AddressFuzzer)),
            human_name: Some(Rc::new(datatypes::HumanNameFuzzer)),
            contact_point: Some(Rc::new(datatypes::ContactPointFuzzer)),
            narrative: Some(Rc::new(datatypes::NarrativeFuzzer)),
            annotation: Some(Rc::new(datatypes::AnnotationFuzzer)),
            dosage: Some(Rc::new(datatypes::DosageFuzzer)),
        }
    }
}

impl Default for TypeFuzzers {
    fn default() -> Self {
        Self::standard()
    }
}

/// Maps a datatype to its registry slot, closing the set of fuzzable
/// datatypes at compile time
pub trait Fuzzable: Sized + 'static {
    fn fuzzer(registry: &TypeFuzzers) -> Option<Rc<dyn FhirFuzzer<Self>>>;
}

macro_rules! fuzzable {
    ($($ty:ty => $slot:ident),+ $(,)?) => {
        $(impl Fuzzable for $ty {
            fn fuzzer(registry: &TypeFuzzers) -> Option<Rc<dyn FhirFuzzer<Self>>> {
                registry.$slot.clone()
            }
        })+
    };
}

fuzzable! {
    Identifier => identifier,
    Meta => meta,
    Reference => reference,
    CodeableConcept => codeable_concept,
    Coding => coding,
    Extension => extension,
    Period => period,
    Quantity => quantity,
    Ratio => ratio,
    Address => address,
    HumanName => human_name,
    ContactPoint => contact_point,
    Narrative => narrative,
    Annotation => annotation,
    Dosage => dosage,
}

/// Shared state for one fuzzing session
pub struct FuzzerContext {
    pub config: FuzzConfig,
    pub fuzzers: TypeFuzzers,
    rng: StdRng,
    log: Vec<FuzzOperationResult>,
}

impl FuzzerContext {
    pub fn new(config: FuzzConfig) -> Self {
        Self {
            config,
            fuzzers: TypeFuzzers::standard(),
            rng: StdRng::from_entropy(),
            log: Vec::new(),
        }
    }

    /// Seeded construction for deterministic replays
    pub fn with_seed(config: FuzzConfig, seed: u64) -> Self {
        Self {
            config,
            fuzzers: TypeFuzzers::standard(),
            rng: StdRng::seed_from_u64(seed),
            log: Vec::new(),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Select a pseudorandom subset of `all`, sized by `percent_of_all`
    /// (or the full list when `use_all_mutators` is set), preserving
    /// original relative order.
    pub fn select_subset<M>(&mut self, all: Vec<M>) -> Vec<M> {
        if self.config.use_all_mutators {
            return all;
        }
        let count =
            (all.len() as f64 * self.config.percent_of_all() / 100.0).round() as usize;
        if count == 0 {
            return Vec::new();
        }
        if count >= all.len() {
            return all;
        }
        let mut picked = rand::seq::index::sample(&mut self.rng, all.len(), count).into_vec();
        picked.sort_unstable();
        let mut picked = picked.into_iter().peekable();
        all.into_iter()
            .enumerate()
            .filter_map(|(i, m)| {
                if picked.peek() == Some(&i) {
                    picked.next();
                    Some(m)
                } else {
                    None
                }
            })
            .collect()
    }

    /// True with the given probability, expressed as a percentage
    pub fn coin_flip(&mut self, percent: f64) -> bool {
        let p = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
        self.rng.gen_bool(p / 100.0)
    }

    /// Shorthand: coin flip at the configured `percent_of_each`
    pub fn each_flip(&mut self) -> bool {
        let p = self.config.percent_of_each();
        self.coin_flip(p)
    }

    /// Pick a uniformly random code value, excluding the given ones.
    /// Returns `None` when the exclusions exhaust the value set.
    pub fn pick_code<E: CodeSet>(&mut self, excluding: &[E]) -> Option<E> {
        let candidates: Vec<E> = E::variants()
            .iter()
            .copied()
            .filter(|v| !excluding.contains(v))
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    /// Look up the registered fuzzer for a nested datatype
    pub fn fuzzer_for<T: Fuzzable>(&self) -> Option<Rc<dyn FhirFuzzer<T>>> {
        T::fuzzer(&self.fuzzers)
    }

    /// Append one operation to the mutation log
    pub fn record(&mut self, op: FuzzOperationResult) {
        log::debug!("fuzz op: {}", op);
        self.log.push(op);
    }

    pub fn operation_log(&self) -> &[FuzzOperationResult] {
        &self.log
    }

    /// Drain the log, leaving the context ready for the next document
    pub fn take_log(&mut self) -> Vec<FuzzOperationResult> {
        std::mem::take(&mut self.log)
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::codes::{AdministrativeGender, MedicationStatus};
    use proptest::prelude::*;

    fn context() -> FuzzerContext {
        FuzzerContext::with_seed(FuzzConfig::default(), 7)
    }

    #[test]
    fn test_select_subset_bounds() {
        let mut ctx = context();

        ctx.config.set_percent_of_all(0.0);
        assert!(ctx.select_subset(vec![1, 2, 3, 4]).is_empty());

        ctx.config.set_percent_of_all(100.0);
        assert_eq!(ctx.select_subset(vec![1, 2, 3, 4]), vec![1, 2, 3, 4]);

        ctx.config.set_percent_of_all(0.0);
        ctx.config.use_all_mutators = true;
        assert_eq!(ctx.select_subset(vec![1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_select_subset_preserves_order() {
        let mut ctx = context();
        ctx.config.set_percent_of_all(50.0);
        for _ in 0..20 {
            let picked = ctx.select_subset((0..10).collect::<Vec<_>>());
            assert!(picked.windows(2).all(|w| w[0] < w[1]));
        }
    }

    proptest! {
        #[test]
        fn prop_select_subset_size(len in 0usize..40, percent in 0.0f64..=100.0) {
            let mut ctx = context();
            ctx.config.set_percent_of_all(percent);
            let picked = ctx.select_subset((0..len).collect::<Vec<_>>());
            let expected = ((len as f64 * percent / 100.0).round() as usize).min(len);
            prop_assert_eq!(picked.len(), expected);
        }
    }

    #[test]
    fn test_coin_flip_extremes() {
        let mut ctx = context();
        for _ in 0..50 {
            assert!(!ctx.coin_flip(0.0));
            assert!(ctx.coin_flip(100.0));
        }
        // out-of-range probabilities are clamped, not rejected
        assert!(ctx.coin_flip(250.0));
        assert!(!ctx.coin_flip(-3.0));
    }

    #[test]
    fn test_pick_code_respects_exclusions() {
        let mut ctx = context();
        for _ in 0..50 {
            let picked = ctx
                .pick_code(&[AdministrativeGender::Unknown])
                .unwrap();
            assert_ne!(picked, AdministrativeGender::Unknown);
        }
        // excluding the whole value set yields nothing
        let none = ctx.pick_code::<MedicationStatus>(&[
            MedicationStatus::Active,
            MedicationStatus::Inactive,
            MedicationStatus::EnteredInError,
        ]);
        assert!(none.is_none());
    }

    #[test]
    fn test_seeded_sessions_replay() {
        let mut a = FuzzerContext::with_seed(FuzzConfig::default(), 99);
        let mut b = FuzzerContext::with_seed(FuzzConfig::default(), 99);
        for _ in 0..20 {
            assert_eq!(a.coin_flip(50.0), b.coin_flip(50.0));
            assert_eq!(
                a.pick_code::<AdministrativeGender>(&[]),
                b.pick_code::<AdministrativeGender>(&[])
            );
        }
    }

    #[test]
    fn test_log_is_append_only_and_drainable() {
        let mut ctx = context();
        ctx.record(FuzzOperationResult::new("Patient.id", "None", "Some(\"x\")"));
        ctx.record(FuzzOperationResult::new("Patient.gender", "None", "None"));

        assert_eq!(ctx.operation_log().len(), 2);
        assert!(ctx.operation_log()[1].is_noop());

        let drained = ctx.take_log();
        assert_eq!(drained.len(), 2);
        assert!(ctx.operation_log().is_empty());
    }
}
