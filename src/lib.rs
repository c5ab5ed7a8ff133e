// fhir-fuzzing
// Core library definition

//! Mutation fuzzing engine for typed FHIR R4 clinical documents.
//!
//! Given a syntactically valid resource (built elsewhere), the engine
//! applies a configurable, logged, partially-randomized set of field
//! mutations to probe a target server's input validation. It knows nothing
//! about HTTP or test orchestration; callers feed it a document and collect
//! the mutated document plus the operation log.
//!
//! ```
//! use fhir_fuzzing::config::FuzzConfig;
//! use fhir_fuzzing::context::FuzzerContext;
//! use fhir_fuzzing::model::resources::Patient;
//! use fhir_fuzzing::mutators::patient::PatientFuzzer;
//! use fhir_fuzzing::mutators::FhirFuzzer;
//!
//! let mut ctx = FuzzerContext::with_seed(FuzzConfig::new(100.0, 30.0), 1);
//! let mut patient = Patient::default();
//! PatientFuzzer.fuzz(&mut ctx, &mut patient);
//! assert!(!ctx.operation_log().is_empty());
//! ```

pub mod config;
pub mod context;
pub mod model;
pub mod mutators;
pub mod primitives;
pub mod reporters;

/// Initialize logging for the fuzzing engine.
///
/// Safe to call more than once; later calls are no-ops. Intended for test
/// binaries that want mutation operations at debug level.
pub fn init() {
    let _ = env_logger::builder().format_timestamp(None).try_init();
}
