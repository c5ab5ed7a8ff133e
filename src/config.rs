// fhir-fuzzing/src/config.rs
//! Fuzzing session configuration: intensity knobs and scoped context flags

use crate::model::resources::ResourceKind;

/// A named context flag switching mutator behavior mid-session.
///
/// Flags are pushed and popped in a scoped, stack-like discipline: resource
/// fuzzers push one before delegating into a nested type fuzzer and pop it
/// immediately after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// The KBV clinical-document profile is active; profile-forbidden
    /// fields are excluded from mutator lists.
    KbvProfile,
    /// A nested Meta fuzzer should only touch the profile list.
    OnlyProfile,
    /// A nested Extension fuzzer was triggered by a resource-level mutator
    /// and must not fan out into sub-extension recursion.
    TriggeredBy(ResourceKind),
}

/// Stack of active context flags
#[derive(Debug, Clone, Default)]
pub struct FlagStack {
    entries: Vec<Flag>,
}

impl FlagStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, flag: Flag) {
        self.entries.push(flag);
    }

    pub fn pop(&mut self) -> Option<Flag> {
        self.entries.pop()
    }

    pub fn is_set(&self, flag: Flag) -> bool {
        self.entries.contains(&flag)
    }

    /// True when any `TriggeredBy(_)` marker is active
    pub fn triggered(&self) -> bool {
        self.entries
            .iter()
            .any(|f| matches!(f, Flag::TriggeredBy(_)))
    }
}

/// Intensity knobs for one fuzzing session.
///
/// Percentages are fractions of 100; out-of-range values are clamped, never
/// rejected, since this is a best-effort test-data generator.
#[derive(Debug, Clone)]
pub struct FuzzConfig {
    percent_of_all: f64,
    percent_of_each: f64,
    /// Bypass subset selection and run every mutator
    pub use_all_mutators: bool,
    /// Scoped context flags, including the session-level profile flag
    pub flags: FlagStack,
}

impl FuzzConfig {
    pub fn new(percent_of_all: f64, percent_of_each: f64) -> Self {
        Self {
            percent_of_all: clamp_percent(percent_of_all),
            percent_of_each: clamp_percent(percent_of_each),
            use_all_mutators: false,
            flags: FlagStack::new(),
        }
    }

    /// Fraction of a mutator list selected for one fuzz pass
    pub fn percent_of_all(&self) -> f64 {
        self.percent_of_all
    }

    /// Probability of the clear branch inside an individual field mutator
    pub fn percent_of_each(&self) -> f64 {
        self.percent_of_each
    }

    pub fn set_percent_of_all(&mut self, value: f64) {
        self.percent_of_all = clamp_percent(value);
    }

    pub fn set_percent_of_each(&mut self, value: f64) {
        self.percent_of_each = clamp_percent(value);
    }

    pub fn with_all_mutators(mut self) -> Self {
        self.use_all_mutators = true;
        self
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self::new(30.0, 50.0)
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_percentages_are_clamped() {
        let config = FuzzConfig::new(150.0, -20.0);
        assert_eq!(config.percent_of_all(), 100.0);
        assert_eq!(config.percent_of_each(), 0.0);

        let mut config = FuzzConfig::default();
        config.set_percent_of_all(f64::NAN);
        assert_eq!(config.percent_of_all(), 0.0);
    }

    #[test]
    fn test_flag_stack_scoping() {
        let mut flags = FlagStack::new();
        flags.push(Flag::KbvProfile);
        flags.push(Flag::TriggeredBy(ResourceKind::Coverage));

        assert!(flags.is_set(Flag::KbvProfile));
        assert!(flags.triggered());

        assert_eq!(flags.pop(), Some(Flag::TriggeredBy(ResourceKind::Coverage)));
        assert!(!flags.triggered());
        assert!(flags.is_set(Flag::KbvProfile));
    }
}
