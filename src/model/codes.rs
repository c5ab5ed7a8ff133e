// fhir-fuzzing/src/model/codes.rs
//! Closed FHIR R4 code value sets used by the model and the mutators

use serde::Serialize;
use std::fmt;

/// Trait for closed code value sets whose variants are known at design time.
///
/// `pick_code` on the context draws uniformly from `variants()`, so every
/// code enum the mutators touch implements this.
pub trait CodeSet: Copy + PartialEq + Sized + 'static {
    /// All values of the set, in definition order
    fn variants() -> &'static [Self];

    /// The wire-level code for this value
    fn code(&self) -> &'static str;
}

macro_rules! code_set {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl CodeSet for $name {
            fn variants() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

code_set! {
    /// Identifier.use
    IdentifierUse {
        Usual => "usual",
        Official => "official",
        Temp => "temp",
        Secondary => "secondary",
        Old => "old",
    }
}

code_set! {
    /// HumanName.use
    NameUse {
        Usual => "usual",
        Official => "official",
        Temp => "temp",
        Nickname => "nickname",
        Anonymous => "anonymous",
        Old => "old",
        Maiden => "maiden",
    }
}

code_set! {
    /// Address.use
    AddressUse {
        Home => "home",
        Work => "work",
        Temp => "temp",
        Old => "old",
        Billing => "billing",
    }
}

code_set! {
    /// Address.type
    AddressType {
        Postal => "postal",
        Physical => "physical",
        Both => "both",
    }
}

code_set! {
    /// ContactPoint.system
    ContactPointSystem {
        Phone => "phone",
        Fax => "fax",
        Email => "email",
        Pager => "pager",
        Url => "url",
        Sms => "sms",
        Other => "other",
    }
}

code_set! {
    /// ContactPoint.use
    ContactPointUse {
        Home => "home",
        Work => "work",
        Temp => "temp",
        Old => "old",
        Mobile => "mobile",
    }
}

code_set! {
    /// Patient.gender / Practitioner.gender
    AdministrativeGender {
        Male => "male",
        Female => "female",
        Other => "other",
        Unknown => "unknown",
    }
}

code_set! {
    /// Narrative.status
    NarrativeStatus {
        Generated => "generated",
        Extensions => "extensions",
        Additional => "additional",
        Empty => "empty",
    }
}

code_set! {
    /// Coverage.status (financial resource status)
    CoverageStatus {
        Active => "active",
        Cancelled => "cancelled",
        Draft => "draft",
        EnteredInError => "entered-in-error",
    }
}

code_set! {
    /// Composition.status
    CompositionStatus {
        Preliminary => "preliminary",
        Final => "final",
        Amended => "amended",
        EnteredInError => "entered-in-error",
    }
}

code_set! {
    /// Medication.status
    MedicationStatus {
        Active => "active",
        Inactive => "inactive",
        EnteredInError => "entered-in-error",
    }
}

code_set! {
    /// MedicationRequest.status
    MedicationRequestStatus {
        Active => "active",
        OnHold => "on-hold",
        Cancelled => "cancelled",
        Completed => "completed",
        EnteredInError => "entered-in-error",
        Stopped => "stopped",
        Draft => "draft",
        Unknown => "unknown",
    }
}

code_set! {
    /// MedicationRequest.intent
    MedicationRequestIntent {
        Proposal => "proposal",
        Plan => "plan",
        Order => "order",
        OriginalOrder => "original-order",
        InstanceOrder => "instance-order",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_are_closed_and_distinct() {
        let all = CoverageStatus::variants();
        assert_eq!(all.len(), 4);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_codes_round_trip_display() {
        assert_eq!(MedicationRequestStatus::OnHold.to_string(), "on-hold");
        assert_eq!(AdministrativeGender::Unknown.code(), "unknown");
    }
}
