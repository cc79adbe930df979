use crate::db::StoreError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Storage strings are the human-readable forms clients send and receive
/// ("Root Canal", "No Show"), so serde is pinned to the same mapping.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $variant
            ),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AppointmentType {
    Consultation => "Consultation",
    Cleaning => "Cleaning",
    Filling => "Filling",
    RootCanal => "Root Canal",
    Extraction => "Extraction",
    Crown => "Crown",
    Orthodontic => "Orthodontic",
    Emergency => "Emergency",
    FollowUp => "Follow-up",
    Other => "Other",
});

str_enum!(AppointmentStatus {
    Scheduled => "Scheduled",
    Completed => "Completed",
    Cancelled => "Cancelled",
    NoShow => "No Show",
});

str_enum!(TreatmentType {
    Cleaning => "Cleaning",
    Filling => "Filling",
    RootCanal => "Root Canal",
    Extraction => "Extraction",
    Crown => "Crown",
    Bridge => "Bridge",
    Implant => "Implant",
    Orthodontic => "Orthodontic",
    Whitening => "Whitening",
    Other => "Other",
});

str_enum!(PaymentMethod {
    Cash => "Cash",
    CreditCard => "Credit Card",
    DebitCard => "Debit Card",
    Insurance => "Insurance",
    Check => "Check",
    Online => "Online",
});

str_enum!(PaymentType {
    FullPayment => "Full Payment",
    PartialPayment => "Partial Payment",
    Deposit => "Deposit",
});

str_enum!(PaymentStatus {
    Paid => "Paid",
    Pending => "Pending",
    Refunded => "Refunded",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_type_round_trip() {
        for (variant, s) in [
            (AppointmentType::Consultation, "Consultation"),
            (AppointmentType::Cleaning, "Cleaning"),
            (AppointmentType::Filling, "Filling"),
            (AppointmentType::RootCanal, "Root Canal"),
            (AppointmentType::Extraction, "Extraction"),
            (AppointmentType::Crown, "Crown"),
            (AppointmentType::Orthodontic, "Orthodontic"),
            (AppointmentType::Emergency, "Emergency"),
            (AppointmentType::FollowUp, "Follow-up"),
            (AppointmentType::Other, "Other"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AppointmentType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn appointment_status_round_trip() {
        for (variant, s) in [
            (AppointmentStatus::Scheduled, "Scheduled"),
            (AppointmentStatus::Completed, "Completed"),
            (AppointmentStatus::Cancelled, "Cancelled"),
            (AppointmentStatus::NoShow, "No Show"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AppointmentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn payment_enums_round_trip() {
        for (variant, s) in [
            (PaymentMethod::Cash, "Cash"),
            (PaymentMethod::CreditCard, "Credit Card"),
            (PaymentMethod::DebitCard, "Debit Card"),
            (PaymentMethod::Insurance, "Insurance"),
            (PaymentMethod::Check, "Check"),
            (PaymentMethod::Online, "Online"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(PaymentMethod::from_str(s).unwrap(), variant);
        }
        for (variant, s) in [
            (PaymentType::FullPayment, "Full Payment"),
            (PaymentType::PartialPayment, "Partial Payment"),
            (PaymentType::Deposit, "Deposit"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(PaymentType::from_str(s).unwrap(), variant);
        }
        for (variant, s) in [
            (PaymentStatus::Paid, "Paid"),
            (PaymentStatus::Pending, "Pending"),
            (PaymentStatus::Refunded, "Refunded"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(PaymentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn serde_uses_storage_strings() {
        let json = serde_json::to_string(&AppointmentType::RootCanal).unwrap();
        assert_eq!(json, "\"Root Canal\"");
        let back: AppointmentStatus = serde_json::from_str("\"No Show\"").unwrap();
        assert_eq!(back, AppointmentStatus::NoShow);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(AppointmentType::from_str("Telepathy").is_err());
        assert!(AppointmentStatus::from_str("scheduled").is_err());
        assert!(PaymentMethod::from_str("").is_err());
    }

    #[test]
    fn invalid_enum_error_names_field_and_value() {
        match AppointmentType::from_str("Telepathy").unwrap_err() {
            StoreError::InvalidEnum { field, value } => {
                assert_eq!(field, "AppointmentType");
                assert_eq!(value, "Telepathy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
