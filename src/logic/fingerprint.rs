use crate::models::TreatmentEvent;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Content digest over the core treatment fields plus a caller-supplied
/// creation nonce (typically wall-clock millis at creation). Field order is
/// fixed: group, drug, date, dosage, nonce. Because the nonce is ephemeral,
/// a stored digest can only be re-verified when the nonce was persisted with
/// it; whether to store or drop the nonce is a product decision, so it stays
/// a caller-supplied input here.
pub fn record_fingerprint(
    group_id: &str,
    drug_name: &str,
    administered_on: NaiveDate,
    dosage_text: &str,
    nonce: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(group_id.as_bytes());
    hasher.update(drug_name.as_bytes());
    hasher.update(administered_on.to_string().as_bytes());
    hasher.update(dosage_text.as_bytes());
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn fingerprint_event(event: &TreatmentEvent, nonce: &str) -> String {
    record_fingerprint(
        &event.group_id,
        &event.drug_name,
        event.administered_on,
        &event.dosage_text,
        nonce,
    )
}

/// Recomputes the digest from stored fields and compares it against the
/// stored value. A mismatch means some field (or the nonce) changed since
/// the record was written.
pub fn verify_fingerprint(event: &TreatmentEvent, nonce: &str, stored: &str) -> bool {
    fingerprint_event(event, nonce) == stored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;

    fn event() -> TreatmentEvent {
        TreatmentEvent::new(
            "Oxytetracycline",
            "group-12",
            Species::Cattle,
            "10 mg/kg",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        )
    }

    #[test]
    fn digest_is_hex_sha256() {
        let digest = fingerprint_event(&event(), "1709640000000");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn identical_inputs_identical_digest() {
        let a = fingerprint_event(&event(), "1709640000000");
        let b = fingerprint_event(&event(), "1709640000000");
        assert_eq!(a, b);
    }

    #[test]
    fn any_field_change_changes_digest() {
        let nonce = "1709640000000";
        let base = fingerprint_event(&event(), nonce);

        let mut changed = event();
        changed.dosage_text = "11 mg/kg".into();
        assert_ne!(fingerprint_event(&changed, nonce), base);

        let mut changed = event();
        changed.group_id = "group-13".into();
        assert_ne!(fingerprint_event(&changed, nonce), base);

        let mut changed = event();
        changed.administered_on = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_ne!(fingerprint_event(&changed, nonce), base);

        assert_ne!(fingerprint_event(&event(), "1709640000001"), base);
    }

    #[test]
    fn verify_detects_tampering() {
        let nonce = "1709640000000";
        let stored = fingerprint_event(&event(), nonce);
        assert!(verify_fingerprint(&event(), nonce, &stored));

        let mut tampered = event();
        tampered.dosage_text = "50 mg/kg".into();
        assert!(!verify_fingerprint(&tampered, nonce, &stored));
    }
}
