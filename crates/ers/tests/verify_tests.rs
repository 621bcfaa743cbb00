//! End-to-end tests: encoded record in, validation result out

mod common;

use ers::types::{
    DataObject, DigestAlgorithm, EvidenceRecordTimestampType, ReferenceType, ValidationMaterial,
};
use ers::{decode, validate_der, validate_json, Error, RecordFormat, ValidationPolicy, Verifier};
use rstest::rstest;

fn documents() -> ValidationMaterial {
    ValidationMaterial::new()
        .with_data_object(DataObject::from_bytes(b"contract.pdf contents".to_vec()).with_name("contract.pdf"))
        .with_data_object(DataObject::from_bytes(b"annex.xml contents".to_vec()).with_name("annex.xml"))
}

fn leaves(algorithm: DigestAlgorithm) -> Vec<Vec<u8>> {
    vec![
        common::digest(algorithm, b"contract.pdf contents").value,
        common::digest(algorithm, b"annex.xml contents").value,
    ]
}

fn renewed_record(algorithm: DigestAlgorithm) -> Vec<u8> {
    let initial = common::archive_time_stamp(algorithm, leaves(algorithm), 1);
    let renewal = common::renewal(algorithm, &initial, 2);
    common::record(vec![algorithm], vec![vec![initial, renewal]])
}

#[rstest]
#[case(DigestAlgorithm::Sha256)]
#[case(DigestAlgorithm::Sha384)]
#[case(DigestAlgorithm::Sha512)]
fn test_der_record_with_renewal(#[case] algorithm: DigestAlgorithm) {
    let result = validate_der(&renewed_record(algorithm), &documents()).unwrap();

    assert!(result.is_intact());
    assert_eq!(result.timestamps.len(), 2);
    assert_eq!(
        result.timestamps[1].timestamp_type,
        EvidenceRecordTimestampType::TimestampRenewalArchiveTimestamp
    );
    assert!(result.timestamps.iter().all(|t| t.outcome.generation_time.is_some()));
    let names: Vec<_> = result
        .reference_validations
        .iter()
        .map(|r| r.name.as_deref().unwrap())
        .collect();
    assert_eq!(names, vec!["contract.pdf", "annex.xml"]);
}

#[test]
fn test_der_record_with_chain_renewal() {
    let initial = common::archive_time_stamp(DigestAlgorithm::Sha256, leaves(DigestAlgorithm::Sha256), 1);
    let mut level = vec![common::digest(DigestAlgorithm::Sha512, &der::Encode::to_der(&initial).unwrap()).value];
    level.extend(leaves(DigestAlgorithm::Sha512));
    let renewed = common::archive_time_stamp(DigestAlgorithm::Sha512, level, 2);
    let der = common::record(
        vec![DigestAlgorithm::Sha256, DigestAlgorithm::Sha512],
        vec![vec![initial], vec![renewed]],
    );

    let result = validate_der(&der, &documents()).unwrap();

    assert!(result.is_intact());
    assert!(result.timestamps[1]
        .reference_validations()
        .iter()
        .any(|r| r.reference_type == ReferenceType::ArchiveTimestampSequence && r.is_valid()));
}

#[test]
fn test_missing_document_is_orphaned() {
    let material = ValidationMaterial::new()
        .with_data_object(DataObject::from_bytes(b"contract.pdf contents".to_vec()).with_name("contract.pdf"));

    let result = validate_der(&renewed_record(DigestAlgorithm::Sha256), &material).unwrap();

    assert_eq!(result.orphan_references().count(), 1);
    assert_eq!(result.intact_timestamp_count(), 2);
    assert!(!result.is_intact());
}

#[test]
fn test_json_form_validates_like_der() {
    let der = renewed_record(DigestAlgorithm::Sha256);
    let record = decode(&der).unwrap();
    let json = record.to_json().unwrap();
    assert_eq!(RecordFormat::detect(json.as_bytes()), Some(RecordFormat::Json));

    let from_der = validate_der(&der, &documents()).unwrap();
    let from_json = validate_json(&json, &documents()).unwrap();
    assert_eq!(from_der, from_json);
}

#[test]
fn test_verifier_policy_is_applied() {
    let material = ValidationMaterial::new()
        .with_data_object(DataObject::from_bytes(b"contract.pdf contents".to_vec()).with_name("contract.pdf"))
        .with_data_object(DataObject::from_bytes(b"tampered annex".to_vec()).with_name("annex.xml"));
    let der = renewed_record(DigestAlgorithm::Sha256);

    let lenient = Verifier::new().verify(&der, &material).unwrap();
    let annex = lenient
        .reference_validations
        .iter()
        .find(|r| r.name.as_deref() == Some("annex.xml"))
        .unwrap();
    assert!(annex.found && !annex.intact);

    let strict = Verifier::with_policy(ValidationPolicy::default().orphan_unmatched_objects())
        .verify(&der, &material)
        .unwrap();
    assert_eq!(strict.orphan_references().count(), 1);
}

#[test]
fn test_garbage_is_rejected() {
    assert!(matches!(
        Verifier::new().verify(b"not a record", &ValidationMaterial::new()),
        Err(Error::UnknownFormat)
    ));
    assert!(matches!(
        validate_json("{\"archiveTimeStampSequence\": 5}", &ValidationMaterial::new()),
        Err(Error::Types(_))
    ));
}
