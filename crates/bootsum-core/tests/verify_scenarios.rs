//! End-to-end seal/persist/verify scenarios over an in-memory file system.

mod common;

use bootsum_core::{
    compute, ArtifactId, ChecksumTable, DigestValue, FormatError, IoError, IoOp, IoStatus,
    SealError, Verdict, Verifier, VerifyError, CHECKSUMS_PATH, TABLE_LEN,
};
use common::mem_fs::MemFs;

const BOOT1: &str = "\\EFI\\BOOT\\boot1.png";

fn provisioned() -> MemFs {
    let mut fs = MemFs::new();
    fs.put(BOOT1, b"boot1-v1");
    fs.put(ArtifactId::Boot2Image.boot_path(), b"boot2-v1");
    fs.put(ArtifactId::ConfigFile.boot_path(), b"timeout=3\n");
    fs
}

#[test]
fn seal_then_verify_matches() {
    let mut fs = provisioned();
    let mut v = Verifier::new(&mut fs);
    let table = v
        .seal(ArtifactId::Boot1Image, BOOT1, ChecksumTable::zeroed())
        .unwrap();
    assert_eq!(table.get(ArtifactId::Boot1Image), compute(b"boot1-v1"));
    assert_eq!(v.verify(ArtifactId::Boot1Image, BOOT1, &table), Ok(Verdict::Match));
}

#[test]
fn tampered_file_is_mismatch() {
    let mut fs = provisioned();
    let table = Verifier::new(&mut fs)
        .seal(ArtifactId::Boot1Image, BOOT1, ChecksumTable::zeroed())
        .unwrap();
    Verifier::new(&mut fs).save_table(CHECKSUMS_PATH, &table).unwrap();

    fs.put(BOOT1, b"boot1-v2");

    let mut v = Verifier::new(&mut fs);
    let baseline = v.load_table(CHECKSUMS_PATH).unwrap();
    assert_eq!(
        v.verify(ArtifactId::Boot1Image, BOOT1, &baseline),
        Ok(Verdict::Mismatch)
    );
}

#[test]
fn verify_bytes_against_persisted_blob() {
    let mut fs = provisioned();
    let table = Verifier::new(&mut fs)
        .seal(ArtifactId::Boot1Image, BOOT1, ChecksumTable::zeroed())
        .unwrap();
    let blob = table.encode();
    let mut v = Verifier::new(&mut fs);
    assert_eq!(
        v.verify_bytes(ArtifactId::Boot1Image, BOOT1, &blob),
        Ok(Verdict::Match)
    );
    assert_eq!(
        v.verify_bytes(ArtifactId::Boot1Image, BOOT1, &blob[..50]),
        Err(VerifyError::Format(FormatError { found: 50 }))
    );
}

#[test]
fn fresh_table_reports_absent_for_every_artifact() {
    let mut fs = provisioned();
    let table = ChecksumTable::zeroed();
    let report = Verifier::new(&mut fs).verify_all(&table, ArtifactId::boot_path);
    for (id, outcome) in report.iter() {
        assert_eq!(outcome, Ok(Verdict::Absent), "{id}");
    }
    assert!(!report.all_match());
    assert!(!report.any_mismatch());
}

#[test]
fn missing_file_is_io_error_not_match() {
    let mut fs = provisioned();
    let table = Verifier::new(&mut fs)
        .seal(ArtifactId::Boot1Image, BOOT1, ChecksumTable::zeroed())
        .unwrap();
    let got = Verifier::new(&mut fs).verify(ArtifactId::Boot1Image, "/nonexistent", &table);
    assert_eq!(
        got,
        Err(VerifyError::Io(IoError::new(IoOp::Open, IoStatus::NotFound)))
    );
}

#[test]
fn unreadable_file_with_unsealed_slot_is_still_io_error() {
    let mut fs = provisioned();
    fs.locked.push(BOOT1.to_string());
    let got =
        Verifier::new(&mut fs).verify(ArtifactId::Boot1Image, BOOT1, &ChecksumTable::zeroed());
    assert_eq!(
        got,
        Err(VerifyError::Io(IoError::new(IoOp::Open, IoStatus::AccessDenied)))
    );
}

#[test]
fn corrupt_store_yields_format_error() {
    let mut fs = provisioned();
    fs.put(CHECKSUMS_PATH, &[0x5Au8; 50]);
    assert_eq!(
        Verifier::new(&mut fs).load_table(CHECKSUMS_PATH),
        Err(VerifyError::Format(FormatError { found: 50 }))
    );
    assert_eq!(
        Verifier::new(&mut fs).verify_boot_set(),
        Err(VerifyError::Format(FormatError { found: 50 }))
    );
}

#[test]
fn missing_store_is_io_error() {
    let mut fs = provisioned();
    let err = Verifier::new(&mut fs).verify_boot_set().unwrap_err();
    assert_eq!(
        err,
        VerifyError::Io(IoError::new(IoOp::Open, IoStatus::NotFound))
    );
}

#[test]
fn seal_boot_set_persists_full_table() {
    let mut fs = provisioned();
    let table = Verifier::new(&mut fs).seal_boot_set().unwrap();
    assert!(table.is_fully_sealed());
    assert_eq!(fs.get(CHECKSUMS_PATH).map(<[u8]>::len), Some(TABLE_LEN));
    assert_eq!(fs.get(CHECKSUMS_PATH), Some(&table.encode()[..]));

    let report = Verifier::new(&mut fs).verify_boot_set().unwrap();
    assert!(report.all_match());
    assert_eq!(fs.opens, fs.closes);
}

#[test]
fn seal_boot_set_writes_nothing_when_an_artifact_is_missing() {
    let mut fs = provisioned();
    fs.remove(ArtifactId::Boot2Image.boot_path());
    let err = Verifier::new(&mut fs).seal_boot_set().unwrap_err();
    assert_eq!(
        err,
        SealError::Artifact {
            artifact: ArtifactId::Boot2Image,
            source: IoError::new(IoOp::Open, IoStatus::NotFound),
        }
    );
    assert!(fs.get(CHECKSUMS_PATH).is_none());
}

#[test]
fn seal_boot_set_reports_persist_failure() {
    let mut fs = provisioned();
    fs.locked.push(CHECKSUMS_PATH.to_string());
    let err = Verifier::new(&mut fs).seal_boot_set().unwrap_err();
    assert_eq!(
        err,
        SealError::Persist(IoError::new(IoOp::Open, IoStatus::AccessDenied))
    );
}

#[test]
fn report_mixes_outcomes_per_artifact() {
    let mut fs = provisioned();
    let mut table = Verifier::new(&mut fs)
        .seal_all(ChecksumTable::zeroed(), ArtifactId::boot_path)
        .unwrap();
    table.set(ArtifactId::ConfigFile, DigestValue::ZERO);

    fs.put(ArtifactId::Boot2Image.boot_path(), b"boot2-evil");
    let report = Verifier::new(&mut fs).verify_all(&table, ArtifactId::boot_path);
    assert_eq!(report.get(ArtifactId::Boot1Image), Ok(Verdict::Match));
    assert_eq!(report.get(ArtifactId::Boot2Image), Ok(Verdict::Mismatch));
    assert_eq!(report.get(ArtifactId::ConfigFile), Ok(Verdict::Absent));
    assert!(report.any_mismatch());
    assert!(!report.all_match());
}

#[test]
fn empty_artifact_file_seals_to_empty_digest() {
    let mut fs = provisioned();
    fs.put(BOOT1, b"");
    let table = Verifier::new(&mut fs)
        .seal(ArtifactId::Boot1Image, BOOT1, ChecksumTable::zeroed())
        .unwrap();
    assert_eq!(table.get(ArtifactId::Boot1Image), compute(b""));
}
