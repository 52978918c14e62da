use super::*;
use std::io::Read;

use romaudit_dat::{DatFile, DatGame, DatRom, HashAlgorithm};

use crate::audit::{AuditOptions, audit_path};
use crate::hasher::hash_reader;

fn rom(name: &str, data: &str) -> DatRom {
    DatRom {
        name: name.to_string(),
        size: Some(data.len() as u64),
        sha1: Some(hash_reader(&mut data.as_bytes(), HashAlgorithm::Sha1).unwrap()),
        ..Default::default()
    }
}

fn make_catalog() -> Catalog {
    let game = |name: &str, roms| DatGame {
        name: name.to_string(),
        description: None,
        roms,
    };
    Catalog::from_dat(DatFile {
        name: "Test".to_string(),
        games: vec![
            game("Full", vec![rom("f1.bin", "full one"), rom("f2.bin", "full two")]),
            game("Half", vec![rom("h1.bin", "half one"), rom("h2.bin", "half two")]),
        ],
        ..Default::default()
    })
}

fn audit_dir(catalog: &Catalog, dir: &Path, files: &[(&str, &str)]) -> Vec<PathResult> {
    files
        .iter()
        .map(|(name, data)| {
            let path = dir.join(name);
            fs::write(&path, data).unwrap();
            PathResult {
                outcome: audit_path(catalog, &path, &AuditOptions::default()),
                path,
            }
        })
        .collect()
}

#[test]
fn test_plan_only_complete_sets() {
    let catalog = make_catalog();
    let dir = tempfile::tempdir().unwrap();
    let results = audit_dir(
        &catalog,
        dir.path(),
        &[
            ("f1.bin", "full one"),
            ("f2.bin", "full two"),
            ("h1.bin", "half one"),
            // Right content, wrong name: not an exact match
            ("wrong.bin", "half two"),
        ],
    );

    let plans = plan_sets(&catalog, &results);
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].game_name, "Full");
    assert_eq!(plans[0].archive_name(), "Full.zip");
    assert_eq!(
        plans[0].files,
        vec![
            (RomId(0), dir.path().join("f1.bin")),
            (RomId(1), dir.path().join("f2.bin")),
        ]
    );
}

#[test]
fn test_write_set_uses_catalog_names() {
    let catalog = make_catalog();
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let results = audit_dir(
        &catalog,
        dir.path(),
        &[("f1.bin", "full one"), ("f2.bin", "full two")],
    );
    let plans = plan_sets(&catalog, &results);

    let target = write_set(&catalog, &plans[0], out.path()).unwrap();
    assert_eq!(target, out.path().join("Full.zip"));

    let mut archive = zip::ZipArchive::new(File::open(&target).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
    let mut contents = String::new();
    archive
        .by_name("f2.bin")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "full two");
    assert_eq!(
        archive.by_name("f1.bin").unwrap().compression(),
        CompressionMethod::Deflated
    );
}

#[test]
fn test_write_set_refuses_existing_target() {
    let catalog = make_catalog();
    let dir = tempfile::tempdir().unwrap();
    let results = audit_dir(
        &catalog,
        dir.path(),
        &[("f1.bin", "full one"), ("f2.bin", "full two")],
    );
    let plans = plan_sets(&catalog, &results);

    let existing = dir.path().join("Full.zip");
    fs::write(&existing, b"keep me").unwrap();

    let err = write_set(&catalog, &plans[0], dir.path()).unwrap_err();
    assert!(matches!(err, AuditError::Output { .. }));
    assert_eq!(fs::read(&existing).unwrap(), b"keep me");
}

#[test]
fn test_remove_sources() {
    let catalog = make_catalog();
    let dir = tempfile::tempdir().unwrap();
    let results = audit_dir(
        &catalog,
        dir.path(),
        &[("f1.bin", "full one"), ("f2.bin", "full two")],
    );
    let plans = plan_sets(&catalog, &results);
    write_set(&catalog, &plans[0], dir.path()).unwrap();

    assert!(remove_sources([&plans[0]]).is_empty());
    assert!(!dir.path().join("f1.bin").exists());
    assert!(!dir.path().join("f2.bin").exists());
    assert!(dir.path().join("Full.zip").exists());

    // Second removal reports every file as failed
    assert_eq!(remove_sources([&plans[0]]).len(), 2);
}

#[test]
fn test_shared_file_survives_until_every_set_is_written() {
    let catalog = Catalog::from_dat(DatFile {
        name: "Test".to_string(),
        games: vec![
            DatGame {
                name: "Copy A".to_string(),
                description: None,
                roms: vec![rom("shared.bin", "shared data")],
            },
            DatGame {
                name: "Copy B".to_string(),
                description: None,
                roms: vec![rom("shared.bin", "shared data")],
            },
        ],
        ..Default::default()
    });
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let results = audit_dir(&catalog, src.path(), &[("shared.bin", "shared data")]);

    let plans = plan_sets(&catalog, &results);
    assert_eq!(plans.len(), 2);
    for plan in &plans {
        write_set(&catalog, plan, out.path()).unwrap();
    }

    assert!(remove_sources(&plans).is_empty());
    assert!(!src.path().join("shared.bin").exists());
    assert!(out.path().join("Copy A.zip").exists());
    assert!(out.path().join("Copy B.zip").exists());
}
