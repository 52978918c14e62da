use super::*;
use crate::dat::DatGame;

fn rom(name: &str, size: u64, sha1: &str, crc: &str) -> DatRom {
    DatRom {
        name: name.to_string(),
        size: Some(size),
        crc: Some(crc.to_string()),
        md5: None,
        sha1: Some(sha1.to_string()),
    }
}

fn make_test_dat() -> DatFile {
    DatFile {
        name: "Test System".to_string(),
        description: "Test System".to_string(),
        version: "1".to_string(),
        games: vec![
            DatGame {
                name: "Alpha (USA)".to_string(),
                description: None,
                roms: vec![
                    rom("Alpha (USA) (Track 1).bin", 10, "AAAA000000000000000000000000000000000001", "AAAA0001"),
                    rom("Alpha (USA) (Track 2).bin", 20, "AAAA000000000000000000000000000000000002", "AAAA0002"),
                ],
            },
            DatGame {
                name: "Beta (Europe)".to_string(),
                description: Some("Beta".to_string()),
                roms: vec![rom(
                    "Beta (Europe).bin",
                    30,
                    "bbbb000000000000000000000000000000000001",
                    "bbbb0001",
                )],
            },
            // Same content and name as Beta, different game
            DatGame {
                name: "Beta (Europe) (Rev 1)".to_string(),
                description: None,
                roms: vec![rom(
                    "Beta (Europe).bin",
                    30,
                    "BBBB000000000000000000000000000000000001",
                    "BBBB0001",
                )],
            },
            DatGame {
                name: "Empty".to_string(),
                description: None,
                roms: vec![],
            },
        ],
    }
}

#[test]
fn test_from_dat_builds_arena() {
    let catalog = Catalog::from_dat(make_test_dat());
    assert_eq!(catalog.name, "Test System");
    assert_eq!(catalog.game_count(), 4);
    assert_eq!(catalog.rom_count(), 4);

    let alpha = catalog.game(GameId(0));
    assert_eq!(alpha.name, "Alpha (USA)");
    assert_eq!(alpha.roms, vec![RomId(0), RomId(1)]);
    assert_eq!(catalog.child_roms(GameId(1)), &[RomId(2)]);
    assert!(catalog.child_roms(GameId(3)).is_empty());

    assert_eq!(catalog.parent_game(RomId(1)), GameId(0));
    assert_eq!(catalog.rom(RomId(3)).game, GameId(2));
}

#[test]
fn test_hashes_are_lowercased() {
    let catalog = Catalog::from_dat(make_test_dat());
    let entry = catalog.rom(RomId(0));
    assert_eq!(
        entry.hash(HashAlgorithm::Sha1),
        Some("aaaa000000000000000000000000000000000001")
    );
    assert_eq!(entry.hash(HashAlgorithm::Crc), Some("aaaa0001"));
    assert_eq!(entry.hash(HashAlgorithm::Md5), None);
}

#[test]
fn test_find_by_hash_case_insensitive() {
    let catalog = Catalog::from_dat(make_test_dat());
    let lower = catalog.find_by_hash(
        HashAlgorithm::Sha1,
        "aaaa000000000000000000000000000000000002",
    );
    let upper = catalog.find_by_hash(
        HashAlgorithm::Sha1,
        "AAAA000000000000000000000000000000000002",
    );
    assert_eq!(lower, &[RomId(1)]);
    assert_eq!(lower, upper);
}

#[test]
fn test_find_by_hash_preserves_duplicates() {
    let catalog = Catalog::from_dat(make_test_dat());
    let matches = catalog.find_by_hash(
        HashAlgorithm::Sha1,
        "bbbb000000000000000000000000000000000001",
    );
    assert_eq!(matches, &[RomId(2), RomId(3)]);
    assert_ne!(
        catalog.parent_game(matches[0]),
        catalog.parent_game(matches[1])
    );
}

#[test]
fn test_find_by_hash_respects_algorithm() {
    let catalog = Catalog::from_dat(make_test_dat());
    assert_eq!(catalog.find_by_hash(HashAlgorithm::Crc, "AAAA0001"), &[RomId(0)]);
    // A sha1 digest is never found in the crc index
    assert!(catalog
        .find_by_hash(HashAlgorithm::Crc, "aaaa000000000000000000000000000000000001")
        .is_empty());
    assert!(catalog.find_by_hash(HashAlgorithm::Md5, "aaaa0001").is_empty());
}

#[test]
fn test_find_by_name_exact() {
    let catalog = Catalog::from_dat(make_test_dat());
    assert_eq!(
        catalog.find_by_name("Beta (Europe).bin", NameMatch::Exact),
        vec![RomId(2), RomId(3)]
    );
    assert!(catalog.find_by_name("Beta", NameMatch::Exact).is_empty());
}

#[test]
fn test_find_by_name_substring() {
    let catalog = Catalog::from_dat(make_test_dat());
    let found = catalog.find_by_name("Track", NameMatch::Substring);
    assert_eq!(found, vec![RomId(0), RomId(1)]);
    // Substring matching is case sensitive
    assert!(catalog.find_by_name("track", NameMatch::Substring).is_empty());
}

#[test]
fn test_find_games_by_name() {
    let catalog = Catalog::from_dat(make_test_dat());
    assert_eq!(
        catalog.find_games_by_name("Beta", NameMatch::Substring),
        vec![GameId(1), GameId(2)]
    );
    assert_eq!(
        catalog.find_games_by_name("Beta (Europe)", NameMatch::Exact),
        vec![GameId(1)]
    );
}

#[test]
fn test_games_iterates_in_catalog_order() {
    let catalog = Catalog::from_dat(make_test_dat());
    let names: Vec<&str> = catalog.games().map(|(_, g)| g.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Alpha (USA)", "Beta (Europe)", "Beta (Europe) (Rev 1)", "Empty"]
    );
}

#[test]
fn test_empty_hash_attributes_are_ignored() {
    let dat = DatFile {
        name: "Test".to_string(),
        games: vec![DatGame {
            name: "Game".to_string(),
            description: None,
            roms: vec![DatRom {
                name: "Game.bin".to_string(),
                size: None,
                crc: Some(String::new()),
                md5: None,
                sha1: Some("ABCDEF0000000000000000000000000000000000".to_string()),
            }],
        }],
        ..Default::default()
    };
    let catalog = Catalog::from_dat(dat);
    assert_eq!(catalog.rom(RomId(0)).hash(HashAlgorithm::Crc), None);
    assert!(catalog.find_by_hash(HashAlgorithm::Crc, "").is_empty());
}

#[test]
fn test_load_missing_file_is_error() {
    assert!(Catalog::load(Path::new("/nonexistent/romaudit/catalog.dat")).is_err());
}
