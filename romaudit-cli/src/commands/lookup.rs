use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romaudit_lib::util::format_iec;
use romaudit_lib::{Catalog, GameId, HashAlgorithm, NameMatch, RomId};

use super::Context;
use crate::CliError;
use crate::cli_types::{LookupKey, LookupMode};

/// Run the lookup command. Results for each key are separated by `----`.
pub(crate) fn run_lookup(
    ctx: &Context,
    keys: &[String],
    mode: LookupMode,
    key: LookupKey,
    exact: bool,
) -> Result<(), CliError> {
    let catalog = ctx.load_catalog()?;
    let name_match = if exact {
        NameMatch::Exact
    } else {
        NameMatch::Substring
    };

    for (i, query) in keys.iter().enumerate() {
        if i > 0 {
            log::info!("----");
        }
        let lines = match mode {
            LookupMode::Game => catalog
                .find_games_by_name(query, name_match)
                .into_iter()
                .flat_map(|game| game_lines(&catalog, game, 0))
                .collect::<Vec<_>>(),
            LookupMode::Rom => find_roms(&catalog, query, key, name_match)
                .into_iter()
                .flat_map(|rom| rom_lines(&catalog, rom, 0))
                .collect(),
        };

        if lines.is_empty() {
            log::warn!(
                "Nothing matches {}",
                query.if_supports_color(Stdout, |t| t.bold())
            );
        }
        for line in lines {
            log::info!("{line}");
        }
    }
    Ok(())
}

fn find_roms(catalog: &Catalog, query: &str, key: LookupKey, name_match: NameMatch) -> Vec<RomId> {
    let algorithm = match key {
        LookupKey::Name => return catalog.find_by_name(query, name_match),
        LookupKey::Crc => HashAlgorithm::Crc,
        LookupKey::Md5 => HashAlgorithm::Md5,
        LookupKey::Sha1 => HashAlgorithm::Sha1,
    };
    catalog.find_by_hash(algorithm, query).to_vec()
}

fn indented(indent: usize, text: String) -> String {
    format!("{}{text}", "\t".repeat(indent))
}

/// A rom's attributes followed by its containing game.
fn rom_lines(catalog: &Catalog, rom: RomId, indent: usize) -> Vec<String> {
    let mut lines = rom_attributes(catalog, rom, indent);
    lines.push(indented(indent, "Contained in game:".to_string()));
    lines.extend(game_lines(catalog, catalog.rom(rom).game, indent + 1));
    lines
}

fn rom_attributes(catalog: &Catalog, rom: RomId, indent: usize) -> Vec<String> {
    let entry = catalog.rom(rom);
    let mut lines = vec![indented(indent, format!("name: {}", entry.name))];
    if let Some(size) = entry.size {
        lines.push(indented(indent, format!("size: {}", format_iec(size))));
    }
    for (algorithm, digest) in &entry.hashes {
        lines.push(indented(indent, format!("{algorithm}: {digest}")));
    }
    lines
}

/// A game's attributes followed by each of its roms.
fn game_lines(catalog: &Catalog, game: GameId, indent: usize) -> Vec<String> {
    let entry = catalog.game(game);
    let mut lines = vec![indented(indent, format!("name: {}", entry.name))];
    if let Some(description) = &entry.description {
        lines.push(indented(indent, format!("description: {description}")));
    }
    for &rom in &entry.roms {
        lines.push(indented(indent, "rom:".to_string()));
        lines.extend(rom_attributes(catalog, rom, indent + 1));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use romaudit_lib::dat::{DatFile, DatGame, DatRom};

    fn make_catalog() -> Catalog {
        Catalog::from_dat(DatFile {
            name: "Test".to_string(),
            games: vec![DatGame {
                name: "Game".to_string(),
                description: Some("The Game".to_string()),
                roms: vec![DatRom {
                    name: "game.bin".to_string(),
                    size: Some(1536),
                    crc: Some("DEADBEEF".to_string()),
                    ..Default::default()
                }],
            }],
            ..Default::default()
        })
    }

    #[test]
    fn test_rom_lines() {
        let catalog = make_catalog();
        assert_eq!(
            rom_lines(&catalog, RomId(0), 0),
            vec![
                "name: game.bin",
                "size: 1.50KiB",
                "crc: deadbeef",
                "Contained in game:",
                "\tname: Game",
                "\tdescription: The Game",
                "\trom:",
                "\t\tname: game.bin",
                "\t\tsize: 1.50KiB",
                "\t\tcrc: deadbeef",
            ]
        );
    }

    #[test]
    fn test_find_roms_by_key() {
        let catalog = make_catalog();
        assert_eq!(
            find_roms(&catalog, "DeadBeef", LookupKey::Crc, NameMatch::Exact),
            vec![RomId(0)]
        );
        assert!(find_roms(&catalog, "deadbeef", LookupKey::Sha1, NameMatch::Exact).is_empty());
        assert_eq!(
            find_roms(&catalog, "game", LookupKey::Name, NameMatch::Substring),
            vec![RomId(0)]
        );
        assert!(find_roms(&catalog, "game", LookupKey::Name, NameMatch::Exact).is_empty());
    }
}
