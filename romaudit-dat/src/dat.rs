//! DAT file readers.
//!
//! Two formats are understood: Logiqx XML (`<datafile>` with `<game>` or
//! `<machine>` elements) and the ClrMamePro text format. Both produce the
//! same [`DatFile`] tree, which [`Catalog`](crate::Catalog) then indexes.

use std::io::{BufRead, Read};
use std::mem;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::DatError;

/// A parsed DAT file.
#[derive(Debug, Clone, Default)]
pub struct DatFile {
    pub name: String,
    pub description: String,
    pub version: String,
    pub games: Vec<DatGame>,
}

/// One game and its expected files.
#[derive(Debug, Clone, Default)]
pub struct DatGame {
    pub name: String,
    pub description: Option<String>,
    pub roms: Vec<DatRom>,
}

/// One expected file.
///
/// Hashes are stored exactly as they appear in the source; the catalog
/// lowercases them when it is built.
#[derive(Debug, Clone, Default)]
pub struct DatRom {
    pub name: String,
    pub size: Option<u64>,
    pub crc: Option<String>,
    pub md5: Option<String>,
    pub sha1: Option<String>,
}

impl DatRom {
    /// Apply one `key value` attribute. Unknown keys are ignored; a size
    /// that is not a number is an error.
    fn set_field(&mut self, key: &[u8], value: String) -> Result<(), DatError> {
        match key {
            b"name" => self.name = value,
            b"size" => {
                let size = value.trim().parse().map_err(|_| {
                    DatError::invalid_dat(format!("Invalid ROM size: {value}"))
                })?;
                self.size = Some(size);
            }
            b"crc" => self.crc = Some(value),
            b"md5" => self.md5 = Some(value),
            b"sha1" => self.sha1 = Some(value),
            _ => {}
        }
        Ok(())
    }
}

/// Parse a DAT file, detecting the format from its first non-blank
/// character.
pub fn parse_dat<R: BufRead>(mut reader: R) -> Result<DatFile, DatError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let text = text.trim_start_matches('\u{feff}');

    let dat = match text.trim_start().chars().next() {
        None => return Err(DatError::invalid_dat("Empty DAT file")),
        Some('<') => parse_xml(text)?,
        Some(_) => parse_clrmamepro(text)?,
    };

    if dat.name.is_empty() && dat.games.is_empty() {
        return Err(DatError::invalid_dat("No header or games found"));
    }
    Ok(dat)
}

/// Parse the DAT file at `path`.
pub fn parse_dat_file(path: &Path) -> Result<DatFile, DatError> {
    let file = std::fs::File::open(path)?;
    parse_dat(std::io::BufReader::new(file))
}

/// Add `rom` to `game`, dropping entries without a name.
fn push_rom(game: &mut DatGame, rom: DatRom) {
    if rom.name.is_empty() {
        log::debug!("Ignoring unnamed rom in {}", game.name);
    } else {
        game.roms.push(rom);
    }
}

// ---------------------------------------------------------------------------
// Logiqx XML
// ---------------------------------------------------------------------------

/// Which part of the document the reader is inside.
enum Section {
    Outside,
    Header,
    Game(DatGame),
}

/// Text element currently being read.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Other,
    Name,
    Description,
    Version,
}

fn parse_xml(text: &str) -> Result<DatFile, DatError> {
    let mut xml = Reader::from_str(text);
    xml.config_mut().trim_text(true);

    let mut dat = DatFile::default();
    let mut section = Section::Outside;
    let mut field = Field::Other;

    loop {
        match xml.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"header" => section = Section::Header,
                b"game" | b"machine" => {
                    let name = xml_attr(&e, b"name")?.unwrap_or_default();
                    section = Section::Game(DatGame {
                        name,
                        ..Default::default()
                    });
                }
                b"rom" => add_xml_rom(&mut section, &e)?,
                b"name" => field = Field::Name,
                b"description" => field = Field::Description,
                b"version" => field = Field::Version,
                _ => field = Field::Other,
            },
            Event::Empty(e) if e.name().as_ref() == b"rom" => add_xml_rom(&mut section, &e)?,
            Event::Text(t) => {
                let value = t.unescape()?.into_owned();
                match (&mut section, field) {
                    (Section::Header, Field::Name) => dat.name = value,
                    (Section::Header, Field::Description) => dat.description = value,
                    (Section::Header, Field::Version) => dat.version = value,
                    (Section::Game(game), Field::Description) => game.description = Some(value),
                    _ => {}
                }
            }
            Event::End(e) => {
                match e.name().as_ref() {
                    b"header" => section = Section::Outside,
                    b"game" | b"machine" => {
                        if let Section::Game(game) = mem::replace(&mut section, Section::Outside) {
                            dat.games.push(game);
                        }
                    }
                    _ => {}
                }
                field = Field::Other;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(dat)
}

fn xml_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, DatError> {
    match e.try_get_attribute(key)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn add_xml_rom(section: &mut Section, e: &BytesStart<'_>) -> Result<(), DatError> {
    let Section::Game(game) = section else {
        log::debug!("Ignoring rom element outside of a game");
        return Ok(());
    };

    let mut rom = DatRom::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        rom.set_field(attr.key.as_ref(), value)?;
    }
    push_rom(game, rom);
    Ok(())
}

// ---------------------------------------------------------------------------
// ClrMamePro
// ---------------------------------------------------------------------------

/// Lexical unit of a ClrMamePro file.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    /// Bare word or the contents of a quoted string
    Word(String),
}

/// Value of a `key value` pair: a word or a parenthesized group.
#[derive(Debug)]
enum Value {
    Word(String),
    Group(Vec<(String, Value)>),
}

/// Parse the ClrMamePro text format:
///
/// ```text
/// clrmamepro (
///     name "System Name"
///     version 20240101-000000
/// )
///
/// game (
///     name "Game Name (Region)"
///     rom ( name "Game Name (Region).ext" size 12345 crc AABBCCDD sha1 ... )
/// )
/// ```
///
/// Blocks other than `clrmamepro`, `game` and `machine` are skipped, as are
/// nested groups other than `rom`.
fn parse_clrmamepro(text: &str) -> Result<DatFile, DatError> {
    let mut dat = DatFile::default();
    let mut tokens = tokenize(text).into_iter();

    while let Some(token) = tokens.next() {
        let Token::Word(block) = token else {
            return Err(DatError::invalid_dat("Expected a block name"));
        };
        if tokens.next() != Some(Token::Open) {
            return Err(DatError::invalid_dat(format!(
                "Expected '(' after {block}"
            )));
        }
        let fields = parse_group(&mut tokens)?;

        match block.to_ascii_lowercase().as_str() {
            "clrmamepro" => {
                for (key, value) in fields {
                    let Value::Word(value) = value else { continue };
                    match key.as_str() {
                        "name" => dat.name = value,
                        "description" => dat.description = value,
                        "version" => dat.version = value,
                        _ => {}
                    }
                }
            }
            "game" | "machine" => dat.games.push(clr_game(fields)?),
            other => log::debug!("Skipping {other} block"),
        }
    }

    Ok(dat)
}

/// Read `key value` pairs up to and including the closing parenthesis.
fn parse_group<I>(tokens: &mut I) -> Result<Vec<(String, Value)>, DatError>
where
    I: Iterator<Item = Token>,
{
    let mut fields = Vec::new();
    loop {
        let key = match tokens.next() {
            Some(Token::Close) => return Ok(fields),
            Some(Token::Word(key)) => key,
            Some(Token::Open) => return Err(DatError::invalid_dat("Unexpected '('")),
            None => return Err(DatError::invalid_dat("Unterminated block")),
        };
        let value = match tokens.next() {
            Some(Token::Word(value)) => Value::Word(value),
            Some(Token::Open) => Value::Group(parse_group(tokens)?),
            Some(Token::Close) => {
                fields.push((key, Value::Word(String::new())));
                return Ok(fields);
            }
            None => return Err(DatError::invalid_dat("Unterminated block")),
        };
        fields.push((key, value));
    }
}

fn clr_game(fields: Vec<(String, Value)>) -> Result<DatGame, DatError> {
    let mut game = DatGame::default();
    for (key, value) in fields {
        match (key.as_str(), value) {
            ("name", Value::Word(name)) => game.name = name,
            ("description", Value::Word(description)) => game.description = Some(description),
            ("rom", Value::Group(attrs)) => {
                let mut rom = DatRom::default();
                for (key, value) in attrs {
                    if let Value::Word(value) = value {
                        rom.set_field(key.as_bytes(), value)?;
                    }
                }
                push_rom(&mut game, rom);
            }
            _ => {}
        }
    }
    Ok(game)
}

/// Split ClrMamePro text into tokens. Quoted strings become one word with
/// the quotes removed and may contain spaces and parentheses.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' => {
                chars.next();
                let word: String = chars.by_ref().take_while(|&c| c != '"').collect();
                tokens.push(Token::Word(word));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    tokens
}

#[cfg(test)]
#[path = "tests/dat_tests.rs"]
mod tests;
