use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha1::Digest;

use romaudit_dat::HashAlgorithm;

const CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// Incremental digest state for one of the supported algorithms.
enum Digester {
    Crc(crc32fast::Hasher),
    Md5(md5::Context),
    Sha1(sha1::Sha1),
}

impl Digester {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Crc => Self::Crc(crc32fast::Hasher::new()),
            HashAlgorithm::Md5 => Self::Md5(md5::Context::new()),
            HashAlgorithm::Sha1 => Self::Sha1(sha1::Sha1::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Crc(h) => h.update(data),
            Self::Md5(h) => h.consume(data),
            Self::Sha1(h) => h.update(data),
        }
    }

    fn finish(self) -> String {
        match self {
            Self::Crc(h) => format!("{:08x}", h.finalize()),
            Self::Md5(h) => format!("{:x}", h.compute()),
            Self::Sha1(h) => format!("{:x}", h.finalize()),
        }
    }
}

/// Stream `reader` through `algorithm` and return the lowercase hex digest.
///
/// Data is read in fixed-size chunks so arbitrarily large disc images never
/// have to fit in memory. Read errors are returned to the caller untouched.
pub fn hash_reader(reader: &mut dyn Read, algorithm: HashAlgorithm) -> io::Result<String> {
    let mut digester = Digester::new(algorithm);
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        digester.update(&buf[..n]);
    }

    Ok(digester.finish())
}

/// Hash the file at `path`.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> io::Result<String> {
    let mut file = File::open(path)?;
    hash_reader(&mut file, algorithm)
}

#[cfg(test)]
#[path = "tests/hasher_tests.rs"]
mod tests;
