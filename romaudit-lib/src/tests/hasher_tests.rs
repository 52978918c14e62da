use super::*;
use std::io::Cursor;

#[test]
fn test_sha1_known_vector() {
    let mut cursor = Cursor::new(b"abc".to_vec());
    assert_eq!(
        hash_reader(&mut cursor, HashAlgorithm::Sha1).unwrap(),
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
}

#[test]
fn test_md5_known_vector() {
    let mut cursor = Cursor::new(b"abc".to_vec());
    assert_eq!(
        hash_reader(&mut cursor, HashAlgorithm::Md5).unwrap(),
        "900150983cd24fb0d6963f7d28e17f72"
    );
}

#[test]
fn test_crc32_known_vector() {
    let mut cursor = Cursor::new(b"abc".to_vec());
    assert_eq!(
        hash_reader(&mut cursor, HashAlgorithm::Crc).unwrap(),
        "352441c2"
    );
}

#[test]
fn test_empty_input() {
    let digest = |alg| hash_reader(&mut Cursor::new(Vec::new()), alg).unwrap();
    assert_eq!(
        digest(HashAlgorithm::Sha1),
        "da39a3ee5e6b4b0d3255bfef95601890afd80709"
    );
    assert_eq!(digest(HashAlgorithm::Md5), "d41d8cd98f00b204e9800998ecf8427e");
    // CRC is zero-padded to 8 hex digits
    assert_eq!(digest(HashAlgorithm::Crc), "00000000");
}

#[test]
fn test_digest_lengths() {
    for alg in HashAlgorithm::ALL {
        let digest = hash_reader(&mut Cursor::new(vec![0x5Au8; 100]), alg).unwrap();
        assert_eq!(digest.len(), alg.hex_len(), "{alg}");
    }
}

/// Reader that hands out at most 7 bytes per call.
struct Trickle(Cursor<Vec<u8>>);

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(7);
        self.0.read(&mut buf[..n])
    }
}

#[test]
fn test_streaming_matches_across_chunk_boundaries() {
    // Larger than one chunk and not a multiple of it
    let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 123)).map(|i| (i % 251) as u8).collect();

    for alg in HashAlgorithm::ALL {
        let whole = hash_reader(&mut Cursor::new(data.clone()), alg).unwrap();
        let trickled = hash_reader(&mut Trickle(Cursor::new(data.clone())), alg).unwrap();
        assert_eq!(whole, trickled, "{alg}");
    }
}

/// Reader that fails after producing some data.
struct Broken {
    served: bool,
}

impl Read for Broken {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::other("disk on fire"));
        }
        self.served = true;
        buf[0] = 1;
        Ok(1)
    }
}

#[test]
fn test_read_error_propagates() {
    let err = hash_reader(&mut Broken { served: false }, HashAlgorithm::Sha1).unwrap_err();
    assert_eq!(err.to_string(), "disk on fire");
}

#[test]
fn test_hash_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abc.bin");
    std::fs::write(&path, b"abc").unwrap();
    assert_eq!(
        hash_file(&path, HashAlgorithm::Sha1).unwrap(),
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
    assert!(hash_file(&dir.path().join("missing.bin"), HashAlgorithm::Sha1).is_err());
}
