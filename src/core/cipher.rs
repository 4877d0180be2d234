// symmetric encryption for the data file
// layout on disk: 24 byte nonce || ciphertext+tag

use chacha20poly1305::aead::Aead;
use chacha20poly1305::{Key, KeyInit, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use rand::rngs::OsRng;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::Error;

pub const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;

pub struct Cipher {
    aead: XChaCha20Poly1305,
}

impl Cipher {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            aead: XChaCha20Poly1305::new(Key::from_slice(key)),
        }
    }

    /// Loads the key at `path`, or generates and writes a fresh one if there is none.
    pub fn load_or_create(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            return Self::load(path);
        }

        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        match write_key(path, &key) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "generated new storage key");
                Ok(Self::new(&key))
            }
            // another process got there first, use its key
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Self::load(path),
            Err(e) => Err(e.into()),
        }
    }

    fn load(path: &Path) -> Result<Self, Error> {
        let bytes = fs::read(path)?;
        let key: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
            Error::Crypto(format!(
                "key file {} holds {} bytes, expected {KEY_LEN}",
                path.display(),
                bytes.len()
            ))
        })?;
        Ok(Self::new(&key))
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .aead
            .encrypt(XNonce::from_slice(&nonce), plaintext)
            .map_err(|e| Error::Crypto(format!("encryption failed: {e}")))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, Error> {
        if blob.len() < NONCE_LEN {
            return Err(Error::Crypto("ciphertext is truncated".to_string()));
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);

        self.aead
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Crypto("decryption failed".to_string()))
    }
}

// never overwrites, and on unix the file is 0600 from the moment it exists
fn write_key(path: &Path, key: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(key)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seals_and_opens() {
        let cipher = Cipher::new(&[7u8; KEY_LEN]);
        let sealed = cipher.encrypt(b"{\"users\":{}}").unwrap();

        assert_ne!(&sealed[NONCE_LEN..], b"{\"users\":{}}");
        assert_eq!(cipher.decrypt(&sealed).unwrap(), b"{\"users\":{}}");
    }

    #[test]
    fn fresh_nonce_every_time() {
        let cipher = Cipher::new(&[7u8; KEY_LEN]);
        let a = cipher.encrypt(b"same").unwrap();
        let b = cipher.encrypt(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_and_tampering_fail() {
        let sealed = Cipher::new(&[1u8; KEY_LEN]).encrypt(b"secret").unwrap();
        assert!(Cipher::new(&[2u8; KEY_LEN]).decrypt(&sealed).is_err());

        let mut tampered = sealed.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0xff;
        assert!(Cipher::new(&[1u8; KEY_LEN]).decrypt(&tampered).is_err());

        assert!(Cipher::new(&[1u8; KEY_LEN]).decrypt(&sealed[..10]).is_err());
    }

    #[test]
    fn key_is_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");

        let first = Cipher::load_or_create(&path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), KEY_LEN);

        let sealed = first.encrypt(b"hello").unwrap();
        let second = Cipher::load_or_create(&path).unwrap();
        assert_eq!(second.decrypt(&sealed).unwrap(), b"hello");
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn short_key_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, b"too short").unwrap();

        assert!(matches!(Cipher::load_or_create(&path), Err(Error::Crypto(_))));
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("secret.key");
        Cipher::load_or_create(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn existing_key_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        write_key(&path, &[3u8; KEY_LEN]).unwrap();

        let err = write_key(&path, &[4u8; KEY_LEN]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), [3u8; KEY_LEN]);

        let sealed = Cipher::new(&[3u8; KEY_LEN]).encrypt(b"kept").unwrap();
        let loaded = Cipher::load_or_create(&path).unwrap();
        assert_eq!(loaded.decrypt(&sealed).unwrap(), b"kept");
    }
}
