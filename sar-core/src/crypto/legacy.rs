//! Legacy record cipher: AES-128-CBC, PKCS#7 padding, base64 text on disk.
//!
//! The key is the MD5 digest of the UTF-8 password. Archives written by the
//! original tool use an all-zero IV for every record, so identical plaintext
//! prefixes under one password produce identical ciphertext prefixes. That
//! mode stays the default; [`IvMode::Random`] is opt-in and records its IV in
//! the record's salt field.

use crate::crypto::hex::parse_hex_array;
use crate::error::{Result, SarError};
use aes::Aes128;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};

pub const KEY_LEN: usize = 16;
pub const IV_LEN: usize = 16;
pub const ZERO_IV: [u8; IV_LEN] = [0u8; IV_LEN];

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum IvMode {
    #[default]
    Zero,
    Random,
}

#[derive(Clone)]
pub struct CipherKey([u8; KEY_LEN]);

impl CipherKey {
    pub fn from_password(password: &str) -> Self {
        let digest = Md5::digest(password.as_bytes());
        let mut k = [0u8; KEY_LEN];
        k.copy_from_slice(&digest);
        Self(k)
    }
}

impl IvMode {
    /// Produce the IV for a new record and its salt-field text (empty for zero IV).
    pub fn next_iv(self) -> Result<([u8; IV_LEN], String)> {
        match self {
            IvMode::Zero => Ok((ZERO_IV, String::new())),
            IvMode::Random => {
                let mut iv = [0u8; IV_LEN];
                getrandom::getrandom(&mut iv)
                    .map_err(|e| SarError::transform(format!("iv generation: {e}")))?;
                Ok((iv, hex::encode(iv)))
            }
        }
    }
}

/// Recover the IV a record was sealed with from its salt field.
pub fn iv_from_salt(salt: &str) -> Result<[u8; IV_LEN]> {
    if salt.is_empty() {
        Ok(ZERO_IV)
    } else {
        parse_hex_array::<IV_LEN>(salt)
    }
}

/// Encrypt and return base64 text bytes.
pub fn encrypt(key: &CipherKey, iv: &[u8; IV_LEN], plain: &[u8]) -> Vec<u8> {
    let ct = Aes128CbcEnc::new(&key.0.into(), &(*iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plain);
    STANDARD.encode(ct).into_bytes()
}

/// Decode base64 text bytes and decrypt.
pub fn decrypt(key: &CipherKey, iv: &[u8; IV_LEN], text: &[u8]) -> Result<Vec<u8>> {
    let ct = STANDARD
        .decode(text)
        .map_err(|e| SarError::transform(format!("ciphertext base64: {e}")))?;
    Aes128CbcDec::new(&key.0.into(), &(*iv).into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ct)
        .map_err(|_| SarError::transform("ciphertext padding"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decrypt_inverts_encrypt(
            plain in prop::collection::vec(any::<u8>(), 0..2048),
            password in ".{0,32}",
            iv in any::<[u8; IV_LEN]>(),
        ) {
            let key = CipherKey::from_password(&password);
            let text = encrypt(&key, &iv, &plain);
            prop_assert_eq!(decrypt(&key, &iv, &text).unwrap(), plain);
        }
    }

    #[test]
    fn zero_iv_is_deterministic_and_textual() {
        let key = CipherKey::from_password("secret");
        let a = encrypt(&key, &ZERO_IV, b"same plaintext");
        let b = encrypt(&key, &ZERO_IV, b"same plaintext");
        assert_eq!(a, b);
        assert!(a.iter().all(|c| c.is_ascii_graphic()));
        // 14 bytes pad to one block: 16 bytes of ciphertext -> 24 base64 chars.
        assert_eq!(a.len(), 24);
    }

    #[test]
    fn random_iv_round_trips_through_salt() {
        let key = CipherKey::from_password("pw");
        let (iv, salt) = IvMode::Random.next_iv().unwrap();
        assert_eq!(salt.len(), IV_LEN * 2);
        let text = encrypt(&key, &iv, b"payload");
        assert_eq!(decrypt(&key, &iv_from_salt(&salt).unwrap(), &text).unwrap(), b"payload");
        assert_eq!(iv_from_salt("").unwrap(), ZERO_IV);
        assert!(iv_from_salt("zz").is_err());
    }

    #[test]
    fn garbage_ciphertext_is_a_transform_error() {
        let key = CipherKey::from_password("pw");
        assert!(matches!(
            decrypt(&key, &ZERO_IV, b"%%not base64%%"),
            Err(SarError::Transform(_))
        ));
        // Valid base64, but not a whole number of blocks.
        assert!(matches!(
            decrypt(&key, &ZERO_IV, b"YWJj"),
            Err(SarError::Transform(_))
        ));
    }
}
