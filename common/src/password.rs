//! パスワードハッシュモジュール
//!
//! 形式: `<salt>$<hex(PBKDF2-HMAC-SHA256)>`
//! - salt: 16バイト乱数の16進文字列（ハッシュ毎に生成）
//! - PBKDF2 にはsaltの16進文字列をそのままバイト列として渡す
//! - 出力32バイト、反復回数 100,000

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN_BYTES: usize = 16;
const DIGEST_LEN_BYTES: usize = 32;

/// ソルト付きパスワードハッシュ
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 反復回数を指定（既存ハッシュとの互換性はなくなる）
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    /// パスワードをハッシュ化
    pub fn hash(&self, password: &str) -> String {
        let mut salt_bytes = [0u8; SALT_LEN_BYTES];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);

        let digest = self.digest(password, &salt);
        format!("{}${}", salt, hex::encode(digest))
    }

    /// 保存済みハッシュと照合
    ///
    /// 不正な形式の保存値に対してはエラーにせず false を返す。
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let Some((salt, expected_hex)) = stored_hash.split_once('$') else {
            return false;
        };
        let Ok(expected) = hex::decode(expected_hex) else {
            return false;
        };
        if expected.len() != DIGEST_LEN_BYTES {
            return false;
        }

        let actual = self.digest(password, salt);
        actual.ct_eq(expected.as_slice()).into()
    }

    fn digest(&self, password: &str, salt: &str) -> [u8; DIGEST_LEN_BYTES] {
        let mut out = [0u8; DIGEST_LEN_BYTES];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), self.iterations, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // テスト高速化のため反復回数を落とす
    fn fast() -> PasswordHasher {
        PasswordHasher::with_iterations(1_000)
    }

    #[test]
    fn test_hash_and_verify_default_iterations() {
        let hasher = PasswordHasher::new();
        let stored = hasher.hash("demo123");
        assert!(hasher.verify("demo123", &stored));
        assert!(!hasher.verify("demo124", &stored));
    }

    #[test]
    fn test_hash_format() {
        let stored = fast().hash("secret");
        let (salt, digest) = stored.split_once('$').unwrap();
        assert_eq!(salt.len(), SALT_LEN_BYTES * 2);
        assert_eq!(digest.len(), DIGEST_LEN_BYTES * 2);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_uses_fresh_salt() {
        let hasher = fast();
        let a = hasher.hash("same password");
        let b = hasher.hash("same password");
        assert_ne!(a, b);
        assert!(hasher.verify("same password", &a));
        assert!(hasher.verify("same password", &b));
    }

    #[test]
    fn test_verify_known_vector() {
        // salt "0011..." の16進文字列をそのまま鍵導出に使う形式
        let hasher = fast();
        let salt = "00112233445566778899aabbccddeeff";
        let digest = hex::encode(hasher.digest("pw", salt));
        assert!(hasher.verify("pw", &format!("{}${}", salt, digest)));
    }

    #[test]
    fn test_verify_malformed_without_separator() {
        let hasher = fast();
        assert!(!hasher.verify("anything", "no-separator-here"));
        assert!(!hasher.verify("anything", ""));
    }

    #[test]
    fn test_verify_malformed_digest() {
        let hasher = fast();
        assert!(!hasher.verify("pw", "abcd$not-hex"));
        assert!(!hasher.verify("pw", "abcd$abcd"));
        assert!(!hasher.verify("pw", "abcd$"));
        assert!(!hasher.verify("pw", "a$b$c"));
    }

    #[test]
    fn test_verify_with_other_iteration_count_fails() {
        let stored = fast().hash("pw");
        assert!(!PasswordHasher::with_iterations(2_000).verify("pw", &stored));
    }
}
