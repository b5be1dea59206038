//! セッショントークンモジュール
//!
//! HS256署名のJWT（compact形式）を jsonwebtoken で発行・検証する。
//! サーバ側に状態を持たないため失効（revoke）はできない。
//! 検証失敗の理由（署名不一致・形式不正・期限切れ）は呼び出し元に返さず、
//! すべて `None` にまとめる。

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// トークン有効期間（日）
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

/// トークンから復元されるユーザー情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub email: String,
    pub username: String,
}

#[derive(Serialize, Deserialize)]
struct TokenPayload {
    user_id: i64,
    email: String,
    username: String,
    /// UNIX秒
    exp: i64,
}

/// ステートレスなセッショントークンの発行・検証
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl std::fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("secret", &"***")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl SessionTokenService {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime: Duration::days(TOKEN_LIFETIME_DAYS),
        }
    }

    /// トークン発行（有効期限は現在時刻から30日）
    pub fn issue(&self, user_id: i64, email: &str, username: &str) -> Result<String> {
        self.issue_at(user_id, email, username, Utc::now())
    }

    /// 発行時刻を指定してトークン発行
    pub fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let payload = TokenPayload {
            user_id,
            email: email.to_string(),
            username: username.to_string(),
            exp: (now + self.lifetime).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| Error::Config(format!("トークン生成に失敗しました: {}", e)))
    }

    /// トークン検証（現在時刻基準）
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        self.verify_at(token, Utc::now())
    }

    /// 時刻を指定してトークン検証
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<SessionClaims> {
        // 署名・アルゴリズム・形式はライブラリで検証し、期限は `now` と比較する
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let payload = match jsonwebtoken::decode::<TokenPayload>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(reason = ?e.kind(), "session token rejected");
                return None;
            }
        };

        // exp ちょうどの時刻は期限切れ
        if payload.exp <= now.timestamp() {
            debug!(reason = "expired", "session token rejected");
            return None;
        }

        Some(SessionClaims {
            user_id: payload.user_id,
            email: payload.email,
            username: payload.username,
        })
    }
}
