//! 認証フロー
//!
//! PasswordHasher と SessionTokenService を組み合わせて
//! サインアップ・ログイン・リクエストのユーザー特定を行う。

use crate::error::{Error, Result};
use crate::password::PasswordHasher;
use crate::store::UserStore;
use crate::token::{SessionClaims, SessionTokenService};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// ログイン・サインアップ成功時に返す情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    hasher: PasswordHasher,
    tokens: SessionTokenService,
}

impl AuthService {
    pub fn new(hasher: PasswordHasher, tokens: SessionTokenService) -> Self {
        Self { hasher, tokens }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn tokens(&self) -> &SessionTokenService {
        &self.tokens
    }

    /// 新規登録（ユーザー名はメールアドレスの@より前）
    pub fn signup<S: UserStore>(&self, store: &mut S, email: &str, password: &str) -> Result<Session> {
        require_fields(email, password)?;

        let username = username_from_email(email);
        let password_hash = self.hasher.hash(password);
        let user_id = store.insert(email, &password_hash, username)?;
        info!(user_id, "user signed up");

        self.session(user_id, email, username)
    }

    /// ログイン
    ///
    /// 未登録とパスワード不一致はどちらも `Error::InvalidCredentials`。
    pub fn login<S: UserStore>(&self, store: &S, email: &str, password: &str) -> Result<Session> {
        require_fields(email, password)?;

        let credential = match store.find_by_email(email)? {
            Some(c) if self.hasher.verify(password, &c.password_hash) => c,
            _ => {
                warn!("login rejected");
                return Err(Error::InvalidCredentials);
            }
        };

        self.session(credential.user_id, &credential.email, &credential.username)
    }

    /// `Authorization` ヘッダからユーザーを特定
    ///
    /// ヘッダなし・形式不正・検証失敗はすべて匿名（None）扱い。
    pub fn current_user(&self, authorization: Option<&str>) -> Option<SessionClaims> {
        let token = authorization?.split(' ').nth(1)?;
        self.identify(Some(token))
    }

    /// トークン単体からユーザーを特定（無効なら匿名）
    pub fn identify(&self, token: Option<&str>) -> Option<SessionClaims> {
        let claims = self.tokens.verify(token?);
        if claims.is_none() {
            warn!("invalid session token, treating as anonymous");
        }
        claims
    }

    fn session(&self, user_id: i64, email: &str, username: &str) -> Result<Session> {
        let token = self.tokens.issue(user_id, email, username)?;
        Ok(Session {
            token,
            user_id,
            username: username.to_string(),
            email: email.to_string(),
        })
    }
}

fn require_fields(email: &str, password: &str) -> Result<()> {
    if email.is_empty() || password.is_empty() {
        return Err(Error::Validation("Email and password required".into()));
    }
    Ok(())
}

fn username_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
