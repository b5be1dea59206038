//! CityConnect Common Library
//!
//! 史跡照合と認証のコアロジック（同期・I/Oなし）

pub mod types;
pub mod error;
pub mod parser;
pub mod catalog;
pub mod resolver;
pub mod prompts;
pub mod password;
pub mod token;
pub mod issue;
pub mod store;
pub mod auth;
pub mod seed;

pub use types::{DetectionOutcome, DetectionResponse, DetectionResult, HeritageSite};
pub use error::{Error, Result};
pub use parser::{decode_detection, extract_json, parse_detection_response};
pub use catalog::LandmarkCatalog;
pub use resolver::LandmarkResolver;
pub use prompts::build_detection_prompt;
pub use password::PasswordHasher;
pub use token::{SessionClaims, SessionTokenService};
pub use issue::{IssueFilter, IssueReport, NewIssue};
pub use store::{Credential, IssueStore, MemoryStore, UserStore};
pub use auth::{AuthService, Session};
pub use seed::seed_demo_data;
