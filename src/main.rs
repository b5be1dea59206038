use clap::Parser;
use cityconnect::{app, cli, config, detector, error, scanner, vision};
use cityconnect_common::{
    Error as CommonError, IssueFilter, IssueStore, NewIssue, UserStore,
};
use cli::{AuthCommands, Cli, Commands, IssueCommands};
use config::Config;
use error::{CityConnectError, Result};
use serde_json::json;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
use vision::Vision;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Detect { path, output } => {
            println!("🏛  cityconnect - 史跡判定\n");

            let images = scanner::scan_path(&path)?;
            if images.is_empty() {
                return Err(CityConnectError::NoImagesFound(path.display().to_string()));
            }
            println!("✔ {}枚の写真を検出 (provider: {})\n", images.len(), cli.ai_provider.name());

            let resolver = app::build_resolver(&config)?;
            let vision = Vision::from_config(cli.ai_provider, &config)?;

            let json = if path.is_file() {
                // 単体指定時は検出失敗をそのままエラーとして返す
                let image = scanner::load_image(&images[0], config.max_image_size)?;
                let outcome = detector::detect_image(&vision, &resolver, &image).await?;
                serde_json::to_string_pretty(&outcome.to_response())?
            } else {
                let reports = detector::detect_images(&vision, &resolver, &images, config.max_image_size).await;
                let failed = reports.iter().filter(|r| r.error.is_some()).count();
                println!("✔ 判定完了 (失敗: {}枚)\n", failed);
                serde_json::to_string_pretty(&reports)?
            };

            println!("{}", json);
            if let Some(output) = output {
                std::fs::write(&output, &json)?;
                println!("\n✔ 結果を保存: {}", output.display());
            }
        }

        Commands::Sites { wheelchair_only } => {
            let catalog = app::load_catalog(&config)?;
            let sites = catalog.list(wheelchair_only);
            let body = json!({ "sites": sites, "total": sites.len() });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Site { id } => {
            let catalog = app::load_catalog(&config)?;
            let site = catalog
                .get(id)
                .ok_or_else(|| CommonError::NotFound("Heritage site not found".into()))?;
            println!("{}", serde_json::to_string_pretty(site)?);
        }

        Commands::Auth { command } => {
            let auth = app::build_auth(&config);

            match command {
                AuthCommands::Signup { email, password } => {
                    let mut store = app::open_store(&config, auth.hasher())?;
                    let password = match password {
                        Some(p) => p,
                        None => prompt_password(true)?,
                    };
                    let session = auth.signup(&mut store, &email, &password)?;
                    println!("✔ ユーザーを登録しました");
                    println!("{}", serde_json::to_string_pretty(&session)?);
                }
                AuthCommands::Login { email, password } => {
                    let store = app::open_store(&config, auth.hasher())?;
                    let password = match password {
                        Some(p) => p,
                        None => prompt_password(false)?,
                    };
                    let session = auth.login(&store, &email, &password)?;
                    println!("{}", serde_json::to_string_pretty(&session)?);
                }
                AuthCommands::Whoami { token } => match auth.identify(Some(token.as_str())) {
                    Some(claims) => println!("{}", serde_json::to_string_pretty(&claims)?),
                    None => println!("anonymous"),
                },
            }
        }

        Commands::Issue { command } => {
            let auth = app::build_auth(&config);
            let mut store = app::open_store(&config, auth.hasher())?;

            match command {
                IssueCommands::Create { category, photo, lat, lng, address, description, token } => {
                    let info = scanner::scan_path(&photo)?
                        .into_iter()
                        .next()
                        .ok_or_else(|| CityConnectError::NoImagesFound(photo.display().to_string()))?;
                    let image = scanner::load_image(&info, config.max_image_size)?;

                    let (latitude, longitude) = match (lat, lng) {
                        (Some(lat), Some(lng)) => (lat, lng),
                        _ => scanner::extract_gps(&photo).map_err(|_| {
                            CommonError::Validation("Location coordinates are required".into())
                        })?,
                    };

                    // 無効なトークンは拒否せず匿名扱い
                    let user_id = auth.identify(token.as_deref()).map(|c| c.user_id);
                    if let Some(user_id) = user_id {
                        if store.find_by_id(user_id)?.is_none() {
                            warn!(user_id, "token user no longer exists");
                        }
                    }

                    let new_issue = NewIssue {
                        category,
                        photo_base64: Some(image.data_base64),
                        latitude,
                        longitude,
                        address,
                        description,
                    };
                    new_issue.validate()?;
                    let issue = store.create(new_issue, user_id)?;

                    println!("✔ Issue report created successfully");
                    println!("{}", serde_json::to_string_pretty(&issue.preview())?);
                }
                IssueCommands::List { status, category } => {
                    let issues: Vec<_> = store
                        .list(&IssueFilter { status, category })?
                        .iter()
                        .map(|i| i.preview())
                        .collect();
                    let body = json!({ "issues": issues, "total": issues.len() });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                IssueCommands::Show { id } => {
                    let issue = store
                        .get(id)?
                        .ok_or_else(|| CommonError::NotFound("Issue report not found".into()))?;
                    println!("{}", serde_json::to_string_pretty(&issue)?);
                }
                IssueCommands::Status { id, status } => {
                    if status.trim().is_empty() {
                        return Err(CommonError::Validation("Status is required".into()).into());
                    }
                    let issue = store
                        .update_status(id, &status)?
                        .ok_or_else(|| CommonError::NotFound("Issue not found".into()))?;
                    println!("✔ Issue status updated successfully");
                    println!("{}", serde_json::to_string_pretty(&issue.preview())?);
                }
            }
        }

        Commands::Config { set_api_key, set_jwt_secret, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(secret) = set_jwt_secret {
                config.set_jwt_secret(secret)?;
                println!("✔ トークン署名鍵を設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  最大トークン: {}", config.max_tokens);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
                println!("  署名鍵: {}", if config.jwt_secret.is_some() { "設定済み" } else { "未設定" });
                println!("  データ: {}", config.data_file()?.display());
                match &config.catalog_path {
                    Some(path) => println!("  カタログ: {}", path.display()),
                    None => println!("  カタログ: 組み込み"),
                }
            }
        }
    }

    Ok(())
}

/// RUST_LOG があればそれを優先、なければ --verbose で debug
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {}", e);
    }
}

fn prompt_password(confirm: bool) -> Result<String> {
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| CityConnectError::Io(std::io::Error::other(e.to_string())))
}
