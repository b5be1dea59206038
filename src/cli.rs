use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cityconnect")]
#[command(about = "史跡写真判定・市民不具合報告ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (api/claude)
    #[arg(long, default_value = "api", global = true)]
    pub ai_provider: AiProvider,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真から史跡を判定
    Detect {
        /// 写真ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 史跡一覧を表示
    Sites {
        /// 車椅子対応の史跡のみ
        #[arg(long)]
        wheelchair_only: bool,
    },

    /// 史跡の詳細を表示
    Site {
        /// 史跡ID
        id: i64,
    },

    /// ログイン・ユーザー登録
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// 不具合報告
    Issue {
        #[command(subcommand)]
        command: IssueCommands,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// トークン署名鍵を設定
        #[arg(long)]
        set_jwt_secret: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// ユーザー登録
    Signup {
        #[arg(short, long)]
        email: String,

        /// 省略時は入力を促す
        #[arg(short, long)]
        password: Option<String>,
    },

    /// ログイン
    Login {
        #[arg(short, long)]
        email: String,

        /// 省略時は入力を促す
        #[arg(short, long)]
        password: Option<String>,
    },

    /// トークンのユーザーを表示
    Whoami {
        #[arg(short, long)]
        token: String,
    },
}

#[derive(Subcommand)]
pub enum IssueCommands {
    /// 報告を作成
    Create {
        /// カテゴリ（Pothole, Street Light など）
        #[arg(short, long)]
        category: String,

        /// 写真ファイル
        #[arg(short, long)]
        photo: PathBuf,

        /// 緯度（省略時は写真のEXIFから取得）
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// 経度（省略時は写真のEXIFから取得）
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,

        #[arg(short, long)]
        address: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// セッショントークン（無効な場合は匿名で報告）
        #[arg(short, long)]
        token: Option<String>,
    },

    /// 報告一覧（新しい順）
    List {
        #[arg(short, long)]
        status: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// 報告の詳細
    Show {
        id: i64,
    },

    /// ステータスを更新（任意の文字列）
    Status {
        id: i64,
        status: String,
    },
}
