//! TicTacToe APIサーバーのエントリポイント
//! 設定読み込み、AIサービス初期化、HTTPサーバー起動を行う。

use TicTacToe::{
    api::{handlers::AppState, routes::create_router},
    config::Config,
};
use tokio::net::TcpListener;

/// メイン関数 - サーバーの初期化と起動を担当
#[tokio::main]
async fn main() {
    // 設定ファイルと環境変数から統合設定を読み込み
    let config = Config::load();
    if let Err(e) = config.validate() {
        eprintln!("設定エラー: {}", e);
        std::process::exit(1);
    }

    println!("設定読み込み完了:");
    println!("  サーバー: {}:{}", config.server.host, config.server.port);
    println!("  AIサービス: {:?}", config.ai_service.service_type);
    println!("  最大セッション数: {}", config.session.max_sessions);

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("ゲームサービス作成失敗: {}", e);
            eprintln!("AIサービス設定を確認してください");
            std::process::exit(1);
        }
    };

    let app = create_router().with_state(state.clone());

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_address).await.unwrap_or_else(|e| {
        eprintln!("アドレスバインド失敗 {}: {}", bind_address, e);
        std::process::exit(1);
    });

    println!("TicTacToe APIサーバー開始: {}", bind_address);

    if state.service.get_ai_service().is_available().await {
        println!("AIサービス正常");
    } else {
        eprintln!("警告: AIサービスが不健全");
    }

    println!("サーバー稼働中 (Ctrl+C で停止)");

    // Axumサーバーを開始し、リクエストの処理を開始
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
