//! Reversiエンジンの端末用フロントエンド
//! 設定読み込み、ログ初期化を行い、標準入力のコマンドでコンピュータと対局する。

use std::sync::Arc;

use reversi_engine::{
    ai::service::{AIService, AIServiceFactory},
    ai::strategies::Difficulty,
    config::Config,
    game::Player,
    GameSession,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn print_help() {
    println!("コマンド:");
    println!("  <row> <col>                     石を置く (0-7)");
    println!("  new [black|white]               新しいゲーム");
    println!("  color black|white               最初の手の前に自分の色を変更");
    println!("  mode random|eval|minimax        CPUの強さ");
    println!("  help / quit");
}

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("設定エラー: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("設定エラー: {}", e);
        std::process::exit(1);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ai_service: Arc<dyn AIService> =
        Arc::from(AIServiceFactory::create_service(&config.ai_service));
    tracing::info!(
        service = ai_service.get_name(),
        depth = config.ai_service.search_depth,
        difficulty = %config.game.default_difficulty,
        "engine configured"
    );

    let session = GameSession::new(config.game.clone(), ai_service);
    session
        .on_state_changed(|snapshot| println!("\n{}", snapshot.render()))
        .await;
    session
        .on_message(|message| {
            if !message.is_empty() {
                println!(">> {}", message);
            }
        })
        .await;

    print_help();
    let mut human = config.game.human_color;
    session.start_new_game(human).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["help"] => print_help(),
            ["new"] => session.start_new_game(human).await,
            ["new", color] => match color.parse::<Player>() {
                Ok(color) => {
                    human = color;
                    session.start_new_game(human).await;
                }
                Err(e) => println!("{}", e),
            },
            ["color", color] => match color.parse::<Player>() {
                Ok(color) => match session.select_human_color(color).await {
                    Ok(()) => human = color,
                    Err(e) => println!("{}", e),
                },
                Err(e) => println!("{}", e),
            },
            ["mode", mode] => match mode.parse::<Difficulty>() {
                Ok(difficulty) => session.set_difficulty(difficulty).await,
                Err(e) => println!("{}", e),
            },
            [row, col] => match (row.parse::<usize>(), col.parse::<usize>()) {
                (Ok(row), Ok(col)) => {
                    if let Err(e) = session.attempt_human_move(row, col).await {
                        println!("{}", e);
                    }
                }
                _ => println!("座標は 0-7 の数字で指定してください"),
            },
            _ => println!("不明なコマンドです (help で一覧)"),
        }
    }
}
