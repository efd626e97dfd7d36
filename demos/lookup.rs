//! 翻訳カタログの読み込みと検索のデモ
//!
//! 使用方法:
//! ```
//! cargo run --example lookup -- tests/fixtures/translations zh-CN Workbench Drawing
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;

use ts_catalog::LocaleManager;

#[tokio::main]
async fn main() {
    // tracing を初期化（INFO レベル）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let root =
        args.get(1).map_or_else(|| PathBuf::from("tests/fixtures/translations"), PathBuf::from);
    let locale = args.get(2).map_or("zh-CN", String::as_str);

    // ルートに .ts-catalog.json があれば適用する
    let manager = match LocaleManager::from_root(&root) {
        Ok(manager) => manager,
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    };
    match manager.switch_locale(&root, locale).await {
        Ok(report) => {
            println!("Loaded {} file(s) for {locale}", report.loaded.len());
            for skipped in &report.skipped {
                println!("  skipped {}: {}", skipped.path.display(), skipped.reason);
            }
            if let Ok(stats) = serde_json::to_string_pretty(&report.stats) {
                println!("{stats}");
            }
        }
        Err(error) => println!("Falling back to source text: {error}"),
    }

    // 引数があればそれを検索、なければ代表的なキーを表示
    let queries: Vec<(&str, &str)> = match (args.get(3), args.get(4)) {
        (Some(context), Some(source)) => vec![(context.as_str(), source.as_str())],
        _ => vec![
            ("Workbench", "Drawing"),
            ("CmdDrawingOpen", "Open SVG..."),
            ("CmdDrawingOpen", "Some untranslated string"),
            ("QObject", "Wrong selection"),
        ],
    };

    for (context, source) in queries {
        println!("{context} / {source:?} -> {:?}", manager.lookup(context, source));
    }
}
