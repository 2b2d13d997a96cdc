use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use chess_cli::command::parse_promotion;
use chess_cli::{
    App, Command, FixedPromotion, Flow, LogLevel, PromotionProvider, Session, Settings,
    StorageManager,
};
use chess_core::{Color, PieceKind};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 终端国际象棋
#[derive(Parser, Debug)]
#[command(name = "chess", version, about = "Two-player chess in the terminal")]
struct Args {
    /// 设置文件路径
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// 启动时载入的局面
    #[arg(long, value_name = "NAME")]
    resume: Option<String>,

    /// 日志级别，覆盖设置文件
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

/// 在终端询问升变棋子
struct PromptPromotion {
    fallback: PieceKind,
}

impl PromotionProvider for PromptPromotion {
    fn choose(&mut self, color: Color) -> Option<PieceKind> {
        let stdin = io::stdin();
        loop {
            print!("{} pawn promotes to (q/r/b/n): ", color);
            io::stdout().flush().ok()?;

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return Some(self.fallback),
                Ok(_) if line.trim().is_empty() => return Some(self.fallback),
                Ok(_) => match parse_promotion(&line) {
                    Ok(kind) => return Some(kind),
                    Err(e) => println!("{}", e),
                },
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let level = args.log_level.unwrap_or(settings.log_level).as_str();

    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("chess_cli={level}").parse()?)
                .add_directive(format!("chess_core={level}").parse()?),
        )
        .init();

    info!("国际象棋终端启动");

    // 首次运行时写出默认设置，方便用户编辑
    if args.settings.is_none() && Settings::settings_path().is_some_and(|path| !path.exists()) {
        if let Err(e) = settings.save() {
            warn!("无法写出默认设置: {}", e);
        }
    }

    let storage = StorageManager::new()?;
    let session = match &args.resume {
        Some(id) => Session::from_state(storage.load_snapshot(id)?.state),
        None => Session::new(),
    };

    let mut promotion: Box<dyn PromotionProvider> = if settings.ask_promotion {
        Box::new(PromptPromotion {
            fallback: settings.default_promotion,
        })
    } else {
        Box::new(FixedPromotion(settings.default_promotion))
    };

    let mut app = App::new(session, settings, storage);
    let mut stdout = io::stdout();
    app.print_board(&mut stdout)?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{} (type `help` for commands)", e);
                continue;
            }
        };

        match app.handle(command, promotion.as_mut(), &mut stdout) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                error!("命令失败: {:#}", e);
                println!("error: {:#}", e);
            }
        }
    }

    info!("国际象棋终端退出");
    Ok(())
}
