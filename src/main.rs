use anyhow::Result;
use clap::Parser;
use html_to_pdf::cli::{Cli, Commands, ConvertArgs, ResolveArgs, SnapshotArgs};
use html_to_pdf::services::snapshot::SnapshotOptions;
use html_to_pdf::utils::logging;
use html_to_pdf::{exit_codes, App, AppError, BrowserResolver, Config, RenderRequest, Resolution};
use serde_json::{json, Value as JsonValue};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // 初始化日志
    logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("❌ {:#}", e);
        if let Some(hint) = e.downcast_ref::<AppError>().and_then(AppError::hint) {
            info!("💡 {}", hint);
        }
        std::process::exit(exit_codes::for_error(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).await?;
    if cli.verbose {
        config.verbose_logging = true;
    }

    match cli.command {
        Commands::Convert(args) => run_convert(args, config).await,
        Commands::Resolve(args) => run_resolve(args, config).await,
        Commands::Snapshot(args) => run_snapshot(args, config).await,
    }
}

/// convert 子命令：HTML 转 PDF
async fn run_convert(args: ConvertArgs, mut config: Config) -> Result<()> {
    args.apply_to(&mut config);

    let request = RenderRequest::new(args.input.clone(), args.output_path());
    // 输入校验必须发生在任何浏览器操作之前
    let url = request.validate()?;

    let app = App::initialize(config, &url).await?;
    let result = app.convert(&request).await;
    app.shutdown().await;
    let stats = result?;

    logging::log_render_complete(&stats);
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}

/// resolve 子命令：只做浏览器解析并打印结果
async fn run_resolve(args: ResolveArgs, mut config: Config) -> Result<()> {
    args.browser.apply_to(&mut config);

    let resolver = BrowserResolver::new(&config);
    let resolution = resolver.resolve().await?;

    let summary = match &resolution {
        Resolution::Ok { path } | Resolution::Installed { path } => json!({
            "status": resolution.status(),
            "path": path,
            "revision": config.expected_revision,
        }),
        Resolution::Fallback {
            candidate,
            distance,
        } => json!({
            "status": resolution.status(),
            "path": candidate.path,
            "revision": candidate.revision,
            "provenance": candidate.provenance,
            "distance": if *distance == u32::MAX {
                JsonValue::Null
            } else {
                json!(distance)
            },
        }),
        Resolution::Missing { searched } => json!({
            "status": resolution.status(),
            "searched": searched,
        }),
    };
    println!("{}", summary);

    if matches!(resolution, Resolution::Missing { .. }) {
        return Err(AppError::no_browser_found().into());
    }
    Ok(())
}

/// snapshot 子命令：HTML 渲染为 PNG
async fn run_snapshot(args: SnapshotArgs, mut config: Config) -> Result<()> {
    args.browser.apply_to(&mut config);

    let request = RenderRequest::new(args.input.clone(), args.output_path());
    let url = request.validate()?;

    let options = SnapshotOptions {
        width: args.width,
        height: args.height,
        scale: args.scale,
    };

    let app = App::initialize(config, &url).await?;
    let result = app.snapshot(&options, &request.output).await;
    app.shutdown().await;
    let bytes = result?;

    println!(
        "{}",
        json!({
            "status": "ok",
            "input": request.input,
            "output": request.output,
            "bytes": bytes,
        })
    );
    Ok(())
}
