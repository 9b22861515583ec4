use std::time::Duration;

use clap::{Parser, ValueEnum};

use aiq::api::Backend;
use aiq::api::demo::DemoBackend;
use aiq::api::http::HttpBackend;
use aiq::banner::{BannerInfo, print_banner};
use aiq::consts::DEFAULT_SERVER;
use aiq::pages::run_flow;
use aiq::stream::reducer::AccumulationMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Accumulation {
    /// Merge fragments into the record sharing their id
    Merge,
    /// Every fragment becomes its own record
    Append,
}

#[derive(Parser)]
#[command(name = "aiq", version, about = "Ask three AIs, read one answer.")]
struct Cli {
    /// Backend server base URL
    #[arg(short, long, env = "AIQ_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Request timeout in seconds for report and feedback calls
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// How streamed answer fragments accumulate
    #[arg(short, long, value_enum, default_value_t = Accumulation::Merge)]
    accumulation: Accumulation,

    /// Replay a canned offline session instead of talking to a server
    #[arg(long, default_value_t = false)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the page output on stdout stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mode = match cli.accumulation {
        Accumulation::Merge => AccumulationMode::Merge,
        Accumulation::Append => AccumulationMode::Append,
    };

    let (backend, backend_label): (Box<dyn Backend>, &str) = if cli.demo {
        (Box::new(DemoBackend), "demo (offline)")
    } else {
        (
            Box::new(HttpBackend::new(
                cli.server.clone(),
                Duration::from_secs(cli.timeout),
            )),
            "http",
        )
    };

    print_banner(&BannerInfo {
        server: &cli.server,
        backend: backend_label,
        accumulation: match cli.accumulation {
            Accumulation::Merge => "merge",
            Accumulation::Append => "append",
        },
    });

    // Ctrl+C ends the session wherever the flow happens to be.
    tokio::select! {
        result = run_flow(backend.as_ref(), mode) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!();
        }
    }

    println!("goodbye.");
    Ok(())
}
