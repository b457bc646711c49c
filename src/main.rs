use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use chatfmt::reply::{self, ReplyKind};
use chatfmt::Config;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatfmt")]
#[command(about = "Render assistant replies as safe HTML fragments")]
struct Cli {
    /// Input reply file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Output HTML file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat the input as a JSON response body carrying this kind of reply
    #[arg(long, value_enum)]
    json: Option<ReplyArg>,

    /// Config file
    #[arg(short, long, default_value = "chatfmt.toml")]
    config: PathBuf,

    /// Wrap the fragment in a bot message container
    #[arg(long)]
    wrap: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReplyArg {
    Chat,
    Summary,
    Explanation,
}

impl From<ReplyArg> for ReplyKind {
    fn from(arg: ReplyArg) -> Self {
        match arg {
            ReplyArg::Chat => ReplyKind::Chat,
            ReplyArg::Summary => ReplyKind::Summary,
            ReplyArg::Explanation => ReplyKind::Explanation,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CHATFMT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config);

    // Read input
    let input = match &cli.input {
        Some(path) => fs::read_to_string(path).map_err(|e| (path.display().to_string(), e)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map(|_| buf)
                .map_err(|e| ("stdin".to_string(), e))
        }
    };
    let input = match input {
        Ok(content) => content,
        Err((source, e)) => {
            eprintln!("Error reading {}: {}", source, e);
            std::process::exit(1);
        }
    };

    let mut html = match cli.json {
        Some(kind) => reply::render_reply(&input, kind.into(), &config),
        None => chatfmt::reply_to_html_with_config(&input, &config),
    };
    if cli.wrap {
        html = reply::bot_message(&html);
    }

    match cli.output {
        Some(output) => {
            if let Err(e) = fs::write(&output, html) {
                eprintln!("Error writing {}: {}", output.display(), e);
                std::process::exit(1);
            }
        }
        None => println!("{html}"),
    }
}
