use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use dotenvy::dotenv;
use gemini_response::{
    decode_response, decode_stream, merge_chunks, GeminiError, GenerateContentResponse, TracingSink,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gemini-response")]
#[command(about = "Decode and inspect saved Gemini generateContent responses")]
#[command(version)]
struct Cli {
    /// Response document to read, `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Input is a server-sent-events transcript of a streamed response
    #[arg(long)]
    stream: bool,

    /// Print the decoded response as JSON instead of its text
    #[arg(long)]
    json: bool,

    /// Fail when the prompt was blocked or generation stopped early
    #[arg(long)]
    check: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Run in quiet mode
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let filter = match std::env::var("GEMINI_RESPONSE_LOG") {
        Ok(directives) => EnvFilter::try_new(directives)
            .map_err(|e| GeminiError::ConfigError(format!("GEMINI_RESPONSE_LOG: {}", e)))?,
        Err(_) if cli.verbose => EnvFilter::new("debug"),
        Err(_) if cli.quiet => EnvFilter::new("error"),
        Err(_) => EnvFilter::new("info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let raw = read_input(&cli.input)?;
    let response = decode_input(&raw, cli.stream)?;

    if let Some(usage) = &response.usage_metadata {
        info!(
            "Tokens - prompt: {}, response: {}, total: {}",
            usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
        );
    }

    if cli.check {
        response.check()?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if let Some(text) = response.text() {
        println!("{}", text);
    }
    for call in response.function_calls() {
        println!(
            "function call: {}({})",
            call.name,
            serde_json::Value::Object(call.args.clone())
        );
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String, GeminiError> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn decode_input(raw: &str, stream: bool) -> Result<GenerateContentResponse, GeminiError> {
    let mut sink = TracingSink;
    if stream {
        let chunks = decode_stream(raw, &mut sink)?;
        info!("Merged {} stream chunks", chunks.len());
        Ok(merge_chunks(chunks))
    } else {
        decode_response(raw.as_bytes(), &mut sink)
    }
}
