use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

mod api;
mod error;
mod logging;
mod utils;

use api::models::{SearchPage, Statistics, UploadReceipt};
use api::{ClientConfig, HttpClient, QueryParams, QueryValue};
use utils::{format_file_size, format_number, Debouncer, Severity, Toaster};

/// Command-line client for the Nikud Analyzer API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Origin of the Nikud Analyzer server
    #[arg(long, global = true, default_value = api::DEFAULT_ORIGIN)]
    origin: String,

    /// Path prefix every endpoint is resolved under
    #[arg(long, global = true, default_value = api::DEFAULT_BASE_PATH)]
    base_path: String,

    /// Log requests at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Do not draw notifications
    #[arg(long, global = true, default_value_t = false)]
    no_toast: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// GET an endpoint and print the JSON response
    Get {
        endpoint: String,

        /// Query parameter; empty values are not sent
        #[arg(short = 'q', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// POST a JSON body and print the JSON response
    Post {
        endpoint: String,

        /// Request body as a JSON document
        #[arg(short, long)]
        data: String,
    },
    /// Upload a text file as a new source
    Upload {
        /// File to upload
        #[arg(short, long)]
        file: PathBuf,

        /// Form field carrying the file
        #[arg(long, default_value = "file")]
        field: String,

        /// Extra form field, e.g. `source_name=Tehilim`
        #[arg(long = "text", value_name = "KEY=VALUE")]
        fields: Vec<String>,

        #[arg(long, default_value = "/sources/upload")]
        endpoint: String,
    },
    /// DELETE an endpoint and print the JSON response
    Delete { endpoint: String },
    /// Show corpus statistics
    Stats,
    /// Show a notification
    Notify {
        message: String,

        /// success, error or info; anything else is shown as info
        #[arg(short, long, default_value = "success")]
        severity: String,
    },
    /// Search words typed on stdin, one query per line; a blank line drops
    /// the pending query
    Search {
        /// Quiet period before a typed query is sent
        #[arg(long, default_value_t = 300)]
        wait_ms: u64,

        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let toaster = if args.no_toast {
        Toaster::hidden()
    } else {
        Toaster::new()
    };
    logging::init(args.verbose, toaster.display_root());
    let no_toast = args.no_toast;

    let outcome = run(args, &toaster).await;
    if let Err(e) = &outcome {
        error!("{:#}", e);
        toaster.show_toast(e.to_string(), Severity::Error);
    }

    if !no_toast {
        toaster.drain().await;
    }
    if outcome.is_err() {
        std::process::exit(1);
    }
}

async fn run(args: Args, toaster: &Toaster) -> anyhow::Result<()> {
    let client = HttpClient::new(ClientConfig {
        origin: args.origin,
        base_path: args.base_path,
    })?;
    info!("Nikud Analyzer client initialized");

    match args.command {
        Commands::Get { endpoint, params } => {
            let params: QueryParams = params
                .iter()
                .map(|raw| QueryParams::parse_pair(raw))
                .collect();
            let value: Value = client.get(&endpoint, &params).await?;
            print_json(&value)?;
            toaster.show_toast(format!("GET {}", endpoint), Severity::Success);
        }
        Commands::Post { endpoint, data } => {
            let body: Value = serde_json::from_str(&data).context("--data is not valid JSON")?;
            let value: Value = client.post(&endpoint, &body).await?;
            print_json(&value)?;
            toaster.show_toast(format!("POST {}", endpoint), Severity::Success);
        }
        Commands::Upload {
            file,
            field,
            fields,
            endpoint,
        } => {
            let (form, size) = build_form(&file, &field, &fields).await?;
            let receipt: UploadReceipt = client.upload(&endpoint, form).await?;

            if !receipt.message.is_empty() {
                println!("{}", receipt.message);
            }
            if let Some(id) = receipt.source_id {
                println!("Source id: {}", id);
            }
            println!("Words loaded: {}", format_number(receipt.word_count));
            toaster.show_toast(
                format!("Uploaded {} ({})", file.display(), format_file_size(size)),
                Severity::Success,
            );
        }
        Commands::Delete { endpoint } => {
            let value: Value = client.delete(&endpoint).await?;
            print_json(&value)?;
            toaster.show_toast(format!("DELETE {}", endpoint), Severity::Success);
        }
        Commands::Stats => {
            let stats: Statistics = client.get("/analysis/stats", &QueryParams::new()).await?;
            print_statistics(&stats);
            toaster.show_toast("Statistics loaded", Severity::Info);
        }
        Commands::Notify { message, severity } => {
            toaster.show_toast(message, Severity::from_name(&severity));
        }
        Commands::Search { wait_ms, per_page } => {
            search(&client, toaster, Duration::from_millis(wait_ms), per_page).await?;
        }
    }

    Ok(())
}

/// Assemble the multipart body for an upload. Returns the form and the size
/// of the file it carries.
async fn build_form(file: &Path, field: &str, fields: &[String]) -> anyhow::Result<(Form, u64)> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let size = bytes.len() as u64;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let mut form = Form::new().part(field.to_string(), Part::bytes(bytes).file_name(file_name));
    for raw in fields {
        let Some((key, value)) = raw.split_once('=') else {
            bail!("form field {:?} is not KEY=VALUE", raw);
        };
        form = form.text(key.to_string(), value.to_string());
    }

    Ok((form, size))
}

/// Read queries from stdin and send only the ones the user settled on.
async fn search(
    client: &HttpClient,
    toaster: &Toaster,
    wait: Duration,
    per_page: u32,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let debounced = Debouncer::new(wait, move |query: String| {
        let _ = tx.send(query);
    });

    // The sender lives inside the debouncer; once stdin closes and the last
    // pending query fires, the channel closes and the loop below ends.
    let reader = tokio::spawn(async move {
        feed_queries(BufReader::new(tokio::io::stdin()), &debounced).await
    });

    while let Some(query) = rx.recv().await {
        let params = QueryParams::new()
            .set("word", QueryValue::from(query.as_str()))
            .set("per_page", QueryValue::from(per_page));

        match client.get::<SearchPage>("/words/search", &params).await {
            Ok(page) => print_search_page(&query, &page),
            Err(e) => {
                error!(status = ?e.status(), "Search for {:?} failed: {}", query, e);
                toaster.show_toast(e.to_string(), Severity::Error);
            }
        }
    }

    reader.await??;
    Ok(())
}

/// Hand each typed line to the debouncer; a blank line cancels the pending
/// query. Read errors, including invalid UTF-8, end the search.
async fn feed_queries<R>(input: R, debounced: &Debouncer<String>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read search input")?
    {
        let query = line.trim();
        if query.is_empty() {
            debounced.cancel();
        } else {
            debounced.call(query.to_string());
        }
    }
    if debounced.is_pending() {
        debug!("Input closed, waiting for the last query");
    }
    Ok(())
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_statistics(stats: &Statistics) {
    println!("Total words:        {}", format_number(stats.total_words));
    println!("Unique words:       {}", format_number(stats.unique_words));
    println!("Words with shva:    {}", format_number(stats.words_with_shva));
    println!("Words with dagesh:  {}", format_number(stats.words_with_dagesh));
    println!("Sources:            {}", format_number(stats.total_sources));
    println!("Categories:         {}", format_number(stats.total_categories));

    if !stats.syllable_distribution.is_empty() {
        println!("\nSyllables:");
        for entry in &stats.syllable_distribution {
            println!("  {:<12} {}", entry.kind, format_number(entry.count));
        }
    }
}

fn print_search_page(query: &str, page: &SearchPage) {
    println!(
        "\n{} results for {:?} (page {}/{})",
        format_number(page.total),
        query,
        page.page,
        page.pages
    );
    for result in &page.results {
        let word = result
            .get("word")
            .and_then(Value::as_str)
            .unwrap_or_default();
        println!("  {}", word);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn cli_parses_get_params() {
        let args = Args::parse_from([
            "nikud-client",
            "get",
            "/words/search",
            "-q",
            "word=שלום",
            "--param",
            "source_id=",
        ]);
        match args.command {
            Commands::Get { endpoint, params } => {
                assert_eq!(endpoint, "/words/search");
                assert_eq!(params, vec!["word=שלום", "source_id="]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(args.origin, api::DEFAULT_ORIGIN);
        assert_eq!(args.base_path, api::DEFAULT_BASE_PATH);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let args = Args::parse_from([
            "nikud-client",
            "stats",
            "--origin",
            "http://10.0.0.2:8000",
            "--no-toast",
        ]);
        assert!(matches!(args.command, Commands::Stats));
        assert_eq!(args.origin, "http://10.0.0.2:8000");
        assert!(args.no_toast);
    }

    #[test]
    fn notify_defaults_to_success() {
        let args = Args::parse_from(["nikud-client", "notify", "Saved"]);
        match args.command {
            Commands::Notify { message, severity } => {
                assert_eq!(message, "Saved");
                assert_eq!(Severity::from_name(&severity), Severity::Success);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn query_sink() -> (Debouncer<String>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debounced = Debouncer::new(Duration::from_millis(50), move |query: String| {
            let _ = tx.send(query);
        });
        (debounced, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn feed_queries_sends_settled_query() {
        let (debounced, mut rx) = query_sink();
        let input: &[u8] = "שלו\nשלום  \n".as_bytes();

        feed_queries(BufReader::new(input), &debounced).await.unwrap();
        assert!(debounced.is_pending());

        assert_eq!(rx.recv().await.as_deref(), Some("שלום"));
    }

    #[tokio::test(start_paused = true)]
    async fn feed_queries_blank_line_cancels() {
        let (debounced, _rx) = query_sink();
        let input: &[u8] = b"abc\n\n";

        feed_queries(BufReader::new(input), &debounced).await.unwrap();
        assert!(!debounced.is_pending());
    }

    #[tokio::test]
    async fn feed_queries_fails_on_invalid_utf8() {
        let (debounced, _rx) = query_sink();
        let input: &[u8] = &[b'a', b'\n', 0xff, 0xfe, b'\n'];

        let err = feed_queries(BufReader::new(input), &debounced)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read search input"));
        let io = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn build_form_reports_file_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'a'; 2048]).unwrap();

        let fields = vec!["source_name=Tehilim".to_string()];
        let (form, size) = build_form(file.path(), "file", &fields).await.unwrap();
        assert_eq!(size, 2048);
        assert_eq!(format_file_size(size), "2.0 KB");
        assert!(!form.boundary().is_empty());
    }

    #[tokio::test]
    async fn build_form_rejects_bare_fields() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let fields = vec!["no-equals".to_string()];
        assert!(build_form(file.path(), "file", &fields).await.is_err());
    }
}
