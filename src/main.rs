//! `spotter` — interactive question answering over insurance policy PDFs.
//!
//! The REPL maps its commands 1:1 onto the library contracts: `load` onto
//! the document loader, `index`/`save`/`open` onto the index manager, and
//! `ask` onto the query engine. Errors from any action are reported and
//! the session keeps its previously loaded chunks and index.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use semantic_spotter::{
    Chunk, DocumentLoader, IndexManager, InMemoryIndex, OpenAiEmbedder, OpenAiGenerator,
    QueryEngine, SpotterConfig, VectorIndex,
};

#[derive(Parser)]
#[command(name = "spotter", version, about = "Semantic search over insurance policy documents")]
struct Cli {
    /// Directory containing the policy PDFs.
    #[arg(long, default_value = "policy_documents")]
    docs_dir: PathBuf,

    /// Directory where the index is saved and loaded.
    #[arg(long, default_value = "policy_index")]
    index_dir: PathBuf,

    /// OpenAI API key. Falls back to the OPENAI_API_KEY environment variable.
    #[arg(long)]
    api_key: Option<String>,

    /// Maximum chunk size in characters.
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Overlap between consecutive chunks in characters.
    #[arg(long, default_value_t = 200)]
    chunk_overlap: usize,

    /// Maximum number of chunks retrieved per question.
    #[arg(long, default_value_t = 50)]
    top_k: usize,

    /// Minimum similarity score for a chunk to be used.
    #[arg(long, default_value_t = 0.8)]
    score_threshold: f32,
}

/// Per-session state: at most one loaded chunk set and one index.
#[derive(Default)]
struct Session {
    chunks: Option<Vec<Chunk>>,
    index: Option<Arc<InMemoryIndex>>,
}

const HELP: &str = "\
commands:
  load            read and chunk every PDF in the documents directory
  index           embed the loaded chunks and build the search index
  save            persist the built index to the index directory
  open            load a previously saved index
  ask <question>  answer a question from the index, with citations
  help            show this help
  quit            exit";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    // The one ambient credential read, at the entry point only.
    let api_key = match cli.api_key.clone().or_else(|| std::env::var("OPENAI_API_KEY").ok()) {
        Some(key) if !key.is_empty() => key,
        _ => anyhow::bail!(
            "no API key configured: pass --api-key or set the OPENAI_API_KEY environment variable"
        ),
    };

    let config = SpotterConfig::builder()
        .chunk_size(cli.chunk_size)
        .chunk_overlap(cli.chunk_overlap)
        .top_k(cli.top_k)
        .score_threshold(cli.score_threshold)
        .build()?;

    let loader = DocumentLoader::new(config.chunk_size, config.chunk_overlap)?;
    let embedder: Arc<OpenAiEmbedder> = Arc::new(OpenAiEmbedder::new(api_key.clone())?);
    let manager = IndexManager::new(embedder.clone());
    let generator = Arc::new(OpenAiGenerator::new(api_key)?);

    println!("semantic spotter — insurance policy search");
    println!("documents: {}  index: {}", cli.docs_dir.display(), cli.index_dir.display());
    println!("type 'help' for commands");

    let mut session = Session::default();
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline("spotter> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line)?;

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "load" => match loader.load_documents(&cli.docs_dir) {
                Ok(chunks) => {
                    println!("loaded {} chunks", chunks.len());
                    session.chunks = Some(chunks);
                }
                Err(e) => eprintln!("error loading documents: {e}"),
            },
            "index" => match &session.chunks {
                Some(chunks) => match manager.create_index(chunks).await {
                    Ok(index) => {
                        println!("indexed {} chunks ({} dims)", index.len(), index.dimensions());
                        session.index = Some(Arc::new(index));
                    }
                    Err(e) => eprintln!("error creating index: {e}"),
                },
                None => eprintln!("no documents loaded yet — run 'load' first"),
            },
            "save" => match &session.index {
                Some(index) => match manager.save_index(index, &cli.index_dir).await {
                    Ok(()) => println!("index saved to {}", cli.index_dir.display()),
                    Err(e) => eprintln!("error saving index: {e}"),
                },
                None => eprintln!("no index built yet — run 'index' first"),
            },
            "open" => match manager.load_index(&cli.index_dir).await {
                Ok(index) => {
                    println!("opened index with {} chunks", index.len());
                    session.index = Some(Arc::new(index));
                }
                Err(e) => eprintln!("error opening index: {e}"),
            },
            "ask" => {
                if rest.is_empty() {
                    eprintln!("usage: ask <question>");
                    continue;
                }
                let Some(index) = session.index.clone() else {
                    eprintln!("no index available — run 'index' or 'open' first");
                    continue;
                };
                let engine = QueryEngine::builder()
                    .config(config.clone())
                    .embedder(embedder.clone())
                    .index(index)
                    .generator(generator.clone())
                    .build()?;
                match engine.answer(rest).await {
                    Ok(answer) => {
                        println!("\n{}\n", answer.text);
                        for (i, chunk) in answer.cited_chunks.iter().take(3).enumerate() {
                            let file = PathBuf::from(&chunk.source_path);
                            let name = file
                                .file_name()
                                .map(|n| n.to_string_lossy().into_owned())
                                .unwrap_or_else(|| chunk.source_path.clone());
                            println!("[{}] {} (page {})", i + 1, name, chunk.page_number);
                            println!("    {}", excerpt(&chunk.text, 200));
                        }
                    }
                    Err(e) => eprintln!("error answering question: {e}"),
                }
            }
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            other => eprintln!("unknown command '{other}' — type 'help'"),
        }
    }

    Ok(())
}

/// First `max_chars` characters of a chunk, single-line, with an ellipsis
/// when truncated.
fn excerpt(text: &str, max_chars: usize) -> String {
    let flattened: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let cut: String = flattened.chars().take(max_chars).collect();
    format!("{cut}…")
}
